pub mod registry;

pub use registry::{Placement, WorkerAddr, WorkerRegistry};
