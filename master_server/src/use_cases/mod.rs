pub mod placement;
pub mod probe;

pub use placement::{assign_room, CreateRoomError, PlacementError, RoomCreator};
pub use probe::{probe_task, StatusError, StatusSource};
