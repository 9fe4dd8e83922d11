pub mod collision;
pub mod entities;
pub mod geometry;
