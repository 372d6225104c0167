pub mod cell;
pub mod picking;
pub mod world;

pub use cell::HexCell;
pub use picking::{PickHit, Ray, pick_ray, pick_screen};
pub use world::CellWorld;
