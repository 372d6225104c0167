pub mod hex_dataset;
pub mod presets;

pub use hex_dataset::*;
pub use presets::*;
