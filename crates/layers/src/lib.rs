pub mod colormap;
pub mod mesh;
pub mod recolor;
pub mod registry;
pub mod scale;

pub use colormap::Colormap;
pub use mesh::{CellMesh, HEX_LIFT, tessellate_cells};
pub use recolor::{CellPaint, LegendSnapshot, RecolorOutput, recolor_cells};
pub use scale::ValueScale;
