use std::collections::BTreeMap;

use foundation::bounds::Aabb2;

/// One hexagonal ocean cell.
///
/// The ring is stored in lon/lat degrees without the GeoJSON closing
/// duplicate. Values hold only finite numeric properties; a variable a cell
/// has no data for is simply absent from the map.
#[derive(Debug, Clone, PartialEq)]
pub struct HexCell {
    /// Stable cell identifier from the dataset (`index` property).
    pub index: i64,
    /// Outer ring, lon/lat degrees, open (no closing duplicate).
    pub ring: Vec<[f64; 2]>,
    pub values: BTreeMap<String, f64>,
}

impl HexCell {
    pub fn value(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::from_points(self.ring.iter().copied())
    }
}
