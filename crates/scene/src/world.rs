use std::collections::{BTreeMap, BTreeSet};

use foundation::bounds::Aabb2;

use crate::cell::HexCell;

/// All hex cells of the loaded dataset.
///
/// Cells are kept sorted by ascending `index` so lookups can binary-search
/// and linear scans visit lower indices first.
#[derive(Debug, Default)]
pub struct CellWorld {
    cells: Vec<HexCell>,
    bounds: Vec<Aabb2>,
}

impl CellWorld {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cells(mut cells: Vec<HexCell>) -> Self {
        cells.sort_by_key(|c| c.index);
        let bounds = cells.iter().map(HexCell::bounds).collect();
        Self { cells, bounds }
    }

    pub fn cells(&self) -> &[HexCell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell_by_index(&self, index: i64) -> Option<&HexCell> {
        let pos = self.cells.binary_search_by_key(&index, |c| c.index).ok()?;
        self.cells.get(pos)
    }

    pub fn cell_bounds(&self) -> &[Aabb2] {
        &self.bounds
    }

    /// Every variable key any cell carries, sorted.
    pub fn available_variables(&self) -> Vec<String> {
        let mut keys = BTreeSet::new();
        for cell in &self.cells {
            keys.extend(cell.values.keys().cloned());
        }
        keys.into_iter().collect()
    }

    /// Reconciles fresh values onto existing cells by index.
    ///
    /// Geometry is untouched. Updates whose index matches no cell are
    /// ignored. Returns how many cells were updated.
    pub fn replace_values(
        &mut self,
        updates: impl IntoIterator<Item = (i64, BTreeMap<String, f64>)>,
    ) -> usize {
        let mut updated = 0;
        for (index, values) in updates {
            if let Ok(pos) = self.cells.binary_search_by_key(&index, |c| c.index) {
                self.cells[pos].values = values;
                updated += 1;
            }
        }
        updated
    }
}
