use scene::CellWorld;

use crate::colormap::Colormap;
use crate::registry::unit_for;
use crate::scale::ValueScale;

/// Color of a single cell, parallel to `CellWorld::cells()`.
///
/// Cells with no value for the active variable are hidden rather than drawn
/// in a sentinel color.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct CellPaint {
    pub visible: bool,
    pub rgb: [u8; 3],
}

impl CellPaint {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            rgb: [0, 0, 0],
        }
    }
}

const LEGEND_STOPS: usize = 10;

/// Data behind the on-screen legend.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendSnapshot {
    /// Scale minimum, two decimals.
    pub min_label: String,
    /// Scale maximum, two decimals.
    pub max_label: String,
    /// Unit string for the active variable, possibly empty.
    pub unit_label: String,
    /// Gradient samples, low to high after reversal.
    pub stops: Vec<[u8; 3]>,
}

impl LegendSnapshot {
    /// CSS background for the legend swatch.
    pub fn css_gradient(&self) -> String {
        let parts: Vec<String> = self
            .stops
            .iter()
            .enumerate()
            .map(|(i, [r, g, b])| {
                let pct = i as f64 / (self.stops.len() - 1).max(1) as f64 * 100.0;
                format!("rgb({r},{g},{b}) {pct:.0}%")
            })
            .collect();
        format!("linear-gradient(to right, {})", parts.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecolorOutput {
    pub paints: Vec<CellPaint>,
    pub scale: ValueScale,
    pub legend: LegendSnapshot,
}

/// Recomputes every cell's paint for the active variable.
///
/// Returns None when no cell carries a finite value for `active`, leaving
/// whatever was on screen untouched.
pub fn recolor_cells(
    world: &CellWorld,
    active: &str,
    colormap: Colormap,
    reversed: bool,
) -> Option<RecolorOutput> {
    let scale = ValueScale::compute(world.cells().iter().filter_map(|c| c.value(active)))?;

    let paints = world
        .cells()
        .iter()
        .map(|cell| match cell.value(active) {
            Some(v) if v.is_finite() => CellPaint {
                visible: true,
                rgb: colormap.resolve(scale.normalize(v), reversed),
            },
            _ => CellPaint::hidden(),
        })
        .collect();

    let stops = (0..LEGEND_STOPS)
        .map(|i| {
            let t = i as f64 / (LEGEND_STOPS - 1) as f64;
            colormap.resolve(t, reversed)
        })
        .collect();

    Some(RecolorOutput {
        paints,
        scale,
        legend: LegendSnapshot {
            min_label: format!("{:.2}", scale.min),
            max_label: format!("{:.2}", scale.max),
            unit_label: unit_for(active).to_string(),
            stops,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::{recolor_cells};
    use crate::colormap::Colormap;
    use scene::{CellWorld, HexCell};
    use std::collections::BTreeMap;

    fn cell(index: i64, value: Option<f64>) -> HexCell {
        let mut values = BTreeMap::new();
        if let Some(v) = value {
            values.insert("eff".to_string(), v);
        }
        HexCell {
            index,
            ring: vec![[0.0, 0.0], [1.0, 0.0], [0.5, 1.0]],
            values,
        }
    }

    #[test]
    fn hides_cells_without_data() {
        let world = CellWorld::from_cells(vec![cell(0, Some(0.2)), cell(1, None), cell(2, Some(0.8))]);
        let out = recolor_cells(&world, "eff", Colormap::Viridis, false).expect("recolor");
        assert_eq!(out.paints.len(), 3);
        assert!(out.paints[0].visible);
        assert!(!out.paints[1].visible);
        assert!(out.paints[2].visible);
        assert_eq!(out.scale.min, 0.2);
        assert_eq!(out.scale.max, 0.8);
    }

    #[test]
    fn no_data_anywhere_is_a_no_op() {
        let world = CellWorld::from_cells(vec![cell(0, None), cell(1, None)]);
        assert!(recolor_cells(&world, "eff", Colormap::Viridis, false).is_none());
        assert!(recolor_cells(&world, "missingKey", Colormap::Viridis, false).is_none());
    }

    #[test]
    fn legend_labels_use_two_decimals_and_unit() {
        let world = CellWorld::from_cells(vec![cell(0, Some(0.456)), cell(1, Some(0.881))]);
        let out = recolor_cells(&world, "eff", Colormap::Viridis, false).expect("recolor");
        assert_eq!(out.legend.min_label, "0.46");
        assert_eq!(out.legend.max_label, "0.88");
        assert_eq!(out.legend.unit_label, "(%)");
        assert_eq!(out.legend.stops.len(), 10);
    }

    #[test]
    fn reversed_legend_runs_high_to_low() {
        let world = CellWorld::from_cells(vec![cell(0, Some(0.0)), cell(1, Some(1.0))]);
        let fwd = recolor_cells(&world, "eff", Colormap::Magma, false).expect("recolor");
        let rev = recolor_cells(&world, "eff", Colormap::Magma, true).expect("recolor");
        assert_eq!(fwd.legend.stops[0], *rev.legend.stops.last().expect("stop"));
    }

    #[test]
    fn css_gradient_spans_full_range() {
        let world = CellWorld::from_cells(vec![cell(0, Some(0.0)), cell(1, Some(1.0))]);
        let out = recolor_cells(&world, "eff", Colormap::Viridis, false).expect("recolor");
        let css = out.legend.css_gradient();
        assert!(css.starts_with("linear-gradient(to right, rgb("));
        assert!(css.contains(" 0%"));
        assert!(css.ends_with(" 100%)"));
    }
}
