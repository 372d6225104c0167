use earcutr::earcut;
use foundation::math::{Vec3, unit_from_lon_lat_deg};
use scene::{CellWorld, HexCell};

/// Radial offset of hex meshes above the unit globe, in globe radii.
///
/// Keeps cell fills from z-fighting the globe surface.
pub const HEX_LIFT: f64 = 0.003;

/// Triangulated cell, ready for upload. Positions are a flat triangle list.
#[derive(Debug, Clone, PartialEq)]
pub struct CellMesh {
    pub cell_index: i64,
    pub positions: Vec<Vec3>,
}

impl CellMesh {
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

/// Triangulates every cell ring onto the sphere at radius `1 + lift`.
///
/// Geometry only depends on the rings, not the values, so callers cache the
/// result across model runs.
pub fn tessellate_cells(world: &CellWorld, lift: f64) -> Vec<CellMesh> {
    world
        .cells()
        .iter()
        .filter_map(|cell| tessellate_cell(cell, lift))
        .collect()
}

fn tessellate_cell(cell: &HexCell, lift: f64) -> Option<CellMesh> {
    if cell.ring.len() < 3 {
        return None;
    }

    let radius = 1.0 + lift;
    let vertices: Vec<Vec3> = cell
        .ring
        .iter()
        .map(|&[lon, lat]| unit_from_lon_lat_deg(lon, lat).scale(radius))
        .collect();

    // Triangulate in the tangent plane at the ring centroid. Cells are small
    // enough that the projection cannot fold.
    let origin = centroid(&vertices);
    let normal = origin.normalized();
    let up = if normal.z.abs() < 0.99 {
        Vec3::new(0.0, 0.0, 1.0)
    } else {
        Vec3::new(0.0, 1.0, 0.0)
    };
    let east = up.cross(normal).normalized();
    let north = normal.cross(east);

    let mut coords_2d = Vec::with_capacity(vertices.len() * 2);
    for v in &vertices {
        let d = *v - origin;
        coords_2d.push(d.dot(east));
        coords_2d.push(d.dot(north));
    }

    let indices = earcut(&coords_2d, &[], 2).ok()?;
    if indices.is_empty() {
        return None;
    }

    let positions = indices
        .into_iter()
        .filter_map(|i| vertices.get(i).copied())
        .collect();

    Some(CellMesh {
        cell_index: cell.index,
        positions,
    })
}

fn centroid(vertices: &[Vec3]) -> Vec3 {
    let mut sum = Vec3::new(0.0, 0.0, 0.0);
    for v in vertices {
        sum = sum + *v;
    }
    sum.scale(1.0 / vertices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::{HEX_LIFT, tessellate_cells};
    use scene::{CellWorld, HexCell};
    use std::collections::BTreeMap;

    fn hex(index: i64, lon0: f64, lat0: f64) -> HexCell {
        let ring = (0..6)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / 6.0;
                [lon0 + a.cos(), lat0 + a.sin()]
            })
            .collect();
        HexCell {
            index,
            ring,
            values: BTreeMap::new(),
        }
    }

    #[test]
    fn hexagon_yields_four_triangles() {
        let world = CellWorld::from_cells(vec![hex(0, 12.0, 45.0)]);
        let meshes = tessellate_cells(&world, HEX_LIFT);
        assert_eq!(meshes.len(), 1);
        assert_eq!(meshes[0].triangle_count(), 4);
    }

    #[test]
    fn vertices_sit_on_lifted_sphere() {
        let world = CellWorld::from_cells(vec![hex(0, -60.0, -30.0)]);
        let meshes = tessellate_cells(&world, HEX_LIFT);
        for p in &meshes[0].positions {
            assert!((p.length() - (1.0 + HEX_LIFT)).abs() < 1e-9);
        }
    }

    #[test]
    fn degenerate_ring_is_skipped() {
        let world = CellWorld::from_cells(vec![HexCell {
            index: 0,
            ring: vec![[0.0, 0.0], [1.0, 0.0]],
            values: BTreeMap::new(),
        }]);
        assert!(tessellate_cells(&world, HEX_LIFT).is_empty());
    }

    #[test]
    fn polar_cells_triangulate() {
        let world = CellWorld::from_cells(vec![hex(0, 0.0, 88.5)]);
        let meshes = tessellate_cells(&world, HEX_LIFT);
        assert_eq!(meshes.len(), 1);
        assert!(meshes[0].triangle_count() >= 4);
    }
}
