use foundation::math::{Vec3, lon_lat_deg_from_unit};

use crate::world::CellWorld;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PickHit {
    pub cell_index: i64,
    pub lon_deg: f64,
    pub lat_deg: f64,
    /// Distance along the normalized ray to the sphere surface.
    pub distance: f64,
    pub point: Vec3,
}

/// Nearest intersection of a ray with the sphere of `radius` at the origin.
pub fn ray_sphere_hit(ray: Ray, radius: f64) -> Option<(f64, Vec3)> {
    let dir = ray.dir.normalized();
    if dir.length() == 0.0 {
        return None;
    }
    let oc = ray.origin;
    let b = oc.dot(dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();
    let t = if -b - sqrt_disc > 0.0 {
        -b - sqrt_disc
    } else if -b + sqrt_disc > 0.0 {
        -b + sqrt_disc
    } else {
        return None;
    };
    Some((t, oc + dir.scale(t)))
}

/// Deterministic cell picking against the globe surface.
///
/// Ordering contract: when the surface point lies in more than one cell ring
/// (shared edges, numeric slop), the lowest cell index wins. Cells are kept
/// sorted by index, so the first match is the answer.
pub fn pick_ray(world: &CellWorld, ray: Ray, radius: f64) -> Option<PickHit> {
    let (distance, point) = ray_sphere_hit(ray, radius)?;
    let (lon_deg, lat_deg) = lon_lat_deg_from_unit(point);

    for (cell, bounds) in world.cells().iter().zip(world.cell_bounds()) {
        // Cells near the antimeridian may store longitudes shifted by 360.
        let lon = if bounds.contains([lon_deg, lat_deg]) {
            lon_deg
        } else if bounds.contains([lon_deg + 360.0, lat_deg]) {
            lon_deg + 360.0
        } else if bounds.contains([lon_deg - 360.0, lat_deg]) {
            lon_deg - 360.0
        } else {
            continue;
        };
        if point_in_ring([lon, lat_deg], &cell.ring) {
            return Some(PickHit {
                cell_index: cell.index,
                lon_deg,
                lat_deg,
                distance,
                point,
            });
        }
    }
    None
}

/// Screen picking wrapper.
///
/// The caller supplies the screen->ray mapping, including any inverse model
/// rotation for globe spin.
pub fn pick_screen<F>(
    world: &CellWorld,
    x_px: f64,
    y_px: f64,
    mut make_ray: F,
    radius: f64,
) -> Option<PickHit>
where
    F: FnMut(f64, f64) -> Option<Ray>,
{
    let ray = make_ray(x_px, y_px)?;
    pick_ray(world, ray, radius)
}

/// Even-odd crossing test in lon/lat degrees. The ring is open.
fn point_in_ring(p: [f64; 2], ring: &[[f64; 2]]) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);
        if ((yi > p[1]) != (yj > p[1]))
            && (p[0] < (xj - xi) * (p[1] - yi) / (yj - yi) + xi)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::{Ray, pick_ray, point_in_ring, ray_sphere_hit};
    use crate::cell::HexCell;
    use crate::world::CellWorld;
    use foundation::math::Vec3;
    use std::collections::BTreeMap;

    fn square(index: i64, lon0: f64, lat0: f64, size: f64) -> HexCell {
        HexCell {
            index,
            ring: vec![
                [lon0, lat0],
                [lon0 + size, lat0],
                [lon0 + size, lat0 + size],
                [lon0, lat0 + size],
            ],
            values: BTreeMap::new(),
        }
    }

    #[test]
    fn sphere_hit_front_face() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let (t, p) = ray_sphere_hit(ray, 1.0).expect("hit");
        assert!((t - 2.0).abs() < 1e-12);
        assert!((p.x - 1.0).abs() < 1e-12);
    }

    #[test]
    fn sphere_miss_returns_none() {
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 1.0, 0.0));
        assert!(ray_sphere_hit(ray, 1.0).is_none());
    }

    #[test]
    fn point_in_ring_even_odd() {
        let ring = [[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]];
        assert!(point_in_ring([1.0, 1.0], &ring));
        assert!(!point_in_ring([3.0, 1.0], &ring));
    }

    #[test]
    fn picks_cell_containing_surface_point() {
        // Ray along +x hits the sphere at lon 0, lat 0.
        let world = CellWorld::from_cells(vec![
            square(3, -1.0, -1.0, 2.0),
            square(8, 10.0, 10.0, 2.0),
        ]);
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = pick_ray(&world, ray, 1.0).expect("hit");
        assert_eq!(hit.cell_index, 3);
        assert!(hit.lon_deg.abs() < 1e-9);
        assert!(hit.lat_deg.abs() < 1e-9);
    }

    #[test]
    fn overlap_resolves_to_lowest_index() {
        let world = CellWorld::from_cells(vec![
            square(9, -1.0, -1.0, 2.0),
            square(4, -1.0, -1.0, 2.0),
        ]);
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        let hit = pick_ray(&world, ray, 1.0).expect("hit");
        assert_eq!(hit.cell_index, 4);
    }

    #[test]
    fn no_cell_under_point_returns_none() {
        let world = CellWorld::from_cells(vec![square(0, 50.0, 50.0, 2.0)]);
        let ray = Ray::new(Vec3::new(3.0, 0.0, 0.0), Vec3::new(-1.0, 0.0, 0.0));
        assert!(pick_ray(&world, ray, 1.0).is_none());
    }
}
