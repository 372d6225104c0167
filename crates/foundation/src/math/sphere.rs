use super::Vec3;

/// Unit direction for a lon/lat pair, in viewer space (y up).
///
/// Convention matches the globe renderer: colatitude from the north pole,
/// longitude negated so east is east when viewed from outside the sphere.
pub fn unit_from_lon_lat_deg(lon_deg: f64, lat_deg: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (-lon_deg).to_radians();
    let sin_phi = phi.sin();
    Vec3::new(sin_phi * theta.cos(), phi.cos(), sin_phi * theta.sin())
}

/// Inverse of [`unit_from_lon_lat_deg`]. Input need not be exactly unit length.
pub fn lon_lat_deg_from_unit(u: Vec3) -> (f64, f64) {
    let n = u.normalized();
    let lat_deg = n.y.clamp(-1.0, 1.0).asin().to_degrees();
    let lon_deg = -n.z.atan2(n.x).to_degrees();
    (lon_deg, lat_deg)
}

/// Wraps a longitude into [-180, 180).
pub fn wrap_lon_deg(mut lon: f64) -> f64 {
    while lon < -180.0 {
        lon += 360.0;
    }
    while lon >= 180.0 {
        lon -= 360.0;
    }
    lon
}

#[cfg(test)]
mod tests {
    use super::{lon_lat_deg_from_unit, unit_from_lon_lat_deg, wrap_lon_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn north_pole_points_up() {
        let u = unit_from_lon_lat_deg(0.0, 90.0);
        assert_close(u.y, 1.0, 1e-12);
    }

    #[test]
    fn equator_prime_meridian() {
        let u = unit_from_lon_lat_deg(0.0, 0.0);
        assert_close(u.x, 1.0, 1e-12);
        assert_close(u.y, 0.0, 1e-12);
        assert_close(u.z, 0.0, 1e-12);
    }

    #[test]
    fn round_trip_lon_lat() {
        for &(lon, lat) in &[(12.5, -33.0), (-179.0, 5.0), (101.25, 78.0)] {
            let u = unit_from_lon_lat_deg(lon, lat);
            let (lon_rt, lat_rt) = lon_lat_deg_from_unit(u);
            assert_close(lon_rt, lon, 1e-9);
            assert_close(lat_rt, lat, 1e-9);
        }
    }

    #[test]
    fn wrap_lon_normalizes_range() {
        assert_close(wrap_lon_deg(190.0), -170.0, 1e-12);
        assert_close(wrap_lon_deg(-200.0), 160.0, 1e-12);
        assert_close(wrap_lon_deg(45.0), 45.0, 1e-12);
    }
}
