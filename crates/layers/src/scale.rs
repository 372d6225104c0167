use foundation::math::precision::stable_total_cmp_f64;

/// Linear value-to-[0,1] scale over the active variable.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
}

impl ValueScale {
    /// Min/max over the finite values; None when there are none.
    pub fn compute(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        let mut bounds: Option<(f64, f64)> = None;
        for v in values {
            if !v.is_finite() {
                continue;
            }
            bounds = Some(match bounds {
                None => (v, v),
                Some((lo, hi)) => (
                    if stable_total_cmp_f64(v, lo).is_lt() { v } else { lo },
                    if stable_total_cmp_f64(v, hi).is_gt() { v } else { hi },
                ),
            });
        }
        bounds.map(|(min, max)| Self { min, max })
    }

    /// Normalized position of `v`, clamped to [0, 1].
    ///
    /// A degenerate scale (min == max) maps every value to 0.5 so uniform
    /// datasets render mid-scale instead of dividing by zero.
    pub fn normalize(self, v: f64) -> f64 {
        if self.min == self.max {
            return 0.5;
        }
        ((v - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::ValueScale;

    #[test]
    fn compute_skips_non_finite() {
        let scale =
            ValueScale::compute([2.0, f64::NAN, -1.0, f64::INFINITY, 5.0]).expect("scale");
        assert_eq!(scale.min, -1.0);
        assert_eq!(scale.max, 5.0);
    }

    #[test]
    fn compute_empty_is_none() {
        assert!(ValueScale::compute([]).is_none());
        assert!(ValueScale::compute([f64::NAN]).is_none());
    }

    #[test]
    fn normalize_clamps_to_unit_interval() {
        let scale = ValueScale { min: 10.0, max: 20.0 };
        assert_eq!(scale.normalize(10.0), 0.0);
        assert_eq!(scale.normalize(20.0), 1.0);
        assert_eq!(scale.normalize(15.0), 0.5);
        assert_eq!(scale.normalize(5.0), 0.0);
        assert_eq!(scale.normalize(25.0), 1.0);
    }

    #[test]
    fn degenerate_scale_maps_to_midpoint() {
        let scale = ValueScale { min: 7.0, max: 7.0 };
        assert_eq!(scale.normalize(7.0), 0.5);
        assert_eq!(scale.normalize(-3.0), 0.5);
    }
}
