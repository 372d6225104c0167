//! Deterministic float comparison.
//!
//! Value scales are computed by folding over unordered property maps, so
//! min/max must not depend on NaN payloads or the sign of zero.

use core::cmp::Ordering;

/// Collapses `-0.0` to `0.0` and every NaN to one canonical NaN.
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Total ordering over canonicalized floats.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
