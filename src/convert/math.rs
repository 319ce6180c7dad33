//! Power-of-ten and base-10 logarithm helpers
//!
//! The platform toolchain places `pow` and `log10` in the fast/cached
//! code region, which the firmware's space budget cannot spare.  Both
//! helpers are derived from `exp`/`ln`, which stay in bulk storage.

use std::f64::consts::LN_10;

/// Compute 10^n for integer `n` without the `pow` primitive.
///
/// `exp(n * ln 10)` drifts a few ulps off the exact power, so the
/// magnitude is rounded before use; negative exponents return the
/// reciprocal of the rounded positive power.
pub fn pow10i(n: i32) -> f64 {
    if n == 0 {
        1.0
    } else if n == 1 {
        10.0
    } else if n > 0 {
        (f64::from(n) * LN_10).exp().round()
    } else {
        1.0 / (f64::from(-n) * LN_10).exp().round()
    }
}

/// Compute log10(x) without the `log10` primitive.
pub fn log10(x: f64) -> f64 {
    x.ln() / LN_10
}
