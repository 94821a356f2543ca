//! # Approximate floating point comparison
//!
//! All arithmetic in this crate is plain `f64`. A single epsilon is used for
//! every approximately-zero decision (pruning expression terms, feasibility
//! checks, satisfaction tests) so that behavior stays predictable.

/// The tolerance used for all approximate comparisons.
pub(crate) const EPSILON: f64 = 1e-8;

/// Whether `a` and `b` are the same value within [`EPSILON`].
pub(crate) fn approx_eq(a: f64, b: f64) -> bool {
    if a > b {
        a - b < EPSILON
    } else {
        b - a < EPSILON
    }
}

/// Whether `a` is zero within [`EPSILON`].
pub(crate) fn near_zero(a: f64) -> bool {
    approx_eq(a, 0.0)
}

#[cfg(test)]
mod test {
    use super::{approx_eq, near_zero, EPSILON};

    #[test]
    fn near_zero_is_symmetric() {
        assert!(near_zero(0.0));
        assert!(near_zero(EPSILON / 2.0));
        assert!(near_zero(-EPSILON / 2.0));
        assert!(!near_zero(EPSILON * 2.0));
        assert!(!near_zero(-EPSILON * 2.0));
    }

    #[test]
    fn approx_eq_on_large_values() {
        assert!(approx_eq(1e9, 1e9));
        assert!(!approx_eq(1.0, 1.0 + 2.0 * EPSILON));
    }
}
