//! Double-precision accumulation kernels.
//!
//! ## Purpose
//!
//! This module provides the arithmetic shared by every pair type: weighted
//! sums, unweighted means, and linear edge interpolation. Each kernel pulls
//! source values through a loader closure, so the same code serves reads
//! from input arrays and from output buffers.
//!
//! ## Design notes
//!
//! * All accumulation happens in `f64`, whatever the storage type.
//! * Narrowing to storage is the caller's job and happens exactly once per
//!   component, after accumulation.
//! * Weights are used as given. They are neither validated nor renormalized.
//!
//! ## Key concepts
//!
//! ### Weighted sum
//! ```text
//! v = sum_i w_i * x_i
//! ```
//!
//! ### Edge interpolation
//! ```text
//! v = x_0 + t * (x_1 - x_0)
//! ```
//! At `t = 0` this is exactly `x_0`. At `t = 1` it is `x_1` only when the
//! difference is representable, so pairs route both endpoints to a plain copy.
//!
//! ## Invariants
//!
//! * `ids.len()` drives the number of contributions; extra weights are ignored.
//!
//! ## Non-goals
//!
//! * This module does not perform compensated (Kahan) summation.
//! * This module does not check index ranges; loaders do.

/// Weighted sum of the values loaded for `ids`.
#[inline]
pub fn weighted_sum<F>(ids: &[usize], weights: &[f64], mut load: F) -> f64
where
    F: FnMut(usize) -> f64,
{
    debug_assert!(weights.len() >= ids.len(), "fewer weights than ids");
    let mut v = 0.0;
    for (&id, &w) in ids.iter().zip(weights) {
        v += w * load(id);
    }
    v
}

/// Arithmetic mean of the values loaded for `ids`.
///
/// An empty id list divides by zero and yields NaN.
#[inline]
pub fn mean<F>(ids: &[usize], mut load: F) -> f64
where
    F: FnMut(usize) -> f64,
{
    let mut v = 0.0;
    for &id in ids {
        v += load(id);
    }
    v / ids.len() as f64
}

/// Linear interpolation from `x0` toward `x1` by parameter `t`.
#[inline(always)]
pub fn lerp(x0: f64, x1: f64, t: f64) -> f64 {
    x0 + t * (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weighted_sum_is_not_renormalized() {
        let src = [10.0, 20.0, 30.0];
        let v = weighted_sum(&[0, 2], &[1.0, 1.0], |i| src[i]);
        assert_eq!(v, 40.0);

        let v = weighted_sum(&[0, 1], &[0.5, 0.5], |i| src[i]);
        assert_eq!(v, 15.0);
    }

    #[test]
    fn mean_of_empty_is_nan() {
        assert!(mean(&[], |_| 1.0).is_nan());
        assert_eq!(mean(&[0, 1, 2], |i| [1.0, 2.0, 3.0][i]), 2.0);
    }

    #[test]
    fn lerp_endpoints_are_exact() {
        assert_eq!(lerp(3.25, -7.5, 0.0), 3.25);
        assert_eq!(lerp(3.25, -7.5, 1.0), -7.5);
        assert_eq!(lerp(0.0, 10.0, 0.25), 2.5);
    }
}
