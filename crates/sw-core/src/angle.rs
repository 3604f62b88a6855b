//! Phase angle helpers.
//!
//! Generator angles are integrated unwrapped; wrapping into `[0, 2π)` only
//! happens when results are reduced or displayed.

use core::f64::consts::TAU;

use crate::numeric::Real;

/// Wrap an angle into `[0, 2π)`.
///
/// Matches the floor-modulo convention: negative inputs wrap upward.
pub fn wrap_angle(theta: Real) -> Real {
    let wrapped = theta.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Arithmetic mean of angles after wrapping each into `[0, 2π)`.
///
/// This is not a circular mean: `{0.01, 6.27}` averages to roughly π.
pub fn wrapped_mean(angles: &[Real]) -> Real {
    if angles.is_empty() {
        return Real::NAN;
    }
    angles.iter().map(|&a| wrap_angle(a)).sum::<Real>() / angles.len() as Real
}

/// Circular mean of angles, wrapped into `[0, 2π)`.
///
/// Returns NaN for an empty slice or when the resultant vector vanishes.
pub fn circular_mean(angles: &[Real]) -> Real {
    if angles.is_empty() {
        return Real::NAN;
    }
    let (s, c) = angles
        .iter()
        .fold((0.0, 0.0), |(s, c), &a| (s + a.sin(), c + a.cos()));
    if s == 0.0 && c == 0.0 {
        return Real::NAN;
    }
    wrap_angle(s.atan2(c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::PI;

    #[test]
    fn wrap_negative_and_large() {
        assert!((wrap_angle(-1.39) - (TAU - 1.39)).abs() < 1e-12);
        assert!((wrap_angle(7.0) - (7.0 - TAU)).abs() < 1e-12);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert_eq!(wrap_angle(TAU), 0.0);
    }

    #[test]
    fn wrapped_mean_has_boundary_artifact() {
        let m = wrapped_mean(&[0.01, 6.27]);
        assert!((m - PI).abs() < 0.01);
    }

    #[test]
    fn circular_mean_handles_boundary() {
        let m = circular_mean(&[0.01, TAU - 0.01]);
        assert!(m < 1e-9 || (TAU - m) < 1e-9);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn wrap_stays_in_range(theta in -1.0e4_f64..1.0e4_f64) {
            let w = wrap_angle(theta);
            prop_assert!((0.0..TAU).contains(&w));
            prop_assert!(((theta - w) / TAU - ((theta - w) / TAU).round()).abs() < 1e-6);
        }
    }
}
