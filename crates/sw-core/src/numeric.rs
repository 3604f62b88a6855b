/// Floating point type used throughout system
pub type Real = f64;

/// Position and value of the first non-finite entry, if any.
pub fn first_non_finite(values: &[Real]) -> Option<(usize, Real)> {
    values
        .iter()
        .copied()
        .enumerate()
        .find(|(_, v)| !v.is_finite())
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[Real]) -> Real {
    if values.is_empty() {
        return Real::NAN;
    }
    values.iter().sum::<Real>() / values.len() as Real
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_non_finite_reports_position() {
        assert_eq!(first_non_finite(&[1.0, 2.0]), None);
        let (i, v) = first_non_finite(&[1.0, Real::INFINITY, Real::NAN]).unwrap();
        assert_eq!(i, 1);
        assert!(v.is_infinite());
    }

    #[test]
    fn mean_of_empty_is_nan() {
        assert!(mean(&[]).is_nan());
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }
}
