// sw-core/src/units.rs

use uom::si::f64::Angle as UomAngle;

use crate::{CoreError, CoreResult};

// Public canonical angle type (SI, f64)
pub type Angle = UomAngle;

#[inline]
pub fn rad(v: f64) -> Angle {
    use uom::si::angle::radian;
    Angle::new::<radian>(v)
}

#[inline]
pub fn deg(v: f64) -> Angle {
    use uom::si::angle::degree;
    Angle::new::<degree>(v)
}

/// Angle in radians as a plain float.
#[inline]
pub fn to_rad(a: Angle) -> f64 {
    use uom::si::angle::radian;
    a.get::<radian>()
}

/// Parse an angle literal: bare numbers are radians, `deg`/`rad` suffixes
/// select the unit explicitly (`-1.39`, `-80deg`, `0.5rad`).
pub fn parse_angle(text: &str) -> CoreResult<Angle> {
    let text = text.trim();
    let (number, degrees) = if let Some(n) = text.strip_suffix("deg") {
        (n, true)
    } else if let Some(n) = text.strip_suffix("rad") {
        (n, false)
    } else {
        (text, false)
    };
    let value: f64 = number
        .trim()
        .parse()
        .map_err(|_| CoreError::AngleParse {
            text: text.to_string(),
        })?;
    if !value.is_finite() {
        return Err(CoreError::NonFinite {
            what: "angle",
            value,
        });
    }
    Ok(if degrees { deg(value) } else { rad(value) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn degrees_convert_to_radians() {
        assert!((to_rad(deg(180.0)) - PI).abs() < 1e-12);
        assert_eq!(to_rad(rad(0.25)), 0.25);
    }

    #[test]
    fn parse_angle_units() {
        assert!((to_rad(parse_angle("-1.39").unwrap()) + 1.39).abs() < 1e-12);
        assert!((to_rad(parse_angle("0.5rad").unwrap()) - 0.5).abs() < 1e-12);
        assert!((to_rad(parse_angle("90deg").unwrap()) - FRAC_PI_2).abs() < 1e-12);
        assert!(parse_angle("abc").is_err());
        assert!(parse_angle("inf").is_err());
    }
}
