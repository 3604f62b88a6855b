//! Parsers for command-line area and disturbance arguments.

use sw_app::{AppError, AppResult};
use sw_project::DisturbanceDef;

/// `AREA:GEN:ANGLE` with 1-based area and generator numbers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisturbanceArg {
    pub area: usize,
    pub generator: usize,
    pub angle_rad: f64,
}

impl DisturbanceArg {
    /// Convert to a scenario entry (area becomes a 0-based selection position).
    pub fn to_def(self) -> DisturbanceDef {
        DisturbanceDef {
            area: self.area - 1,
            generator: self.generator,
            angle_rad: self.angle_rad,
        }
    }
}

pub fn parse_disturbance(text: &str) -> Result<DisturbanceArg, String> {
    let parts: Vec<&str> = text.split(':').collect();
    let [area, generator, angle] = parts.as_slice() else {
        return Err(format!("expected AREA:GEN:ANGLE, got '{}'", text));
    };
    let area: usize = area
        .trim()
        .parse()
        .map_err(|e| format!("bad area number '{}': {}", area, e))?;
    let generator: usize = generator
        .trim()
        .parse()
        .map_err(|e| format!("bad generator number '{}': {}", generator, e))?;
    if area == 0 || generator == 0 {
        return Err("area and generator numbers start at 1".to_string());
    }
    let angle = sw_core::parse_angle(angle).map_err(|e| e.to_string())?;
    Ok(DisturbanceArg {
        area,
        generator,
        angle_rad: sw_core::to_rad(angle),
    })
}

/// Parse `all` or a comma-separated list of 1-based area numbers into
/// 0-based indices. `all` yields an empty list (every area).
pub fn parse_area_list(text: &str, area_count: usize) -> AppResult<Vec<usize>> {
    let text = text.trim();
    if text.eq_ignore_ascii_case("all") {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|item| {
            let item = item.trim();
            let n: usize = item
                .parse()
                .map_err(|_| AppError::InvalidInput(format!("Bad area number: '{}'", item)))?;
            if n == 0 || n > area_count {
                return Err(AppError::InvalidInput(format!(
                    "Area number {} is outside 1..={}",
                    n, area_count
                )));
            }
            Ok(n - 1)
        })
        .collect()
}
