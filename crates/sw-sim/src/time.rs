//! Output time grids.

use crate::error::{SimError, SimResult};

/// Reference grid end time (s).
pub const DEFAULT_T_END_S: f64 = 25.0;

/// Reference grid sample count.
pub const DEFAULT_POINTS: usize = 1000;

/// Finite, strictly increasing sample times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    points: Vec<f64>,
}

impl TimeGrid {
    /// Validate caller-supplied sample times.
    pub fn from_points(points: Vec<f64>) -> SimResult<Self> {
        if points.is_empty() {
            return Err(SimError::InvalidArg {
                what: "time grid must contain at least one point",
            });
        }
        if points.iter().any(|t| !t.is_finite()) {
            return Err(SimError::InvalidArg {
                what: "time grid points must be finite",
            });
        }
        if points.windows(2).any(|w| w[1] <= w[0]) {
            return Err(SimError::InvalidArg {
                what: "time grid must be strictly increasing",
            });
        }
        Ok(Self { points })
    }

    /// `points` evenly spaced samples from `start` to `end` inclusive.
    pub fn linspace(start: f64, end: f64, points: usize) -> SimResult<Self> {
        if points == 0 {
            return Err(SimError::InvalidArg {
                what: "time grid must contain at least one point",
            });
        }
        if points == 1 {
            return Self::from_points(vec![start]);
        }
        let span = end - start;
        let last = (points - 1) as f64;
        let mut samples: Vec<f64> = (0..points)
            .map(|k| start + span * (k as f64 / last))
            .collect();
        samples[points - 1] = end;
        Self::from_points(samples)
    }

    /// 1000 samples over 0..25 s.
    pub fn reference() -> SimResult<Self> {
        Self::linspace(0.0, DEFAULT_T_END_S, DEFAULT_POINTS)
    }

    pub fn points(&self) -> &[f64] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> f64 {
        self.points[0]
    }

    pub fn end(&self) -> f64 {
        self.points[self.points.len() - 1]
    }
}
