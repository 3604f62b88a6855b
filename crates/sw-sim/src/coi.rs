//! Center-of-inertia (COI) reduction of generator trajectories.

use nalgebra::DMatrix;
use sw_core::{circular_mean, mean, wrapped_mean};
use sw_grid::StateLayout;

use crate::error::{SimError, SimResult};
use crate::sim::Trajectory;

/// How generator angles are combined into an area angle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CoiMethod {
    /// Plain mean of angles wrapped into `[0, 2π)`. Shows artifacts for
    /// areas straddling the wrap point.
    #[default]
    WrappedArithmetic,
    /// Circular mean (direction of the summed unit phasors).
    Circular,
}

/// Per-area aggregate series, shape `(samples, areas)`.
#[derive(Clone, Debug, PartialEq)]
pub struct CoiSeries {
    pub angle: DMatrix<f64>,
    pub frequency: DMatrix<f64>,
}

impl CoiSeries {
    pub fn samples(&self) -> usize {
        self.angle.nrows()
    }

    pub fn area_count(&self) -> usize {
        self.angle.ncols()
    }

    /// COI angle series of one area.
    pub fn area_angle(&self, area: usize) -> Vec<f64> {
        self.angle.column(area).iter().copied().collect()
    }

    /// COI frequency series of one area.
    pub fn area_frequency(&self, area: usize) -> Vec<f64> {
        self.frequency.column(area).iter().copied().collect()
    }

    /// Largest absolute COI frequency seen by each area.
    pub fn peak_frequency(&self) -> Vec<f64> {
        (0..self.area_count())
            .map(|a| {
                self.frequency
                    .column(a)
                    .iter()
                    .fold(0.0_f64, |m, v| m.max(v.abs()))
            })
            .collect()
    }
}

/// Reduce a trajectory with the default (wrapped arithmetic) angle mean.
pub fn center_of_inertia(traj: &Trajectory, layout: &StateLayout) -> SimResult<CoiSeries> {
    center_of_inertia_with(traj, layout, CoiMethod::default())
}

/// Reduce a trajectory to per-area mean angle and mean frequency.
///
/// Empty areas produce NaN columns.
pub fn center_of_inertia_with(
    traj: &Trajectory,
    layout: &StateLayout,
    method: CoiMethod,
) -> SimResult<CoiSeries> {
    if traj.y.ncols() != layout.state_len() {
        return Err(SimError::IndexConsistency {
            what: format!(
                "trajectory has {} columns but the layout needs {}",
                traj.y.ncols(),
                layout.state_len()
            ),
        });
    }
    let samples = traj.y.nrows();
    let ns = layout.area_count();
    let mut angle = DMatrix::zeros(samples, ns);
    let mut frequency = DMatrix::zeros(samples, ns);

    let mut row = vec![0.0; layout.state_len()];
    for k in 0..samples {
        for (dst, src) in row.iter_mut().zip(traj.y.row(k).iter()) {
            *dst = *src;
        }
        for area in 0..ns {
            let deltas = &row[layout.angle_range(area)];
            angle[(k, area)] = match method {
                CoiMethod::WrappedArithmetic => wrapped_mean(deltas),
                CoiMethod::Circular => circular_mean(deltas),
            };
            frequency[(k, area)] = mean(&row[layout.frequency_range(area)]);
        }
    }

    Ok(CoiSeries { angle, frequency })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimStats;
    use core::f64::consts::{PI, TAU};

    fn traj(rows: &[&[f64]]) -> Trajectory {
        let cols = rows[0].len();
        let y = DMatrix::from_fn(rows.len(), cols, |r, c| rows[r][c]);
        Trajectory {
            t: (0..rows.len()).map(|k| k as f64).collect(),
            y,
            stats: SimStats::default(),
        }
    }

    #[test]
    fn means_per_area() {
        let layout = StateLayout::from_counts(&[2, 1]);
        // angles: -0.5, 0.5 | 7.0 ; freqs: 1, 3 | -2
        let t = traj(&[&[-0.5, 0.5, 7.0, 1.0, 3.0, -2.0]]);
        let coi = center_of_inertia(&t, &layout).unwrap();
        let expect0 = ((TAU - 0.5) + 0.5) / 2.0;
        assert!((coi.angle[(0, 0)] - expect0).abs() < 1e-12);
        assert!((coi.angle[(0, 1)] - (7.0 - TAU)).abs() < 1e-12);
        assert_eq!(coi.frequency[(0, 0)], 2.0);
        assert_eq!(coi.frequency[(0, 1)], -2.0);
    }

    #[test]
    fn wrapped_mean_artifact_preserved() {
        let layout = StateLayout::from_counts(&[2]);
        let t = traj(&[&[0.01, 6.27, 0.0, 0.0]]);
        let plain = center_of_inertia(&t, &layout).unwrap();
        assert!((plain.angle[(0, 0)] - PI).abs() < 0.01);

        let circ = center_of_inertia_with(&t, &layout, CoiMethod::Circular).unwrap();
        let a = circ.angle[(0, 0)];
        assert!(a < 0.01 || a > TAU - 0.01);
    }

    #[test]
    fn idempotent() {
        let layout = StateLayout::from_counts(&[2, 2]);
        let t = traj(&[
            &[0.1, 0.2, 0.3, 0.4, 0.0, 0.1, 0.2, 0.3],
            &[-3.0, 9.0, 1.0, 2.0, 0.5, 0.5, -0.5, 0.25],
        ]);
        let a = center_of_inertia(&t, &layout).unwrap();
        let b = center_of_inertia(&t, &layout).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.samples(), 2);
        assert_eq!(a.area_count(), 2);
        assert_eq!(a.peak_frequency(), vec![0.5, 0.25]);
    }

    #[test]
    fn column_mismatch_is_index_error() {
        let layout = StateLayout::from_counts(&[3]);
        let t = traj(&[&[0.0, 0.0]]);
        assert!(matches!(
            center_of_inertia(&t, &layout),
            Err(SimError::IndexConsistency { .. })
        ));
    }

    #[test]
    fn empty_area_is_nan() {
        let layout = StateLayout::from_counts(&[1, 0]);
        let t = traj(&[&[0.3, 0.0]]);
        let coi = center_of_inertia(&t, &layout).unwrap();
        assert!(coi.angle[(0, 1)].is_nan());
        assert!(coi.frequency[(0, 1)].is_nan());
    }
}
