//! Query helpers for inspecting a finished run.

use crate::error::{AppError, AppResult};
use crate::run_service::RunResponse;

/// Summary of a run's time range and shape.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub time_range: (f64, f64),
    pub sample_count: usize,
    pub area_count: usize,
    pub generator_count: usize,
    pub state_len: usize,
    /// Largest |COI frequency| per area
    pub peak_frequency: Vec<f64>,
    pub mismatch_count: usize,
}

/// One sampled row of the COI table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoiRow {
    pub t: f64,
    pub angle: Vec<f64>,
    pub frequency: Vec<f64>,
}

pub fn get_run_summary(response: &RunResponse) -> AppResult<RunSummary> {
    let t = &response.trajectory.t;
    let (Some(&t_min), Some(&t_max)) = (t.first(), t.last()) else {
        return Err(AppError::InvalidInput("No samples in run".to_string()));
    };

    Ok(RunSummary {
        time_range: (t_min, t_max),
        sample_count: t.len(),
        area_count: response.layout.area_count(),
        generator_count: response.layout.total_generators(),
        state_len: response.layout.state_len(),
        peak_frequency: response.coi.peak_frequency(),
        mismatch_count: response.mismatches.len(),
    })
}

/// Every `every`-th COI row, always ending with the final sample.
pub fn coi_table(response: &RunResponse, every: usize) -> AppResult<Vec<CoiRow>> {
    if every == 0 {
        return Err(AppError::InvalidInput(
            "Decimation step must be at least 1".to_string(),
        ));
    }
    let samples = response.coi.samples();
    let mut rows: Vec<usize> = (0..samples).step_by(every).collect();
    if let Some(&last) = rows.last()
        && last + 1 != samples
    {
        rows.push(samples - 1);
    }

    Ok(rows
        .into_iter()
        .map(|k| CoiRow {
            t: response.trajectory.t[k],
            angle: response.coi.angle.row(k).iter().copied().collect(),
            frequency: response.coi.frequency.row(k).iter().copied().collect(),
        })
        .collect())
}

/// `(t, value)` series for one area by name; `variable` is `angle` or
/// `frequency`.
pub fn area_series(
    response: &RunResponse,
    area_name: &str,
    variable: &str,
) -> AppResult<Vec<(f64, f64)>> {
    let area = response
        .area_names
        .iter()
        .position(|n| n == area_name)
        .ok_or_else(|| AppError::InvalidInput(format!("Unknown area: {}", area_name)))?;

    let values = match variable {
        "angle" | "delta" => response.coi.area_angle(area),
        "frequency" | "omega" => response.coi.area_frequency(area),
        _ => {
            return Err(AppError::InvalidInput(format!(
                "Unknown area variable: {}",
                variable
            )));
        }
    };

    Ok(response
        .trajectory
        .t
        .iter()
        .copied()
        .zip(values)
        .collect())
}
