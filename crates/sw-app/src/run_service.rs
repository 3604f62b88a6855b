//! Run execution service.

use std::time::Instant;
use sw_grid::{ChainMismatch, StateLayout};
use sw_project::Scenario;
use sw_sim::{CoiMethod, CoiSeries, SimProgress, Trajectory, center_of_inertia_with};

use crate::error::AppResult;
use crate::progress::{RunProgressEvent, RunStage, TransientProgress};
use crate::runtime_compile;

/// Options for running simulations.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    pub coi_method: CoiMethod,
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub scenario: &'a Scenario,
    pub options: RunOptions,
}

/// Concise timing and execution summary for a run.
#[derive(Debug, Clone, Default)]
pub struct RunTimingSummary {
    pub compile_time_s: f64,
    pub solve_time_s: f64,
    pub aggregate_time_s: f64,
    pub total_time_s: f64,
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
}

/// Response from a run execution.
#[derive(Debug, Clone)]
pub struct RunResponse {
    pub scenario_name: String,
    /// Selected area names in selection order
    pub area_names: Vec<String>,
    pub layout: StateLayout,
    pub trajectory: Trajectory,
    pub coi: CoiSeries,
    pub mismatches: Vec<ChainMismatch>,
    pub timing: RunTimingSummary,
}

fn emit_progress(
    progress_cb: &mut Option<&mut dyn FnMut(RunProgressEvent)>,
    stage: RunStage,
    started: Instant,
    message: Option<String>,
    transient: Option<TransientProgress>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        let mut event = RunProgressEvent::stage(stage, started.elapsed().as_secs_f64(), message);
        event.transient = transient;
        cb(event);
    }
}

/// Compile and execute a scenario.
pub fn run_scenario(request: &RunRequest) -> AppResult<RunResponse> {
    run_scenario_with_progress(request, None)
}

/// Compile and execute a scenario, streaming progress events.
pub fn run_scenario_with_progress(
    request: &RunRequest,
    mut progress_cb: Option<&mut dyn FnMut(RunProgressEvent)>,
) -> AppResult<RunResponse> {
    let started = Instant::now();
    let mut timing = RunTimingSummary::default();

    emit_progress(
        &mut progress_cb,
        RunStage::CompilingRuntime,
        started,
        Some("Compiling scenario".to_string()),
        None,
    );

    let compile_started = Instant::now();
    let runtime = runtime_compile::compile_scenario(request.scenario)?;
    timing.compile_time_s = compile_started.elapsed().as_secs_f64();

    tracing::info!(
        scenario = %request.scenario.name,
        areas = runtime.layout.area_count(),
        generators = runtime.layout.total_generators(),
        samples = runtime.grid.len(),
        integrator = ?runtime.options.integrator,
        "starting swing simulation"
    );

    emit_progress(
        &mut progress_cb,
        RunStage::Integrating,
        started,
        Some("Integrating".to_string()),
        None,
    );

    let solve_started = Instant::now();
    let t_end_s = runtime.grid.end();
    let trajectory = if progress_cb.is_some() {
        let mut forward = |p: SimProgress| {
            emit_progress(
                &mut progress_cb,
                RunStage::Integrating,
                started,
                None,
                Some(TransientProgress {
                    sim_time_s: p.t,
                    t_end_s,
                    fraction_complete: p.fraction_complete,
                    sample: p.sample,
                    samples: p.samples,
                    accepted_steps: p.accepted_steps,
                    rejected_steps: p.rejected_steps,
                }),
            )
        };
        sw_sim::run_sim_with_progress(
            &runtime.model,
            &runtime.grid,
            &runtime.options,
            Some(&mut forward as &mut dyn FnMut(SimProgress)),
        )?
    } else {
        sw_sim::run_sim(&runtime.model, &runtime.grid, &runtime.options)?
    };
    timing.solve_time_s = solve_started.elapsed().as_secs_f64();
    timing.accepted_steps = trajectory.stats.accepted_steps;
    timing.rejected_steps = trajectory.stats.rejected_steps;
    timing.rhs_evals = trajectory.stats.rhs_evals;

    emit_progress(
        &mut progress_cb,
        RunStage::Aggregating,
        started,
        Some("Computing center of inertia".to_string()),
        None,
    );

    let aggregate_started = Instant::now();
    let coi = center_of_inertia_with(&trajectory, &runtime.layout, request.options.coi_method)?;
    timing.aggregate_time_s = aggregate_started.elapsed().as_secs_f64();
    timing.total_time_s = started.elapsed().as_secs_f64();

    tracing::info!(
        scenario = %request.scenario.name,
        accepted_steps = timing.accepted_steps,
        rejected_steps = timing.rejected_steps,
        rhs_evals = timing.rhs_evals,
        total_time_s = timing.total_time_s,
        "swing simulation finished"
    );

    emit_progress(
        &mut progress_cb,
        RunStage::Completed,
        started,
        Some("Run completed".to_string()),
        None,
    );

    Ok(RunResponse {
        scenario_name: request.scenario.name.clone(),
        area_names: runtime.topology.names,
        layout: runtime.layout,
        trajectory,
        coi,
        mismatches: runtime.topology.mismatches,
        timing,
    })
}
