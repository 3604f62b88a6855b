//! Shared application service layer for swingnet.
//!
//! Loads scenarios, compiles them into a runnable swing model, executes the
//! integration and reduces the result to per-area series. The CLI is a thin
//! shell over this crate.

pub mod error;
pub mod progress;
pub mod project_service;
pub mod query;
pub mod run_service;
pub mod runtime_compile;

pub use error::{AppError, AppResult};
pub use progress::{RunProgressEvent, RunStage, TransientProgress};
pub use project_service::{
    AreaSummary, list_areas, load_scenario, reselect, save_scenario, validate_scenario,
};
pub use query::{CoiRow, RunSummary, area_series, coi_table, get_run_summary};
pub use run_service::{
    RunOptions, RunRequest, RunResponse, RunTimingSummary, run_scenario,
    run_scenario_with_progress,
};
pub use runtime_compile::{
    SystemRuntime, TopologyReport, build_adjacency, build_area_table, compile_scenario,
    compile_topology, sim_options,
};
pub use sw_grid::ChainMismatch;
