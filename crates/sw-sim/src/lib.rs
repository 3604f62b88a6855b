//! Transient swing simulation for multi-area generator networks.
//!
//! Provides:
//! - Swing equation right-hand side over a flat (δ, ω) state vector
//! - Equilibrium-plus-jitter initial conditions with disturbance injection
//! - Adaptive Dormand-Prince and fixed-step RK4 / Euler integrators
//! - Center-of-inertia reduction of trajectories per area

pub mod coi;
pub mod error;
pub mod initial;
pub mod integrator;
pub mod model;
pub mod sim;
pub mod swing;
pub mod time;

// Re-exports for public API
pub use coi::{CoiMethod, CoiSeries, center_of_inertia, center_of_inertia_with};
pub use error::{SimError, SimResult};
pub use initial::{
    DEFAULT_JITTER_RAD, DEFAULT_SEED, Disturbance, InitialConditionBuilder, equilibrium_angle,
};
pub use integrator::{DormandPrince, ForwardEuler, Integrator, RK4, StepResult};
pub use model::TransientModel;
pub use sim::{
    IntegratorType, SimOptions, SimProgress, SimStats, Trajectory, run_sim, run_sim_with_progress,
};
pub use swing::{SwingModel, SwingParams};
pub use time::TimeGrid;
