//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered while building or integrating a swing model.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Unusable parameters or inputs, raised before any numerical work.
    #[error("Configuration error: {what}")]
    Configuration { what: String },

    /// The integrator could not advance; carries the last accepted state.
    #[error("Integration failed at t={t}: {message}")]
    IntegrationFailed {
        t: f64,
        message: String,
        state: Vec<f64>,
    },

    /// Internal indexing invariant broken.
    #[error("Index consistency violated: {what}")]
    IndexConsistency { what: String },
}

pub type SimResult<T> = Result<T, SimError>;

impl SimError {
    pub(crate) fn config(what: impl Into<String>) -> Self {
        SimError::Configuration { what: what.into() }
    }
}

impl From<sw_grid::GridError> for SimError {
    fn from(e: sw_grid::GridError) -> Self {
        match e {
            sw_grid::GridError::OffsetMismatch { .. } => SimError::IndexConsistency {
                what: e.to_string(),
            },
            other => SimError::Configuration {
                what: other.to_string(),
            },
        }
    }
}
