//! Error types for the sw-app service layer.

use std::path::PathBuf;

/// Unified error for the CLI over all backend crates.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Scenario error: {0}")]
    Project(String),

    #[error("Failed to read scenario file: {path}")]
    ProjectFileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write scenario file: {path}")]
    ProjectFileWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Scenario validation failed: {0}")]
    Validation(String),

    #[error("Runtime compilation failed: {0}")]
    Compile(String),

    #[error("Simulation error: {0}")]
    Simulation(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sw-app operations.
pub type AppResult<T> = Result<T, AppError>;

impl From<sw_project::ProjectError> for AppError {
    fn from(err: sw_project::ProjectError) -> Self {
        match err {
            sw_project::ProjectError::Validation(v) => AppError::Validation(v.to_string()),
            other => AppError::Project(other.to_string()),
        }
    }
}

impl From<sw_project::ValidationError> for AppError {
    fn from(err: sw_project::ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<sw_grid::GridError> for AppError {
    fn from(err: sw_grid::GridError) -> Self {
        AppError::Compile(err.to_string())
    }
}

impl From<sw_sim::SimError> for AppError {
    fn from(err: sw_sim::SimError) -> Self {
        AppError::Simulation(err.to_string())
    }
}
