use thiserror::Error;

pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised by the unit helpers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("Non-finite value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Cannot parse angle '{text}' (expected a number with optional 'rad' or 'deg' suffix)")]
    AngleParse { text: String },
}
