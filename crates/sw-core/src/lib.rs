//! sw-core: stable foundation for swingnet.
//!
//! Contains:
//! - units (uom SI angle type + parsing)
//! - numeric (Real + float helpers)
//! - angle (phase wrapping and means)
//! - error (shared error types)

pub mod angle;
pub mod error;
pub mod numeric;
pub mod units;

// Re-exports: nice ergonomics for downstream crates
pub use angle::*;
pub use error::{CoreError, CoreResult};
pub use numeric::*;
pub use units::*;
