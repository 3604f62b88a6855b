//! TransientModel trait for pluggable dynamic systems.

use nalgebra::DVector;

use crate::error::SimResult;

/// Trait for transient (dynamic) system models over a flat real state.
///
/// `rhs` takes `&self`: integrators evaluate it at trial points and
/// out-of-order times, so a model must not carry state between calls.
pub trait TransientModel {
    /// Length of the state vector.
    fn dim(&self) -> usize;

    /// Return the initial state at the first sample time.
    fn initial_state(&self) -> DVector<f64>;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>>;
}
