//! Single-step time integrators.
//!
//! Fixed-step methods always accept their step. [`DormandPrince`] also
//! returns a scaled error estimate that the driver in [`crate::sim`] uses for
//! step-size control.

use nalgebra::DVector;

use crate::error::SimResult;
use crate::model::TransientModel;

/// Outcome of one attempted step.
#[derive(Clone, Debug)]
pub struct StepResult {
    /// Proposed state at `t + dt`
    pub x: DVector<f64>,
    /// Weighted RMS error over the tolerance; `<= 1` means acceptable.
    /// Always 0 for fixed-step methods.
    pub error_ratio: f64,
    /// Number of rhs evaluations spent
    pub rhs_evals: usize,
}

/// Trait for time integrators.
pub trait Integrator {
    /// Attempt one step of size `dt` from `(t, x)`.
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepResult>;

    /// Whether `error_ratio` is meaningful.
    fn adaptive(&self) -> bool {
        false
    }

    /// Order of the propagated solution.
    fn order(&self) -> u32;
}

/// Classical RK4 (Runge-Kutta 4th order) integrator.
#[derive(Clone, Debug)]
pub struct RK4;

impl Integrator for RK4 {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepResult> {
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + 0.5 * dt, &(x + &k1 * (0.5 * dt)))?;
        let k3 = model.rhs(t + 0.5 * dt, &(x + &k2 * (0.5 * dt)))?;
        let k4 = model.rhs(t + dt, &(x + &k3 * dt))?;

        // x_new = x + (dt/6) * (k1 + 2*k2 + 2*k3 + k4)
        let k_sum = k1 + k2 * 2.0 + k3 * 2.0 + k4;
        Ok(StepResult {
            x: x + k_sum * (dt / 6.0),
            error_ratio: 0.0,
            rhs_evals: 4,
        })
    }

    fn order(&self) -> u32 {
        4
    }
}

/// Forward Euler (explicit, 1st order, fast for testing).
#[derive(Clone, Debug)]
pub struct ForwardEuler;

impl Integrator for ForwardEuler {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepResult> {
        let xdot = model.rhs(t, x)?;
        Ok(StepResult {
            x: x + xdot * dt,
            error_ratio: 0.0,
            rhs_evals: 1,
        })
    }

    fn order(&self) -> u32 {
        1
    }
}

// Dormand-Prince 5(4) tableau
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// 5th-order weights (b2 = b7 = 0)
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// 5th minus 4th order weights
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

/// Embedded Dormand-Prince RK5(4) with mixed absolute/relative error norm.
#[derive(Clone, Debug)]
pub struct DormandPrince {
    pub rtol: f64,
    pub atol: f64,
}

impl Default for DormandPrince {
    fn default() -> Self {
        Self {
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
        }
    }
}

impl DormandPrince {
    /// Weighted RMS norm of `v` against the tolerance scale of `x0`/`x1`.
    pub fn scaled_norm(&self, v: &DVector<f64>, x0: &DVector<f64>, x1: &DVector<f64>) -> f64 {
        if v.is_empty() {
            return 0.0;
        }
        let sum: f64 = v
            .iter()
            .zip(x0.iter().zip(x1.iter()))
            .map(|(&e, (&a, &b))| {
                let sc = self.atol + self.rtol * a.abs().max(b.abs());
                (e / sc) * (e / sc)
            })
            .sum();
        (sum / v.len() as f64).sqrt()
    }

    /// Starting step guess from the initial slope, capped at `span`.
    pub fn initial_step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        span: f64,
    ) -> SimResult<f64> {
        let f0 = model.rhs(t, x)?;
        let d0 = self.scaled_norm(x, x, x);
        let d1 = self.scaled_norm(&f0, x, x);
        let h0 = if d0 < 1e-5 || d1 < 1e-5 {
            1e-6
        } else {
            0.01 * d0 / d1
        };
        Ok(h0.min(span))
    }
}

impl Integrator for DormandPrince {
    fn step<M: TransientModel>(
        &self,
        model: &M,
        t: f64,
        x: &DVector<f64>,
        dt: f64,
    ) -> SimResult<StepResult> {
        let h = dt;
        let k1 = model.rhs(t, x)?;
        let k2 = model.rhs(t + C2 * h, &(x + &k1 * (h * A21)))?;
        let k3 = model.rhs(t + C3 * h, &(x + (&k1 * A31 + &k2 * A32) * h))?;
        let k4 = model.rhs(
            t + C4 * h,
            &(x + (&k1 * A41 + &k2 * A42 + &k3 * A43) * h),
        )?;
        let k5 = model.rhs(
            t + C5 * h,
            &(x + (&k1 * A51 + &k2 * A52 + &k3 * A53 + &k4 * A54) * h),
        )?;
        let k6 = model.rhs(
            t + h,
            &(x + (&k1 * A61 + &k2 * A62 + &k3 * A63 + &k4 * A64 + &k5 * A65) * h),
        )?;

        let x_new = x + (&k1 * B1 + &k3 * B3 + &k4 * B4 + &k5 * B5 + &k6 * B6) * h;
        let k7 = model.rhs(t + h, &x_new)?;

        let err = (&k1 * E1 + &k3 * E3 + &k4 * E4 + &k5 * E5 + &k6 * E6 + &k7 * E7) * h;
        let error_ratio = self.scaled_norm(&err, x, &x_new);

        Ok(StepResult {
            x: x_new,
            error_ratio,
            rhs_evals: 7,
        })
    }

    fn adaptive(&self) -> bool {
        true
    }

    fn order(&self) -> u32 {
        5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SimResult;

    /// dx/dt = -x
    struct Decay;

    impl TransientModel for Decay {
        fn dim(&self) -> usize {
            1
        }

        fn initial_state(&self) -> DVector<f64> {
            DVector::from_element(1, 1.0)
        }

        fn rhs(&self, _t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
            Ok(-x)
        }
    }

    #[test]
    fn rk4_matches_exponential() {
        let x0 = Decay.initial_state();
        let step = RK4.step(&Decay, 0.0, &x0, 0.1).unwrap();
        assert!((step.x[0] - (-0.1_f64).exp()).abs() < 1e-6);
        assert_eq!(step.rhs_evals, 4);
    }

    #[test]
    fn euler_single_step() {
        let x0 = Decay.initial_state();
        let step = ForwardEuler.step(&Decay, 0.0, &x0, 0.1).unwrap();
        assert!((step.x[0] - 0.9).abs() < 1e-15);
        assert!(!ForwardEuler.adaptive());
    }

    #[test]
    fn dormand_prince_accurate_and_estimates_error() {
        let dp = DormandPrince::default();
        let x0 = Decay.initial_state();
        let small = dp.step(&Decay, 0.0, &x0, 0.01).unwrap();
        assert!((small.x[0] - (-0.01_f64).exp()).abs() < 1e-12);
        assert!(small.error_ratio <= 1.0);

        let big = dp.step(&Decay, 0.0, &x0, 1.0).unwrap();
        assert!(big.error_ratio > 1.0);
        assert!(dp.adaptive());
    }

    #[test]
    fn initial_step_respects_span() {
        let dp = DormandPrince::default();
        let h = dp
            .initial_step(&Decay, 0.0, &Decay.initial_state(), 1e-3)
            .unwrap();
        assert!(h > 0.0 && h <= 1e-3);
    }
}
