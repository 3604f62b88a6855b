//! Simulation runner and trajectory recording.

use nalgebra::{DMatrix, DVector};
use sw_core::first_non_finite;

use crate::error::{SimError, SimResult};
use crate::integrator::{DormandPrince, ForwardEuler, Integrator, RK4};
use crate::model::TransientModel;
use crate::time::TimeGrid;

/// Integrator selection for simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntegratorType {
    /// Adaptive Dormand-Prince 5(4) (default).
    #[default]
    DormandPrince,
    /// 4th-order Runge-Kutta at fixed `dt`.
    RK4,
    /// Forward Euler at fixed `dt`.
    ForwardEuler,
}

/// Options for simulation runs.
#[derive(Clone, Debug)]
pub struct SimOptions {
    /// Integrator type (default: DormandPrince)
    pub integrator: IntegratorType,
    /// Relative tolerance (adaptive only)
    pub rtol: f64,
    /// Absolute tolerance (adaptive only)
    pub atol: f64,
    /// Fixed step for RK4 / Euler (seconds)
    pub dt: f64,
    /// First trial step for the adaptive method; estimated when `None`
    pub initial_dt: Option<f64>,
    /// Smallest step the adaptive method may take before giving up
    pub min_dt: f64,
    /// Largest step any method may take
    pub max_dt: Option<f64>,
    /// Attempted-step budget for the whole run (safety limit)
    pub max_steps: usize,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            integrator: IntegratorType::default(),
            rtol: 1.49012e-8,
            atol: 1.49012e-8,
            dt: 1e-3,
            initial_dt: None,
            min_dt: 1e-12,
            max_dt: None,
            max_steps: 500_000,
        }
    }
}

impl SimOptions {
    fn validate(&self) -> SimResult<()> {
        if !(self.rtol > 0.0) || !(self.atol > 0.0) {
            return Err(SimError::InvalidArg {
                what: "rtol and atol must be positive",
            });
        }
        if !(self.dt > 0.0) || !self.dt.is_finite() {
            return Err(SimError::InvalidArg {
                what: "dt must be positive",
            });
        }
        if self.initial_dt.is_some_and(|h| !(h > 0.0)) {
            return Err(SimError::InvalidArg {
                what: "initial_dt must be positive",
            });
        }
        if !(self.min_dt > 0.0) {
            return Err(SimError::InvalidArg {
                what: "min_dt must be positive",
            });
        }
        if self.max_dt.is_some_and(|h| !(h > 0.0)) {
            return Err(SimError::InvalidArg {
                what: "max_dt must be positive",
            });
        }
        if self.max_steps == 0 {
            return Err(SimError::InvalidArg {
                what: "max_steps must be positive",
            });
        }
        Ok(())
    }
}

/// Progress snapshot, emitted once per recorded sample.
#[derive(Clone, Debug)]
pub struct SimProgress {
    /// Index of the sample just recorded
    pub sample: usize,
    /// Total samples in the grid
    pub samples: usize,
    /// Simulation time of the sample (s)
    pub t: f64,
    /// Steps accepted so far
    pub accepted_steps: usize,
    /// Steps rejected so far
    pub rejected_steps: usize,
    pub fraction_complete: f64,
}

/// Step accounting for a finished run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub accepted_steps: usize,
    pub rejected_steps: usize,
    pub rhs_evals: usize,
}

/// Dense trajectory: row `k` of `y` is the state at `t[k]`.
#[derive(Clone, Debug)]
pub struct Trajectory {
    /// Sample times (seconds)
    pub t: Vec<f64>,
    /// State samples, shape `(t.len(), dim)`
    pub y: DMatrix<f64>,
    pub stats: SimStats,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }

    /// State at sample `k` as an owned vector.
    pub fn state(&self, k: usize) -> DVector<f64> {
        self.y.row(k).transpose()
    }

    /// Final recorded state.
    pub fn last_state(&self) -> Option<DVector<f64>> {
        (!self.is_empty()).then(|| self.state(self.len() - 1))
    }
}

/// Integrate `model` across `grid`, sampling exactly at every grid point.
pub fn run_sim<M: TransientModel>(
    model: &M,
    grid: &TimeGrid,
    opts: &SimOptions,
) -> SimResult<Trajectory> {
    run_sim_with_progress(model, grid, opts, None)
}

/// [`run_sim`] with a callback invoked after each recorded sample.
pub fn run_sim_with_progress<M: TransientModel>(
    model: &M,
    grid: &TimeGrid,
    opts: &SimOptions,
    progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<Trajectory> {
    opts.validate()?;
    match opts.integrator {
        IntegratorType::DormandPrince => {
            let integrator = DormandPrince {
                rtol: opts.rtol,
                atol: opts.atol,
            };
            drive(&integrator, model, grid, opts, progress)
        }
        IntegratorType::RK4 => drive(&RK4, model, grid, opts, progress),
        IntegratorType::ForwardEuler => drive(&ForwardEuler, model, grid, opts, progress),
    }
}

// Step-size controller limits
const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

fn drive<I: Integrator, M: TransientModel>(
    integrator: &I,
    model: &M,
    grid: &TimeGrid,
    opts: &SimOptions,
    mut progress: Option<&mut dyn FnMut(SimProgress)>,
) -> SimResult<Trajectory> {
    let mut x = model.initial_state();
    if x.len() != model.dim() {
        return Err(SimError::IndexConsistency {
            what: format!(
                "initial state has length {} but the model dimension is {}",
                x.len(),
                model.dim()
            ),
        });
    }
    if let Some((i, v)) = first_non_finite(x.as_slice()) {
        return Err(SimError::config(format!(
            "initial state entry {} is non-finite ({})",
            i, v
        )));
    }

    let times = grid.points();
    let samples = times.len();
    let mut y = DMatrix::zeros(samples, x.len());
    y.row_mut(0).tr_copy_from(&x);

    let mut t = times[0];
    let mut stats = SimStats::default();
    let max_dt = opts.max_dt.unwrap_or(f64::INFINITY);
    let exponent = -1.0 / integrator.order() as f64;

    let first_dt = if integrator.adaptive() {
        match opts.initial_dt {
            Some(h) => h,
            None => {
                stats.rhs_evals += 1;
                let span = grid.end() - grid.start();
                let span = if span > 0.0 { span } else { 1.0 };
                estimate_initial_step(opts, model, t, &x, span)?
            }
        }
    } else {
        opts.dt
    };
    let mut h_next = first_dt.min(max_dt);

    emit(&mut progress, snapshot(0, samples, t, &stats));

    for (k, &target) in times.iter().enumerate().skip(1) {
        while t < target {
            if stats.accepted_steps + stats.rejected_steps >= opts.max_steps {
                return Err(SimError::IntegrationFailed {
                    t,
                    message: format!("step budget of {} exhausted", opts.max_steps),
                    state: x.iter().copied().collect(),
                });
            }

            let remaining = target - t;
            let clipped = h_next >= remaining;
            let h = if clipped { remaining } else { h_next };

            let step = integrator.step(model, t, &x, h)?;
            stats.rhs_evals += step.rhs_evals;

            if integrator.adaptive() {
                let ratio = step.error_ratio;
                let finite = ratio.is_finite() && first_non_finite(step.x.as_slice()).is_none();
                if finite && ratio <= 1.0 {
                    stats.accepted_steps += 1;
                    t = if clipped { target } else { t + h };
                    x = step.x;
                    let factor = if ratio == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * ratio.powf(exponent)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    let proposal = (h * factor).min(max_dt);
                    h_next = if clipped {
                        h_next.max(proposal).min(max_dt)
                    } else {
                        proposal
                    };
                } else {
                    stats.rejected_steps += 1;
                    let factor = if finite {
                        (SAFETY * ratio.powf(exponent)).clamp(MIN_FACTOR, 1.0)
                    } else {
                        MIN_FACTOR
                    };
                    h_next = h * factor;
                    if h_next < opts.min_dt {
                        return Err(SimError::IntegrationFailed {
                            t,
                            message: if finite {
                                format!("step size {:e} fell below min_dt", h_next)
                            } else {
                                "non-finite state or error estimate".to_string()
                            },
                            state: x.iter().copied().collect(),
                        });
                    }
                }
            } else {
                if let Some((i, v)) = first_non_finite(step.x.as_slice()) {
                    return Err(SimError::IntegrationFailed {
                        t: t + h,
                        message: format!("state entry {} became non-finite ({})", i, v),
                        state: x.iter().copied().collect(),
                    });
                }
                stats.accepted_steps += 1;
                t = if clipped { target } else { t + h };
                x = step.x;
                h_next = opts.dt.min(max_dt);
            }
        }
        y.row_mut(k).tr_copy_from(&x);
        emit(&mut progress, snapshot(k, samples, t, &stats));
    }

    tracing::debug!(
        accepted = stats.accepted_steps,
        rejected = stats.rejected_steps,
        rhs_evals = stats.rhs_evals,
        "integration finished"
    );

    Ok(Trajectory {
        t: times.to_vec(),
        y,
        stats,
    })
}

fn snapshot(k: usize, samples: usize, t: f64, stats: &SimStats) -> SimProgress {
    SimProgress {
        sample: k,
        samples,
        t,
        accepted_steps: stats.accepted_steps,
        rejected_steps: stats.rejected_steps,
        fraction_complete: if samples > 1 {
            k as f64 / (samples - 1) as f64
        } else {
            1.0
        },
    }
}

fn emit(progress: &mut Option<&mut dyn FnMut(SimProgress)>, p: SimProgress) {
    if let Some(cb) = progress.as_mut() {
        cb(p);
    }
}

fn estimate_initial_step<M: TransientModel>(
    opts: &SimOptions,
    model: &M,
    t: f64,
    x: &DVector<f64>,
    span: f64,
) -> SimResult<f64> {
    let dp = DormandPrince {
        rtol: opts.rtol,
        atol: opts.atol,
    };
    Ok(dp.initial_step(model, t, x, span)?.max(opts.min_dt))
}
