//! Initial condition construction.
//!
//! Every generator starts at its area's equilibrium angle `asin(p_m / b)`
//! plus seeded Gaussian jitter, with zero frequency deviation. Disturbances
//! then overwrite individual initial angles.

use nalgebra::DVector;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};
use sw_grid::StateLayout;

use crate::error::{SimError, SimResult};
use crate::swing::SwingParams;

/// Seed used when none is configured.
pub const DEFAULT_SEED: u64 = 42;

/// Standard deviation of the initial angle jitter (rad).
pub const DEFAULT_JITTER_RAD: f64 = 0.01;

/// Forced initial angle of one generator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Disturbance {
    /// Area position (0-based, in layout order)
    pub area: usize,
    /// Generator number within the area (1-based)
    pub generator: usize,
    /// Initial angle override (rad)
    pub angle_rad: f64,
}

impl Disturbance {
    pub fn new(area: usize, generator: usize, angle_rad: f64) -> Self {
        Self {
            area,
            generator,
            angle_rad,
        }
    }

    /// Check the target exists in `layout` and the angle is usable.
    pub fn validate(&self, layout: &StateLayout) -> SimResult<()> {
        let ns = layout.area_count();
        if self.area >= ns {
            return Err(SimError::config(format!(
                "disturbance area {} out of range (areas: {})",
                self.area, ns
            )));
        }
        let n = layout.generator_count(self.area);
        if self.generator == 0 || self.generator > n {
            return Err(SimError::config(format!(
                "disturbance generator {} out of range 1..={} for area {}",
                self.generator, n, self.area
            )));
        }
        if !self.angle_rad.is_finite() {
            return Err(SimError::config("disturbance angle must be finite"));
        }
        Ok(())
    }

    /// Global angle index targeted by this disturbance (after validation).
    pub fn state_index(&self, layout: &StateLayout) -> usize {
        layout.angle_index(self.area, self.generator - 1)
    }
}

/// Equilibrium angle `asin(p_m / b)`.
///
/// Fails when the ratio is undefined or outside `[-1, 1]`.
pub fn equilibrium_angle(p_m: f64, b: f64) -> SimResult<f64> {
    if !p_m.is_finite() || !b.is_finite() {
        return Err(SimError::config(format!(
            "equilibrium undefined for non-finite p_m={} b={}",
            p_m, b
        )));
    }
    if b == 0.0 {
        return Err(SimError::config(format!(
            "equilibrium undefined for b=0 (p_m={})",
            p_m
        )));
    }
    let ratio = p_m / b;
    if ratio.abs() > 1.0 {
        return Err(SimError::config(format!(
            "equilibrium undefined: |p_m / b| = {} exceeds 1 (p_m={}, b={})",
            ratio.abs(),
            p_m,
            b
        )));
    }
    Ok(ratio.asin())
}

/// Builder for the `2G`-length initial state.
#[derive(Debug, Clone)]
pub struct InitialConditionBuilder {
    seed: u64,
    jitter_rad: f64,
    disturbances: Vec<Disturbance>,
}

impl Default for InitialConditionBuilder {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            jitter_rad: DEFAULT_JITTER_RAD,
            disturbances: Vec::new(),
        }
    }
}

impl InitialConditionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn jitter(mut self, jitter_rad: f64) -> Self {
        self.jitter_rad = jitter_rad;
        self
    }

    /// Append a disturbance; later entries win on the same generator.
    pub fn disturbance(mut self, d: Disturbance) -> Self {
        self.disturbances.push(d);
        self
    }

    pub fn disturbances(mut self, ds: impl IntoIterator<Item = Disturbance>) -> Self {
        self.disturbances.extend(ds);
        self
    }

    /// Equilibrium angle per area, validating every area first.
    pub fn equilibrium_angles(params: &SwingParams) -> SimResult<Vec<f64>> {
        params
            .p_m
            .iter()
            .zip(&params.b)
            .enumerate()
            .map(|(area, (&p_m, &b))| {
                equilibrium_angle(p_m, b).map_err(|e| match e {
                    SimError::Configuration { what } => {
                        SimError::config(format!("area {}: {}", area, what))
                    }
                    other => other,
                })
            })
            .collect()
    }

    /// Build the initial state.
    ///
    /// All inputs are validated before any state is produced.
    pub fn build(&self, layout: &StateLayout, params: &SwingParams) -> SimResult<DVector<f64>> {
        layout.check_consistency()?;
        params.check_len(layout.area_count())?;
        if !self.jitter_rad.is_finite() || self.jitter_rad < 0.0 {
            return Err(SimError::config(format!(
                "jitter must be finite and non-negative, got {}",
                self.jitter_rad
            )));
        }
        let equilibria = Self::equilibrium_angles(params)?;
        for d in &self.disturbances {
            d.validate(layout)?;
        }

        let normal = Normal::new(0.0, self.jitter_rad)
            .map_err(|e| SimError::config(format!("jitter distribution: {}", e)))?;
        let mut rng = StdRng::seed_from_u64(self.seed);

        let g_total = layout.total_generators();
        let mut x0 = DVector::zeros(2 * g_total);
        for (area, &delta_eq) in equilibria.iter().enumerate() {
            for idx in layout.angle_range(area) {
                x0[idx] = delta_eq + normal.sample(&mut rng);
            }
        }

        for d in &self.disturbances {
            let idx = d.state_index(layout);
            tracing::warn!(
                area = d.area,
                generator = d.generator,
                angle_rad = d.angle_rad,
                "applying disturbance"
            );
            x0[idx] = d.angle_rad;
        }

        Ok(x0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;

    #[test]
    fn equilibrium_special_values() {
        assert!((equilibrium_angle(1.0, 1.0).unwrap() - FRAC_PI_2).abs() < 1e-15);
        assert!((equilibrium_angle(2.5, 2.5).unwrap() - FRAC_PI_2).abs() < 1e-15);
        assert_eq!(equilibrium_angle(0.0, 1.0).unwrap(), 0.0);
        assert!((equilibrium_angle(0.95, 1.0).unwrap() - 1.2532).abs() < 1e-4);
    }

    #[test]
    fn equilibrium_out_of_domain_rejected() {
        assert!(matches!(
            equilibrium_angle(1.2, 1.0),
            Err(SimError::Configuration { .. })
        ));
        assert!(equilibrium_angle(0.5, 0.0).is_err());
        assert!(equilibrium_angle(f64::NAN, 1.0).is_err());
        assert!(equilibrium_angle(-1.0, 1.0).is_ok());
    }

    #[test]
    fn jittered_angles_deterministic() {
        let layout = StateLayout::from_counts(&[3, 4]);
        let params = SwingParams::uniform(2, 0.5, 1.0, 100.0, 0.1);
        let builder = InitialConditionBuilder::new().seed(7);
        let a = builder.build(&layout, &params).unwrap();
        let b = builder.build(&layout, &params).unwrap();
        assert_eq!(a, b);

        let c = InitialConditionBuilder::new()
            .seed(8)
            .build(&layout, &params)
            .unwrap();
        assert_ne!(a, c);
    }

    #[test]
    fn frequencies_start_at_zero_and_angles_near_equilibrium() {
        let layout = StateLayout::from_counts(&[5, 5]);
        let params = SwingParams::uniform(2, 0.95, 1.0, 100.0, 0.1);
        let x0 = InitialConditionBuilder::new().build(&layout, &params).unwrap();
        let eq = 0.95_f64.asin();
        for i in 0..10 {
            assert!((x0[i] - eq).abs() < 0.1);
            assert_eq!(x0[10 + i], 0.0);
        }
    }

    #[test]
    fn zero_jitter_gives_exact_equilibrium() {
        let layout = StateLayout::from_counts(&[2]);
        let params = SwingParams::uniform(1, 0.5, 1.0, 1.0, 0.1);
        let x0 = InitialConditionBuilder::new()
            .jitter(0.0)
            .build(&layout, &params)
            .unwrap();
        assert_eq!(x0[0], 0.5_f64.asin());
        assert_eq!(x0[1], 0.5_f64.asin());
    }

    #[test]
    fn later_disturbance_wins() {
        let layout = StateLayout::from_counts(&[2, 2]);
        let params = SwingParams::uniform(2, 0.5, 1.0, 1.0, 0.1);
        let x0 = InitialConditionBuilder::new()
            .disturbance(Disturbance::new(1, 2, 0.3))
            .disturbance(Disturbance::new(1, 2, -0.7))
            .build(&layout, &params)
            .unwrap();
        assert_eq!(x0[3], -0.7);
    }

    #[test]
    fn invalid_disturbance_rejected_before_building() {
        let layout = StateLayout::from_counts(&[2, 2]);
        let params = SwingParams::uniform(2, 0.5, 1.0, 1.0, 0.1);
        for d in [
            Disturbance::new(2, 1, 0.0),
            Disturbance::new(0, 0, 0.0),
            Disturbance::new(0, 3, 0.0),
            Disturbance::new(0, 1, f64::INFINITY),
        ] {
            let err = InitialConditionBuilder::new()
                .disturbance(d)
                .build(&layout, &params)
                .unwrap_err();
            assert!(matches!(err, SimError::Configuration { .. }), "{d:?}");
        }
    }

    #[test]
    fn bad_area_reported_with_index() {
        let layout = StateLayout::from_counts(&[1, 1]);
        let params = SwingParams {
            p_m: vec![0.5, 3.0],
            b: vec![1.0, 1.0],
            b_int: vec![1.0, 1.0],
            epsilon: vec![0.1, 0.1],
        };
        let err = InitialConditionBuilder::new()
            .build(&layout, &params)
            .unwrap_err();
        assert!(err.to_string().contains("area 1"));
    }

    #[test]
    fn negative_jitter_rejected() {
        let layout = StateLayout::from_counts(&[1]);
        let params = SwingParams::uniform(1, 0.5, 1.0, 1.0, 0.1);
        assert!(
            InitialConditionBuilder::new()
                .jitter(-0.1)
                .build(&layout, &params)
                .is_err()
        );
    }
}
