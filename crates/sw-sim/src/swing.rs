//! Multi-area swing equation model.
//!
//! State layout follows [`StateLayout`]: all angles first, then all
//! frequency deviations, both area-by-area. For generator `idx` of area `i`:
//!
//! ```text
//! dδ/dt = ω
//! dω/dt = p_m[i] - b[i]·sin δ
//!         - b_int[i]·(sin(δ - δ_prev) + sin(δ - δ_next))
//!         - ε[i]·b_int[i]·g
//! ```
//!
//! where `prev`/`next` close a ring inside the area and `g` couples areas
//! along selection order: the first generator of area `i` to the middle
//! generator of area `i - 1`, and the middle generator of area `i` to the
//! first generator of area `i + 1`. Angles are never wrapped here.

use nalgebra::DVector;
use sw_grid::{AreaTable, StateLayout};

use crate::error::{SimError, SimResult};
use crate::model::TransientModel;

/// Per-area swing coefficients, indexed like the layout's areas.
#[derive(Debug, Clone, PartialEq)]
pub struct SwingParams {
    pub p_m: Vec<f64>,
    pub b: Vec<f64>,
    pub b_int: Vec<f64>,
    pub epsilon: Vec<f64>,
}

impl SwingParams {
    pub fn from_table(table: &AreaTable) -> Self {
        Self {
            p_m: table.p_m(),
            b: table.b(),
            b_int: table.b_int(),
            epsilon: table.epsilon(),
        }
    }

    /// Same coefficients for every one of `ns` areas.
    pub fn uniform(ns: usize, p_m: f64, b: f64, b_int: f64, epsilon: f64) -> Self {
        Self {
            p_m: vec![p_m; ns],
            b: vec![b; ns],
            b_int: vec![b_int; ns],
            epsilon: vec![epsilon; ns],
        }
    }

    pub fn area_count(&self) -> usize {
        self.p_m.len()
    }

    pub(crate) fn check_len(&self, ns: usize) -> SimResult<()> {
        let lens = [
            self.p_m.len(),
            self.b.len(),
            self.b_int.len(),
            self.epsilon.len(),
        ];
        if lens.iter().any(|&l| l != ns) {
            return Err(SimError::config(format!(
                "parameter arrays have lengths {:?} but the layout has {} areas",
                lens, ns
            )));
        }
        Ok(())
    }
}

/// Swing dynamics of a chain of generator rings.
#[derive(Debug, Clone)]
pub struct SwingModel {
    layout: StateLayout,
    params: SwingParams,
    initial: DVector<f64>,
}

impl SwingModel {
    pub fn new(layout: StateLayout, params: SwingParams, initial: DVector<f64>) -> SimResult<Self> {
        layout.check_consistency()?;
        params.check_len(layout.area_count())?;
        if initial.len() != layout.state_len() {
            return Err(SimError::config(format!(
                "initial state has length {} but the layout needs {}",
                initial.len(),
                layout.state_len()
            )));
        }
        Ok(Self {
            layout,
            params,
            initial,
        })
    }

    pub fn layout(&self) -> &StateLayout {
        &self.layout
    }

    pub fn params(&self) -> &SwingParams {
        &self.params
    }

    /// Ring coupling sum `sin(δ - δ_prev) + sin(δ - δ_next)` of one generator.
    ///
    /// Zero for a single-generator area, whose ring neighbours are itself.
    pub fn intra_area_term(&self, x: &[f64], area: usize, local: usize) -> f64 {
        let Some((prev, next)) = self.layout.ring_neighbors(area, local) else {
            return 0.0;
        };
        let delta = x[self.layout.angle_index(area, local)];
        (delta - x[prev]).sin() + (delta - x[next]).sin()
    }

    /// Inter-area coupling sum `g` of one generator.
    pub fn inter_area_term(&self, x: &[f64], area: usize, local: usize) -> f64 {
        let ns = self.layout.area_count();
        let n = self.layout.generator_count(area);
        let delta = x[self.layout.angle_index(area, local)];
        let mut g = 0.0;
        if area > 0
            && local == 0
            && let Some(m) = self.layout.middle_index(area - 1)
        {
            g += (delta - x[m]).sin();
        }
        if area + 1 < ns
            && local == n / 2
            && let Some(m) = self.layout.first_index(area + 1)
        {
            g += (delta - x[m]).sin();
        }
        g
    }

    /// Evaluate the derivative into `dx` without allocating.
    ///
    /// Both slices must have length `2G`.
    pub fn rhs_into(&self, x: &[f64], dx: &mut [f64]) {
        let g_total = self.layout.total_generators();
        for area in 0..self.layout.area_count() {
            let p_m = self.params.p_m[area];
            let b = self.params.b[area];
            let b_int = self.params.b_int[area];
            let eps = self.params.epsilon[area];
            for local in 0..self.layout.generator_count(area) {
                let idx = self.layout.angle_index(area, local);
                let delta = x[idx];
                let omega = x[g_total + idx];

                let ring = self.intra_area_term(x, area, local);
                let g = self.inter_area_term(x, area, local);

                dx[idx] = omega;
                dx[g_total + idx] = p_m - b * delta.sin() - b_int * ring - eps * b_int * g;
            }
        }
    }
}

impl TransientModel for SwingModel {
    fn dim(&self) -> usize {
        self.layout.state_len()
    }

    fn initial_state(&self) -> DVector<f64> {
        self.initial.clone()
    }

    fn rhs(&self, _t: f64, x: &DVector<f64>) -> SimResult<DVector<f64>> {
        if x.len() != self.dim() {
            return Err(SimError::IndexConsistency {
                what: format!(
                    "state length {} does not match layout length {}",
                    x.len(),
                    self.dim()
                ),
            });
        }
        let mut dx = DVector::zeros(x.len());
        self.rhs_into(x.as_slice(), dx.as_mut_slice());
        Ok(dx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(counts: &[usize], params: SwingParams) -> SwingModel {
        let layout = StateLayout::from_counts(counts);
        let initial = DVector::zeros(layout.state_len());
        SwingModel::new(layout, params, initial).unwrap()
    }

    #[test]
    fn single_generator_ring_cancels() {
        let m = model(&[1], SwingParams::uniform(1, 0.95, 1.0, 100.0, 0.1));
        for x0 in [-3.0, 0.0, 0.4, 12.5] {
            assert_eq!(m.intra_area_term(&[x0, 0.0], 0, 0), 0.0);
        }
    }

    #[test]
    fn derivative_of_angle_is_frequency() {
        let m = model(&[2, 1], SwingParams::uniform(2, 0.5, 1.0, 10.0, 0.1));
        let x = DVector::from_vec(vec![0.1, 0.2, 0.3, 1.5, -2.0, 0.25]);
        let dx = m.rhs(0.0, &x).unwrap();
        assert_eq!(dx[0], 1.5);
        assert_eq!(dx[1], -2.0);
        assert_eq!(dx[2], 0.25);
    }

    #[test]
    fn hand_computed_two_area_chain() {
        // areas: [2 gens, 1 gen]; uniform params
        let (p_m, b, b_int, eps) = (0.5, 1.0, 10.0, 0.2);
        let m = model(&[2, 1], SwingParams::uniform(2, p_m, b, b_int, eps));
        let d = [0.1, 0.4, -0.3];
        let x = DVector::from_vec(vec![d[0], d[1], d[2], 0.0, 0.0, 0.0]);
        let dx = m.rhs(0.0, &x).unwrap();

        // gen 0 of area 0: ring with gen 1 on both sides, not middle (2/2 = 1)
        let expect0 = p_m - b * d[0].sin() - b_int * 2.0 * (d[0] - d[1]).sin();
        // gen 1 of area 0: middle, couples to first of area 1
        let expect1 = p_m
            - b * d[1].sin()
            - b_int * 2.0 * (d[1] - d[0]).sin()
            - eps * b_int * (d[1] - d[2]).sin();
        // gen 0 of area 1: first, couples to middle of area 0 (index 1)
        let expect2 = p_m - b * d[2].sin() - eps * b_int * (d[2] - d[1]).sin();

        assert!((dx[3] - expect0).abs() < 1e-12);
        assert!((dx[4] - expect1).abs() < 1e-12);
        assert!((dx[5] - expect2).abs() < 1e-12);
    }

    #[test]
    fn first_and_middle_coincide_for_small_area() {
        // middle area of three with one generator: it is both first and middle
        let m = model(&[1, 1, 1], SwingParams::uniform(3, 0.0, 1.0, 1.0, 1.0));
        let x = [0.0, 0.5, 1.5];
        let g = m.inter_area_term(&x, 1, 0);
        let expect = (0.5_f64 - 0.0).sin() + (0.5_f64 - 1.5).sin();
        assert!((g - expect).abs() < 1e-12);
    }

    #[test]
    fn first_and_last_areas_have_one_sided_coupling() {
        let m = model(&[1, 1], SwingParams::uniform(2, 0.0, 1.0, 1.0, 1.0));
        let x = [0.2, 0.7];
        assert!((m.inter_area_term(&x, 0, 0) - (0.2_f64 - 0.7).sin()).abs() < 1e-12);
        assert!((m.inter_area_term(&x, 1, 0) - (0.7_f64 - 0.2).sin()).abs() < 1e-12);
    }

    #[test]
    fn empty_neighbor_area_is_skipped() {
        let layout = StateLayout::from_counts(&[2, 0, 2]);
        let params = SwingParams::uniform(3, 0.1, 1.0, 1.0, 1.0);
        let m = SwingModel::new(layout, params, DVector::zeros(8)).unwrap();
        let x = DVector::from_vec(vec![0.1, 0.2, 0.3, 0.4, 0.0, 0.0, 0.0, 0.0]);
        let dx = m.rhs(0.0, &x).unwrap();
        assert!(dx.iter().all(|v| v.is_finite()));
        // area 0 middle generator would couple to area 1, which is empty
        assert_eq!(m.inter_area_term(x.as_slice(), 0, 1), 0.0);
    }

    #[test]
    fn rejects_mismatched_inputs() {
        let layout = StateLayout::from_counts(&[2]);
        let err = SwingModel::new(
            layout.clone(),
            SwingParams::uniform(2, 0.1, 1.0, 1.0, 1.0),
            DVector::zeros(4),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Configuration { .. }));

        let err = SwingModel::new(
            layout,
            SwingParams::uniform(1, 0.1, 1.0, 1.0, 1.0),
            DVector::zeros(3),
        )
        .unwrap_err();
        assert!(matches!(err, SimError::Configuration { .. }));

        let m = model(&[2], SwingParams::uniform(1, 0.1, 1.0, 1.0, 1.0));
        let err = m.rhs(0.0, &DVector::zeros(3)).unwrap_err();
        assert!(matches!(err, SimError::IndexConsistency { .. }));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn time_invariant(
            counts in prop::collection::vec(1_usize..5, 1..4),
            seed in prop::collection::vec(-4.0_f64..4.0, 32),
            t1 in -100.0_f64..100.0,
            t2 in -100.0_f64..100.0,
        ) {
            let layout = StateLayout::from_counts(&counts);
            let n = layout.state_len();
            let ns = layout.area_count();
            let m = SwingModel::new(
                layout,
                SwingParams::uniform(ns, 0.9, 1.0, 50.0, 0.1),
                DVector::zeros(n),
            ).unwrap();
            let x = DVector::from_iterator(n, seed.iter().cycle().take(n).copied());
            let a = m.rhs(t1, &x).unwrap();
            let b = m.rhs(t2, &x).unwrap();
            prop_assert_eq!(a, b);
        }

        #[test]
        fn single_generator_areas_have_no_ring_torque(
            ns in 1_usize..5,
            angles in prop::collection::vec(-10.0_f64..10.0, 5),
        ) {
            let layout = StateLayout::from_counts(&vec![1; ns]);
            let n = layout.state_len();
            let m = SwingModel::new(
                layout,
                SwingParams::uniform(ns, 0.5, 1.0, 100.0, 0.1),
                DVector::zeros(n),
            ).unwrap();
            let mut x = vec![0.0; n];
            x[..ns].copy_from_slice(&angles[..ns]);
            for area in 0..ns {
                prop_assert_eq!(m.intra_area_term(&x, area, 0), 0.0);
            }
        }
    }
}
