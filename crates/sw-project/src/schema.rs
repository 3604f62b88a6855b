//! Scenario schema definitions.

use serde::{Deserialize, Serialize};

pub const LATEST_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scenario {
    pub version: u32,
    pub name: String,
    pub areas: Vec<AreaDef>,
    #[serde(default)]
    pub adjacency: AdjacencyDef,
    /// 0-based area indices; empty selects every area
    #[serde(default)]
    pub selection: Vec<usize>,
    #[serde(default)]
    pub disturbances: Vec<DisturbanceDef>,
    #[serde(default)]
    pub initial: InitialDef,
    #[serde(default)]
    pub time: TimeDef,
    #[serde(default)]
    pub solver: SolverDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AreaDef {
    pub name: String,
    pub generator_count: usize,
    pub p_m: f64,
    pub b: f64,
    pub b_int: f64,
    pub epsilon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_coeff: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(tag = "type")]
pub enum AdjacencyDef {
    /// Built-in ten-area Japanese network (requires exactly ten areas)
    #[default]
    JapanTenArea,
    /// Explicit neighbour lists, one per area
    Lists {
        neighbors: Vec<Vec<usize>>,
        #[serde(default = "default_symmetrize")]
        symmetrize: bool,
    },
    /// No area is adjacent to any other
    Isolated,
}

fn default_symmetrize() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisturbanceDef {
    /// Position within the selection (0-based)
    pub area: usize,
    /// Generator number within the area (1-based)
    pub generator: usize,
    pub angle_rad: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InitialDef {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_jitter_rad")]
    pub jitter_rad: f64,
}

impl Default for InitialDef {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            jitter_rad: default_jitter_rad(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_jitter_rad() -> f64 {
    0.01
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeDef {
    #[serde(default)]
    pub start_s: f64,
    #[serde(default = "default_end_s")]
    pub end_s: f64,
    #[serde(default = "default_points")]
    pub points: usize,
}

impl Default for TimeDef {
    fn default() -> Self {
        Self {
            start_s: 0.0,
            end_s: default_end_s(),
            points: default_points(),
        }
    }
}

fn default_end_s() -> f64 {
    25.0
}

fn default_points() -> usize {
    1000
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethodDef {
    #[default]
    DormandPrince,
    Rk4,
    ForwardEuler,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default)]
    pub method: SolverMethodDef,
    #[serde(default = "default_tol")]
    pub rtol: f64,
    #[serde(default = "default_tol")]
    pub atol: f64,
    /// Fixed step for rk4 / forward_euler
    #[serde(default = "default_dt_s")]
    pub dt_s: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_dt_s: Option<f64>,
    #[serde(default = "default_max_steps")]
    pub max_steps: usize,
}

impl Default for SolverDef {
    fn default() -> Self {
        Self {
            method: SolverMethodDef::default(),
            rtol: default_tol(),
            atol: default_tol(),
            dt_s: default_dt_s(),
            max_dt_s: None,
            max_steps: default_max_steps(),
        }
    }
}

fn default_tol() -> f64 {
    1.49012e-8
}

fn default_dt_s() -> f64 {
    1e-3
}

fn default_max_steps() -> usize {
    500_000
}
