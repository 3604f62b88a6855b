//! Runtime compilation of a Scenario into an executable swing model.

use nalgebra::DMatrix;
use sw_grid::{
    Adjacency, AreaParams, AreaTable, ChainMismatch, Selection, StateLayout, chain_links,
    chain_mismatches, connection_matrix,
};
use sw_project::{AdjacencyDef, Scenario, SolverDef, SolverMethodDef};
use sw_sim::{
    Disturbance, InitialConditionBuilder, IntegratorType, SimOptions, SwingModel, SwingParams,
    TimeGrid,
};

use crate::error::AppResult;

/// Selected sub-network and its two coupling views.
#[derive(Debug, Clone)]
pub struct TopologyReport {
    /// Original (0-based) indices of the selected areas
    pub selection: Vec<usize>,
    /// Names of the selected areas in selection order
    pub names: Vec<String>,
    /// `ns × ns` connection matrix from the adjacency table
    pub connection: DMatrix<f64>,
    /// Selection-position pairs coupled by the dynamics
    pub chain: Vec<(usize, usize)>,
    pub mismatches: Vec<ChainMismatch>,
}

/// Runtime representation of a compiled scenario.
#[derive(Debug, Clone)]
pub struct SystemRuntime {
    pub topology: TopologyReport,
    pub table: AreaTable,
    pub layout: StateLayout,
    pub model: SwingModel,
    pub grid: TimeGrid,
    pub options: SimOptions,
}

/// Convert the scenario's area records into a validated table.
pub fn build_area_table(scenario: &Scenario) -> AppResult<AreaTable> {
    let areas = scenario
        .areas
        .iter()
        .map(|def| AreaParams {
            name: def.name.clone(),
            generator_count: def.generator_count,
            p_m: def.p_m,
            b: def.b,
            b_int: def.b_int,
            epsilon: def.epsilon,
            connection_coeff: def.connection_coeff,
            lon: def.lon,
            lat: def.lat,
        })
        .collect();
    Ok(AreaTable::new(areas)?)
}

/// Resolve an adjacency definition for a table of `len` areas.
pub fn build_adjacency(def: &AdjacencyDef, len: usize) -> AppResult<Adjacency> {
    let adjacency = match def {
        AdjacencyDef::JapanTenArea => Adjacency::japan_ten_area(),
        AdjacencyDef::Lists {
            neighbors,
            symmetrize: true,
        } => Adjacency::from_lists_symmetrized(neighbors.clone())?,
        AdjacencyDef::Lists {
            neighbors,
            symmetrize: false,
        } => Adjacency::from_lists(neighbors.clone())?,
        AdjacencyDef::Isolated => Adjacency::isolated(len),
    };
    if adjacency.len() != len {
        return Err(sw_grid::GridError::SizeMismatch {
            adjacency: adjacency.len(),
            areas: len,
        }
        .into());
    }
    Ok(adjacency)
}

/// Map solver settings onto simulation options.
pub fn sim_options(solver: &SolverDef) -> SimOptions {
    let integrator = match solver.method {
        SolverMethodDef::DormandPrince => IntegratorType::DormandPrince,
        SolverMethodDef::Rk4 => IntegratorType::RK4,
        SolverMethodDef::ForwardEuler => IntegratorType::ForwardEuler,
    };
    SimOptions {
        integrator,
        rtol: solver.rtol,
        atol: solver.atol,
        dt: solver.dt_s,
        max_dt: solver.max_dt_s,
        max_steps: solver.max_steps,
        ..SimOptions::default()
    }
}

/// Build the selected sub-network and compare its coupling views.
pub fn compile_topology(scenario: &Scenario) -> AppResult<TopologyReport> {
    let adjacency = build_adjacency(&scenario.adjacency, scenario.areas.len())?;
    let selection = Selection::resolve(&scenario.selection, scenario.areas.len())?;
    let connection = connection_matrix(&adjacency, &selection)?;
    let mismatches = chain_mismatches(&connection);
    let names: Vec<String> = selection
        .indices()
        .iter()
        .map(|&i| scenario.areas[i].name.clone())
        .collect();

    for m in &mismatches {
        match *m {
            ChainMismatch::CoupledNotAdjacent(i, j) => tracing::warn!(
                from = %names[i],
                to = %names[j],
                "consecutive areas are coupled by the dynamics but not adjacent"
            ),
            ChainMismatch::AdjacentNotCoupled(i, j) => tracing::warn!(
                from = %names[i],
                to = %names[j],
                "adjacent areas are not coupled by the dynamics"
            ),
        }
    }

    Ok(TopologyReport {
        selection: selection.indices().to_vec(),
        names,
        chain: chain_links(selection.len()),
        connection,
        mismatches,
    })
}

/// Compile a scenario into a ready-to-integrate runtime.
///
/// Every configuration check runs here, before any numerical work.
pub fn compile_scenario(scenario: &Scenario) -> AppResult<SystemRuntime> {
    sw_project::validate_scenario(scenario)?;

    let full = build_area_table(scenario)?;
    let topology = compile_topology(scenario)?;
    let table = full.subset(&topology.selection)?;
    let layout = StateLayout::from_counts(&table.generator_counts());
    layout.check_consistency()?;

    let params = SwingParams::from_table(&table);
    let initial = InitialConditionBuilder::new()
        .seed(scenario.initial.seed)
        .jitter(scenario.initial.jitter_rad)
        .disturbances(
            scenario
                .disturbances
                .iter()
                .map(|d| Disturbance::new(d.area, d.generator, d.angle_rad)),
        )
        .build(&layout, &params)?;
    let model = SwingModel::new(layout.clone(), params, initial)?;

    let grid = TimeGrid::linspace(
        scenario.time.start_s,
        scenario.time.end_s,
        scenario.time.points,
    )?;

    Ok(SystemRuntime {
        topology,
        table,
        layout,
        model,
        grid,
        options: sim_options(&scenario.solver),
    })
}
