//! Scenario loading, saving, validation, and introspection.

use std::path::Path;
use sw_grid::Selection;
use sw_project::{DisturbanceDef, Scenario};

use crate::error::{AppError, AppResult};
use crate::runtime_compile;

/// Summary of an area for listing.
#[derive(Debug, Clone)]
pub struct AreaSummary {
    pub index: usize,
    pub name: String,
    pub generator_count: usize,
    pub p_m: f64,
    pub b: f64,
    pub b_int: f64,
    pub epsilon: f64,
    pub connection_coeff: Option<f64>,
    /// Neighbours under the scenario's adjacency (0-based)
    pub neighbors: Vec<usize>,
}

fn is_json(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("json")
}

/// Load a scenario from YAML, or JSON when the file ends in `.json`.
pub fn load_scenario(path: &Path) -> AppResult<Scenario> {
    let content = std::fs::read_to_string(path).map_err(|e| AppError::ProjectFileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    let scenario = if is_json(path) {
        sw_project::from_json_str(&content)?
    } else {
        sw_project::from_yaml_str(&content)?
    };

    Ok(scenario)
}

/// Save a scenario, choosing the format from the extension.
pub fn save_scenario(path: &Path, scenario: &Scenario) -> AppResult<()> {
    let content = if is_json(path) {
        sw_project::to_json_string(scenario)?
    } else {
        sw_project::to_yaml_string(scenario)?
    };

    std::fs::write(path, content).map_err(|e| AppError::ProjectFileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Validate a scenario's structure and parameter domains.
pub fn validate_scenario(scenario: &Scenario) -> AppResult<()> {
    sw_project::validate_scenario(scenario)?;
    Ok(())
}

/// List every area of the scenario with its neighbours.
pub fn list_areas(scenario: &Scenario) -> AppResult<Vec<AreaSummary>> {
    let adjacency = runtime_compile::build_adjacency(&scenario.adjacency, scenario.areas.len())?;

    Ok(scenario
        .areas
        .iter()
        .enumerate()
        .map(|(index, area)| AreaSummary {
            index,
            name: area.name.clone(),
            generator_count: area.generator_count,
            p_m: area.p_m,
            b: area.b,
            b_int: area.b_int,
            epsilon: area.epsilon,
            connection_coeff: area.connection_coeff,
            neighbors: adjacency.neighbors(index).to_vec(),
        })
        .collect())
}

/// Replace the area selection, moving each disturbance to the new position
/// of the area it targets.
///
/// Disturbance areas are selection positions, so they are translated through
/// the original area index. Disturbances on areas that are no longer selected
/// are removed and returned.
pub fn reselect(
    scenario: &mut Scenario,
    selection: Vec<usize>,
) -> AppResult<Vec<DisturbanceDef>> {
    let area_count = scenario.areas.len();
    let old = Selection::resolve(&scenario.selection, area_count)?;
    let new = Selection::resolve(&selection, area_count)?;

    let mut kept = Vec::with_capacity(scenario.disturbances.len());
    let mut dropped = Vec::new();
    for (k, d) in scenario.disturbances.iter().enumerate() {
        let original = *old.indices().get(d.area).ok_or_else(|| {
            AppError::Validation(format!(
                "disturbances[{}].area = {} is outside the current selection of {} areas",
                k,
                d.area,
                old.len()
            ))
        })?;
        match new.position(original) {
            Some(area) => kept.push(DisturbanceDef { area, ..d.clone() }),
            None => {
                tracing::warn!(
                    area = %scenario.areas[original].name,
                    generator = d.generator,
                    angle_rad = d.angle_rad,
                    "dropping disturbance on an area outside the new selection"
                );
                dropped.push(d.clone());
            }
        }
    }

    scenario.selection = selection;
    scenario.disturbances = kept;
    Ok(dropped)
}
