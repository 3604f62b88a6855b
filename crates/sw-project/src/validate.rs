//! Scenario validation logic.

use crate::schema::{AdjacencyDef, AreaDef, LATEST_VERSION, Scenario, SolverDef, TimeDef};
use std::collections::HashSet;

/// Number of areas the built-in adjacency table describes.
pub const JAPAN_TEN_AREA_LEN: usize = 10;

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

fn invalid(field: impl Into<String>, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.into(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version == 0 || scenario.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.areas.is_empty() {
        return Err(invalid("areas", 0, "at least one area is required"));
    }

    let mut names = HashSet::new();
    for (i, area) in scenario.areas.iter().enumerate() {
        if !names.insert(area.name.as_str()) {
            return Err(ValidationError::DuplicateId {
                id: area.name.clone(),
                context: "areas".to_string(),
            });
        }
        validate_area(i, area)?;
    }

    validate_adjacency(&scenario.adjacency, scenario.areas.len())?;

    let mut selected = HashSet::new();
    for &index in &scenario.selection {
        if index >= scenario.areas.len() {
            return Err(ValidationError::MissingReference {
                id: index.to_string(),
                context: "selection".to_string(),
            });
        }
        if !selected.insert(index) {
            return Err(ValidationError::DuplicateId {
                id: index.to_string(),
                context: "selection".to_string(),
            });
        }
    }

    let selected_counts: Vec<usize> = if scenario.selection.is_empty() {
        scenario.areas.iter().map(|a| a.generator_count).collect()
    } else {
        scenario
            .selection
            .iter()
            .map(|&i| scenario.areas[i].generator_count)
            .collect()
    };

    for (k, d) in scenario.disturbances.iter().enumerate() {
        let Some(&count) = selected_counts.get(d.area) else {
            return Err(ValidationError::MissingReference {
                id: d.area.to_string(),
                context: format!("disturbances[{k}].area"),
            });
        };
        if d.generator == 0 || d.generator > count {
            return Err(invalid(
                format!("disturbances[{k}].generator"),
                d.generator,
                "must be between 1 and the area's generator count",
            ));
        }
        if !d.angle_rad.is_finite() {
            return Err(invalid(
                format!("disturbances[{k}].angle_rad"),
                d.angle_rad,
                "must be finite",
            ));
        }
    }

    if !(scenario.initial.jitter_rad.is_finite() && scenario.initial.jitter_rad >= 0.0) {
        return Err(invalid(
            "initial.jitter_rad",
            scenario.initial.jitter_rad,
            "must be finite and non-negative",
        ));
    }

    validate_time(&scenario.time)?;
    validate_solver(&scenario.solver)?;

    Ok(())
}

fn validate_area(index: usize, area: &AreaDef) -> Result<(), ValidationError> {
    let field = |name: &str| format!("areas[{index}].{name}");

    if area.generator_count == 0 {
        return Err(invalid(field("generator_count"), 0, "must be at least 1"));
    }

    for (name, value) in [
        ("p_m", area.p_m),
        ("b", area.b),
        ("b_int", area.b_int),
        ("epsilon", area.epsilon),
    ] {
        if !value.is_finite() {
            return Err(invalid(field(name), value, "must be finite"));
        }
    }

    if area.b == 0.0 {
        return Err(invalid(field("b"), area.b, "must be non-zero"));
    }
    if (area.p_m / area.b).abs() > 1.0 {
        return Err(invalid(
            field("p_m"),
            area.p_m,
            "|p_m / b| must not exceed 1 for an equilibrium to exist",
        ));
    }

    if let Some(c) = area.connection_coeff
        && !c.is_finite()
    {
        return Err(invalid(field("connection_coeff"), c, "must be finite"));
    }

    Ok(())
}

fn validate_adjacency(adjacency: &AdjacencyDef, areas: usize) -> Result<(), ValidationError> {
    match adjacency {
        AdjacencyDef::JapanTenArea => {
            if areas != JAPAN_TEN_AREA_LEN {
                return Err(invalid(
                    "adjacency",
                    areas,
                    "JapanTenArea adjacency requires exactly ten areas",
                ));
            }
        }
        AdjacencyDef::Lists { neighbors, .. } => {
            if neighbors.len() != areas {
                return Err(invalid(
                    "adjacency.neighbors",
                    neighbors.len(),
                    "must have one list per area",
                ));
            }
            for (a, list) in neighbors.iter().enumerate() {
                for &b in list {
                    if b >= areas {
                        return Err(ValidationError::MissingReference {
                            id: b.to_string(),
                            context: format!("adjacency.neighbors[{a}]"),
                        });
                    }
                    if b == a {
                        return Err(invalid(
                            format!("adjacency.neighbors[{a}]"),
                            b,
                            "an area cannot neighbour itself",
                        ));
                    }
                }
            }
        }
        AdjacencyDef::Isolated => {}
    }
    Ok(())
}

fn validate_time(time: &TimeDef) -> Result<(), ValidationError> {
    if !time.start_s.is_finite() {
        return Err(invalid("time.start_s", time.start_s, "must be finite"));
    }
    if !time.end_s.is_finite() {
        return Err(invalid("time.end_s", time.end_s, "must be finite"));
    }
    if time.points == 0 {
        return Err(invalid("time.points", time.points, "must be at least 1"));
    }
    if time.points > 1 && time.end_s <= time.start_s {
        return Err(invalid(
            "time.end_s",
            time.end_s,
            "must be greater than time.start_s",
        ));
    }
    Ok(())
}

fn validate_solver(solver: &SolverDef) -> Result<(), ValidationError> {
    if !(solver.rtol.is_finite() && solver.rtol > 0.0) {
        return Err(invalid("solver.rtol", solver.rtol, "must be positive"));
    }
    if !(solver.atol.is_finite() && solver.atol > 0.0) {
        return Err(invalid("solver.atol", solver.atol, "must be positive"));
    }
    if !(solver.dt_s.is_finite() && solver.dt_s > 0.0) {
        return Err(invalid("solver.dt_s", solver.dt_s, "must be positive"));
    }
    if let Some(max_dt) = solver.max_dt_s
        && !(max_dt.is_finite() && max_dt > 0.0)
    {
        return Err(invalid("solver.max_dt_s", max_dt, "must be positive"));
    }
    if solver.max_steps == 0 {
        return Err(invalid("solver.max_steps", 0, "must be at least 1"));
    }
    Ok(())
}
