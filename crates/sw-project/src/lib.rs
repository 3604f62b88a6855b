//! sw-project: scenario file format and validation.

pub mod schema;
pub mod template;
pub mod validate;

pub use schema::*;
pub use template::japan_ten_area;
pub use validate::{ValidationError, validate_scenario};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub fn from_yaml_str(content: &str) -> ProjectResult<Scenario> {
    let scenario: Scenario = serde_yaml::from_str(content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn from_json_str(content: &str) -> ProjectResult<Scenario> {
    let scenario: Scenario = serde_json::from_str(content)?;
    validate_scenario(&scenario)?;
    Ok(scenario)
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    from_yaml_str(&content)
}

pub fn to_yaml_string(scenario: &Scenario) -> ProjectResult<String> {
    validate_scenario(scenario)?;
    Ok(serde_yaml::to_string(scenario)?)
}

pub fn save_yaml(path: &std::path::Path, scenario: &Scenario) -> ProjectResult<()> {
    let content = to_yaml_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<Scenario> {
    let content = std::fs::read_to_string(path)?;
    from_json_str(&content)
}

pub fn to_json_string(scenario: &Scenario) -> ProjectResult<String> {
    validate_scenario(scenario)?;
    Ok(serde_json::to_string_pretty(scenario)?)
}

pub fn save_json(path: &std::path::Path, scenario: &Scenario) -> ProjectResult<()> {
    let content = to_json_string(scenario)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load by extension: `.json` as JSON, anything else as YAML.
pub fn load(path: &std::path::Path) -> ProjectResult<Scenario> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => load_json(path),
        _ => load_yaml(path),
    }
}
