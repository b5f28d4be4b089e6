//! dfn-project: case file format, validation and compilation to solver inputs.

pub mod compile;
pub mod schema;
pub mod validate;

pub use compile::{CompiledCase, compile_case};
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_case};

use dfn_core::DfnError;
use dfn_fluids::FluidError;
use dfn_graph::NetworkError;

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Fluid error: {0}")]
    Fluid(#[from] FluidError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ProjectError> for DfnError {
    fn from(err: ProjectError) -> Self {
        match err {
            ProjectError::Network(e) => e.into(),
            ProjectError::Fluid(e) => e.into(),
            other => DfnError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<CaseDef> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseDef = serde_yaml::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_yaml(path: &std::path::Path, case: &CaseDef) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_yaml::to_string(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

pub fn load_json(path: &std::path::Path) -> ProjectResult<CaseDef> {
    let content = std::fs::read_to_string(path)?;
    let case: CaseDef = serde_json::from_str(&content)?;
    validate_case(&case)?;
    Ok(case)
}

pub fn save_json(path: &std::path::Path, case: &CaseDef) -> ProjectResult<()> {
    validate_case(case)?;
    let content = serde_json::to_string_pretty(case)?;
    std::fs::write(path, content)?;
    Ok(())
}

/// Load a case, picking the format from the file extension (`.yaml`/`.yml` or JSON).
pub fn load_case(path: &std::path::Path) -> ProjectResult<CaseDef> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("yaml" | "yml") => load_yaml(path),
        _ => load_json(path),
    }
}
