//! aq-project: canonical protocol file format, validation, and lowering.

pub mod build;
pub mod schema;
pub mod validate;

pub use build::build_run;
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_protocol};

pub type ProjectResult<T> = Result<T, ProjectError>;

#[derive(thiserror::Error, Debug)]
pub enum ProjectError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Labware error: {0}")]
    Labware(#[from] aq_labware::LabwareError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub fn load_yaml(path: &std::path::Path) -> ProjectResult<Protocol> {
    let content = std::fs::read_to_string(path)?;
    let protocol: Protocol = serde_yaml::from_str(&content)?;
    validate_protocol(&protocol)?;
    Ok(protocol)
}

pub fn save_yaml(path: &std::path::Path, protocol: &Protocol) -> ProjectResult<()> {
    validate_protocol(protocol)?;
    let content = serde_yaml::to_string(protocol)?;
    std::fs::write(path, content)?;
    Ok(())
}
