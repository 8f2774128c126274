//! Error types for cadgen

use thiserror::Error;

use crate::templates::TemplateError;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// cadgen errors
///
/// Remote-service failures are deliberately absent: the AI path always
/// recovers through the template pipeline and never surfaces an `Error`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Please enter a description of what you want to create")]
    EmptyDescription,

    #[error("Unknown dialect '{0}' (expected vba or python)")]
    UnknownDialect(String),

    #[error("Unknown complexity '{0}' (expected basic, intermediate or advanced)")]
    UnknownComplexity(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Internal render error in template '{template}': {message}")]
    Render { template: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
