use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LocatorError {
    #[error("Invalid image geometry: {0}")]
    InvalidGeometry(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Classifier contract violation: {0}")]
    ClassifierContractViolation(String),
}

impl LocatorError {
    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            LocatorError::InvalidGeometry(_) => "INVALID_GEOMETRY",
            LocatorError::InvalidConfig(_) => "INVALID_CONFIG",
            LocatorError::ClassifierContractViolation(_) => "CLASSIFIER_CONTRACT",
        }
    }
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

impl From<&LocatorError> for ErrorResponse {
    fn from(err: &LocatorError) -> Self {
        Self {
            error: err.to_string(),
            code: err.code().to_string(),
        }
    }
}
