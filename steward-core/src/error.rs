// steward-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum StewardError {
    // --- ERREURS DU DOMAINE (parsing, règles, validation) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, CSV, YAML) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for StewardError {
    fn from(err: std::io::Error) -> Self {
        StewardError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<csv::Error> for StewardError {
    fn from(err: csv::Error) -> Self {
        StewardError::Infrastructure(InfrastructureError::Csv(err))
    }
}
