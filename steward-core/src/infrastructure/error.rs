// steward-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(steward::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- EXCHANGE FILES (CSV) ---
    #[error("Delimited File Error: {0}")]
    #[diagnostic(
        code(steward::infra::csv),
        help("Exchange files are '~'-delimited with a header row.")
    )]
    Csv(#[from] csv::Error),

    #[error("Invalid row {row} in '{path}': {reason}")]
    #[diagnostic(code(steward::infra::invalid_row))]
    #[allow(unused_assignments)]
    InvalidRow {
        path: String,
        row: usize,
        reason: String,
    },

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(steward::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(steward::infra::config))]
    ConfigError(String),

    // --- REPORTS (JSON) ---
    #[error("JSON Serialization Error: {0}")]
    #[diagnostic(code(steward::infra::json))]
    Json(#[from] serde_json::Error),
}
