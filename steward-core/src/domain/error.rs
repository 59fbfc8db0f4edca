// steward-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("No columns found in the DDL script")]
    #[diagnostic(
        code(steward::domain::no_columns),
        help("The script must contain a parenthesized column list: CREATE TABLE t ( COL_NM VARCHAR(10), ... )")
    )]
    NoColumnsFound,

    #[error("No field mappings found in the transformation script")]
    #[diagnostic(
        code(steward::domain::no_field_mappings),
        help("Each column line must end with 'AS <TARGET_FIELD>'.")
    )]
    NoFieldMappings,

    #[error("Missing required input: {0}")]
    #[diagnostic(code(steward::domain::missing_input))]
    MissingInput(&'static str),

    #[error("Rule '{rule_name}' rejected with {} violation(s)", .violations.len())]
    #[diagnostic(
        code(steward::domain::rule_rejected),
        help("Fix the listed violations and submit the rule again.")
    )]
    #[allow(unused_assignments)]
    RuleRejected {
        rule_name: String,
        violations: Vec<String>,
    },

    #[error("No record at index {index} (collection holds {len})")]
    #[diagnostic(code(steward::domain::record_not_found))]
    #[allow(unused_assignments)]
    RecordNotFound { index: usize, len: usize },

    #[error("Invalid {field} '{value}': expected {expected}")]
    #[diagnostic(code(steward::domain::invalid_selection))]
    #[allow(unused_assignments)]
    InvalidSelection {
        field: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Unknown field '{0}'")]
    #[diagnostic(
        code(steward::domain::unknown_field),
        help("Field names follow the rule file header, e.g. RULE_NM or APPL_CD.")
    )]
    UnknownField(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    #[diagnostic(code(steward::domain::pattern))]
    #[allow(unused_assignments)]
    InvalidPattern { pattern: String, reason: String },
}

impl DomainError {
    /// Wraps a regex compilation failure. Patterns are fixed, so this only
    /// fires if one of them is edited into an invalid shape.
    pub(crate) fn pattern(pattern: &str, err: regex::Error) -> Self {
        DomainError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        }
    }
}
