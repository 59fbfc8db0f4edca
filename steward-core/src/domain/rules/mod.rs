// steward-core/src/domain/rules/mod.rs
//
// DQC rules: name and description generation, form derivation and the
// validation engine.

pub mod derive;
pub mod description;
pub mod naming;
pub mod record;
pub mod standards;
pub mod validation;
pub mod vocabulary;

// Re-exports
pub use derive::{DerivedFields, RuleForm};
pub use description::{DESCRIPTION_PLACEHOLDER, generate_rule_description};
pub use naming::{NameAmbiguity, RULE_NAME_PLACEHOLDER, RuleFragment, generate_rule_name};
pub use record::{EDIT_UPPERCASE_FIELDS, RULE_FIELDS, RuleRecord, UPPERCASE_FIELDS};
pub use standards::NamingStandard;
pub use validation::{RowOrigin, RuleValidator};
pub use vocabulary::{
    DEFAULT_APPL_CD_PREFIX, DataLayer, INFORMATION_DATABASE, MethodGroup, PAYMENTS_DATABASE,
    ValidationCategory, ValidationMethod, check_selections,
};
