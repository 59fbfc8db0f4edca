// steward-core/src/application/mod.rs

pub mod mapping;
pub mod report;
pub mod rules;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au CLI de faire :
// `use steward_core::application::{MappingSession, RuleSession};`
// sans avoir à connaître la structure interne des fichiers.

pub use mapping::{DbtIngest, DdlIngest, IngestOutcome, MappingSession, TableGroup, TransitionOverview};
pub use report::{LineageEdge, MappingReport, ReportSummary};
pub use rules::{RowViolation, RuleSession, RuleStats};
