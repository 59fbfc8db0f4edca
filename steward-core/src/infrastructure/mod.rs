// steward-core/src/infrastructure/mod.rs

pub mod config;
pub mod error;
pub mod exchange;
pub mod fs;

pub use exchange::{MappingFile, RuleFile};
