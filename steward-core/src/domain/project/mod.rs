// steward-core/src/domain/project/mod.rs

pub mod configuration;
pub use configuration::{LayerLocation, MappingDefaults, ProjectConfig, RuleDefaults};
