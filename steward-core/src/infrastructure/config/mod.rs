// steward-core/src/infrastructure/config/mod.rs

pub mod project;

pub use project::load_project_config;
