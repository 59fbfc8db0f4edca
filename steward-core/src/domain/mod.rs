// steward-core/src/domain/mod.rs

pub mod error;
pub mod mapping;
pub mod project;
pub mod rules;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
