// steward-core/src/domain/mapping/mod.rs
//
// Lineage mappings between medallion layers: parsing of DDL and DBT
// scripts into (source, target, transformation) records.

pub mod audit;
pub mod classifier;
pub mod ddl;
pub mod null_handling;
pub mod record;
pub mod script;

// Re-exports
pub use audit::{InformationTableType, foundation_audit_columns, is_foundation_audit_column};
pub use classifier::{FieldMapping, LineShape, SourceFieldPolicy, TransformationClassifier};
pub use ddl::{ColumnDefinition, ColumnExtractor};
pub use null_handling::{CheckType, NullHandlingDecoder, NullHandlingParams};
pub use record::{LayerTransition, MappingRecord, TableLocator};
