// steward-core/src/ports/store.rs

// What the sessions need from persistence, without knowing the file format.
// Stores load and save whole collections; sessions own the records in between.

use crate::domain::mapping::MappingRecord;
use crate::domain::rules::RuleRecord;
use crate::error::StewardError;

pub trait RuleStore {
    /// Missing storage reads as an empty collection.
    fn load_rules(&self) -> Result<Vec<RuleRecord>, StewardError>;

    fn save_rules(&self, rules: &[RuleRecord]) -> Result<(), StewardError>;
}

pub trait MappingStore {
    /// Missing storage reads as an empty collection.
    fn load_mappings(&self) -> Result<Vec<MappingRecord>, StewardError>;

    fn save_mappings(&self, mappings: &[MappingRecord]) -> Result<(), StewardError>;
}
