// steward-core/src/domain/mapping/record.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel for lineage that could not be derived from the script.
pub const UNKNOWN: &str = "UNKNOWN";
pub const MANUAL_INPUT_REQUIRED: &str = "UNKNOWN - Manual input required";
pub const DIRECT_MAPPING: &str = "Direct mapping";
pub const STRAIGHT_MOVE: &str = "Straight Move";
pub const NOT_APPLICABLE: &str = "N/A";
pub const ETL_AUDIT_COLUMN: &str = "ETL-generated audit column";
pub const DEFAULT_CHANGE_TYPE: &str = "New Field Added";

/// The pipeline hop a mapping documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LayerTransition {
    #[serde(rename = "DL2_to_Foundation")]
    Dl2ToFoundation,
    #[serde(rename = "Foundation_to_Information")]
    FoundationToInformation,
}

impl LayerTransition {
    pub const ALL: [LayerTransition; 2] = [Self::Dl2ToFoundation, Self::FoundationToInformation];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dl2ToFoundation => "DL2_to_Foundation",
            Self::FoundationToInformation => "Foundation_to_Information",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dl2ToFoundation => "DL2 → Foundation",
            Self::FoundationToInformation => "Foundation → Information",
        }
    }

    /// Name of the layer being populated, used in report file names.
    pub fn target_layer(&self) -> &'static str {
        match self {
            Self::Dl2ToFoundation => "Foundation",
            Self::FoundationToInformation => "Information",
        }
    }
}

impl fmt::Display for LayerTransition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LayerTransition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "dl2_to_foundation" | "dl2_foundation" | "foundation" => Ok(Self::Dl2ToFoundation),
            "foundation_to_information" | "foundation_information" | "information" => {
                Ok(Self::FoundationToInformation)
            }
            _ => Err(format!("Unknown layer transition: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TableLocator {
    pub database: String,
    pub schema: String,
    pub table: String,
}

impl TableLocator {
    pub fn new(
        database: impl Into<String>,
        schema: impl Into<String>,
        table: impl Into<String>,
    ) -> Self {
        Self {
            database: database.into(),
            schema: schema.into(),
            table: table.into(),
        }
    }
}

/// One lineage edge between a source field and a target field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRecord {
    pub layer_transition: LayerTransition,
    pub source: TableLocator,
    pub source_field: String,
    pub target: TableLocator,
    pub target_field: String,
    /// Declared column type for foundation tables, "TYPE 1"/"TYPE 2" for information tables.
    pub target_data_type: String,
    pub transformation_logic: String,
    pub change_type: String,
    pub timestamp: NaiveDateTime,
}

impl MappingRecord {
    pub fn is_unknown_lineage(&self) -> bool {
        self.source_field == UNKNOWN
    }
}
