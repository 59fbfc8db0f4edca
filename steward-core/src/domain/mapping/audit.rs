// steward-core/src/domain/mapping/audit.rs
//
// Mandatory ETL audit columns appended to every generated table mapping.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::mapping::classifier::{FieldMapping, LineShape};
use crate::domain::mapping::ddl::ColumnDefinition;
use crate::domain::mapping::record::NOT_APPLICABLE;

const FOUNDATION_AUDIT_COLUMNS: [(&str, &str); 3] = [
    ("LOAD_TS", "TIMESTAMP_LTZ(9)"),
    ("LOAD_DT", "VARCHAR(10)"),
    ("ETL_CREA_NR", "NUMBER(19,0)"),
];

// (source field, target field, transformation)
const TYPE1_AUDIT_COLUMNS: [(&str, &str, &str); 9] = [
    (NOT_APPLICABLE, "CREA_PRTY_ID", "ETL-generated: Creation party ID"),
    (NOT_APPLICABLE, "CREA_TS", "ETL-generated: Creation timestamp"),
    (NOT_APPLICABLE, "UPDT_PRTY_ID", "ETL-generated: Update party ID"),
    (NOT_APPLICABLE, "UPDT_TS", "ETL-generated: Update timestamp"),
    (NOT_APPLICABLE, "ETL_CREA_TS", "ETL-generated: ETL creation timestamp"),
    ("ETL_CREA_NR", "ETL_CREA_NR", "Maps to ETL_CREA_NR from Foundation layer"),
    (NOT_APPLICABLE, "ETL_UPDT_TS", "ETL-generated: ETL update timestamp"),
    (NOT_APPLICABLE, "ETL_UPDT_NR", "ETL-generated: ETL update number"),
    ("LOAD_TS", "FNDN_LOAD_TS", "Maps to LOAD_TS from Foundation layer"),
];

// TYPE 2 tables carry the SCD columns in front of the TYPE 1 set.
const SCD_AUDIT_COLUMNS: [(&str, &str, &str); 3] = [
    (NOT_APPLICABLE, "CURR_REC_IND", "ETL-generated: Current record indicator for SCD Type 2"),
    (NOT_APPLICABLE, "SRC_SYS_REC_EFF_TS", "ETL-generated: Source system record effective timestamp"),
    (NOT_APPLICABLE, "SRC_SYS_REC_EXP_TS", "ETL-generated: Source system record expiration timestamp"),
];

pub fn foundation_audit_columns() -> Vec<ColumnDefinition> {
    FOUNDATION_AUDIT_COLUMNS
        .iter()
        .map(|(name, ty)| ColumnDefinition::new(*name, *ty))
        .collect()
}

pub fn is_foundation_audit_column(name: &str) -> bool {
    FOUNDATION_AUDIT_COLUMNS.iter().any(|(n, _)| *n == name)
}

/// Information tables are either plain (TYPE 1) or slowly-changing (TYPE 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum InformationTableType {
    #[default]
    #[serde(rename = "TYPE 1")]
    Type1,
    #[serde(rename = "TYPE 2")]
    Type2,
}

impl InformationTableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Type1 => "TYPE 1",
            Self::Type2 => "TYPE 2",
        }
    }

    pub fn audit_columns(&self) -> Vec<FieldMapping> {
        let scd: &[(&str, &str, &str)] = match self {
            Self::Type1 => &[],
            Self::Type2 => &SCD_AUDIT_COLUMNS,
        };
        scd.iter()
            .chain(TYPE1_AUDIT_COLUMNS.iter())
            .map(|(src, tgt, desc)| FieldMapping {
                shape: LineShape::AuditColumn,
                source_field: src.to_string(),
                target_field: tgt.to_string(),
                transformation: desc.to_string(),
            })
            .collect()
    }
}

impl fmt::Display for InformationTableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InformationTableType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace([' ', '_', '-'], "").as_str() {
            "type1" | "1" => Ok(Self::Type1),
            "type2" | "2" => Ok(Self::Type2),
            _ => Err(format!("Unknown information table type: {}", s)),
        }
    }
}
