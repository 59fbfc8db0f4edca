// steward-core/src/infrastructure/exchange.rs
//
// Tilde-delimited exchange files. Column order is fixed and shared with the
// downstream loaders, so rows are written field by field rather than through
// serde's struct order.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::domain::mapping::{LayerTransition, MappingRecord, TableLocator};
use crate::domain::rules::{RULE_FIELDS, RuleRecord};
use crate::error::StewardError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;
use crate::ports::{MappingStore, RuleStore};

pub const DELIMITER: u8 = b'~';
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const MAPPING_FIELDS: [&str; 13] = [
    "layer_transition",
    "source_database",
    "source_schema",
    "source_table",
    "source_field",
    "target_database",
    "target_schema",
    "target_table",
    "target_field",
    "target_data_type",
    "transformation_logic",
    "change_type",
    "timestamp",
];

fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_reader(input)
}

fn writer<W: Write>(output: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(false)
        .from_writer(output)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>, InfrastructureError> {
    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(e.into_error()))
}

// --- RULES ---

/// Reads rule rows. Missing columns come back empty, unknown ones are ignored.
pub fn read_rules<R: Read>(input: R) -> Result<Vec<RuleRecord>, InfrastructureError> {
    let mut rdr = reader(input);
    let mut rules = Vec::new();
    for row in rdr.deserialize::<RuleRecord>() {
        rules.push(row?);
    }
    Ok(rules)
}

pub fn write_rules(rules: &[RuleRecord]) -> Result<Vec<u8>, InfrastructureError> {
    let mut wtr = writer(Vec::new());
    wtr.write_record(RULE_FIELDS)?;
    for rule in rules {
        wtr.write_record(rule.values())?;
    }
    finish(wtr)
}

// --- MAPPINGS ---

#[derive(Debug, Serialize, Deserialize, Default)]
#[serde(default)]
struct MappingRow {
    layer_transition: String,
    source_database: String,
    source_schema: String,
    source_table: String,
    source_field: String,
    target_database: String,
    target_schema: String,
    target_table: String,
    target_field: String,
    target_data_type: String,
    transformation_logic: String,
    change_type: String,
    timestamp: String,
}

impl MappingRow {
    fn into_record(self) -> Result<MappingRecord, String> {
        let layer_transition = self.layer_transition.parse::<LayerTransition>()?;
        let timestamp = NaiveDateTime::parse_from_str(self.timestamp.trim(), TIMESTAMP_FORMAT)
            .map_err(|e| format!("bad timestamp '{}': {}", self.timestamp, e))?;
        Ok(MappingRecord {
            layer_transition,
            source: TableLocator::new(self.source_database, self.source_schema, self.source_table),
            source_field: self.source_field,
            target: TableLocator::new(self.target_database, self.target_schema, self.target_table),
            target_field: self.target_field,
            target_data_type: self.target_data_type,
            transformation_logic: self.transformation_logic,
            change_type: self.change_type,
            timestamp,
        })
    }
}

fn mapping_values(m: &MappingRecord) -> [String; 13] {
    [
        m.layer_transition.as_str().to_string(),
        m.source.database.clone(),
        m.source.schema.clone(),
        m.source.table.clone(),
        m.source_field.clone(),
        m.target.database.clone(),
        m.target.schema.clone(),
        m.target.table.clone(),
        m.target_field.clone(),
        m.target_data_type.clone(),
        m.transformation_logic.clone(),
        m.change_type.clone(),
        m.timestamp.format(TIMESTAMP_FORMAT).to_string(),
    ]
}

/// `source` names the input in row errors.
pub fn read_mappings<R: Read>(
    input: R,
    source: &str,
) -> Result<Vec<MappingRecord>, InfrastructureError> {
    let mut rdr = reader(input);
    let mut mappings = Vec::new();
    for (i, row) in rdr.deserialize::<MappingRow>().enumerate() {
        let record = row?
            .into_record()
            .map_err(|reason| InfrastructureError::InvalidRow {
                path: source.to_string(),
                row: i + 1,
                reason,
            })?;
        mappings.push(record);
    }
    Ok(mappings)
}

pub fn write_mappings(mappings: &[MappingRecord]) -> Result<Vec<u8>, InfrastructureError> {
    let mut wtr = writer(Vec::new());
    wtr.write_record(MAPPING_FIELDS)?;
    for mapping in mappings {
        wtr.write_record(mapping_values(mapping))?;
    }
    finish(wtr)
}

// --- FILE-BACKED STORES ---

/// Rule collection kept in a tilde-delimited file.
#[derive(Debug, Clone)]
pub struct RuleFile {
    path: PathBuf,
}

impl RuleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RuleStore for RuleFile {
    #[instrument(skip(self), fields(path = ?self.path))]
    fn load_rules(&self) -> Result<Vec<RuleRecord>, StewardError> {
        if !self.path.exists() {
            debug!("Rule file absent, starting empty");
            return Ok(Vec::new());
        }
        let rules = read_rules(File::open(&self.path)?)?;
        info!(count = rules.len(), "Rules loaded");
        Ok(rules)
    }

    #[instrument(skip(self, rules), fields(path = ?self.path, count = rules.len()))]
    fn save_rules(&self, rules: &[RuleRecord]) -> Result<(), StewardError> {
        atomic_write(&self.path, write_rules(rules)?)?;
        info!("Rules saved");
        Ok(())
    }
}

/// Mapping collection kept in a tilde-delimited file.
#[derive(Debug, Clone)]
pub struct MappingFile {
    path: PathBuf,
}

impl MappingFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl MappingStore for MappingFile {
    #[instrument(skip(self), fields(path = ?self.path))]
    fn load_mappings(&self) -> Result<Vec<MappingRecord>, StewardError> {
        if !self.path.exists() {
            debug!("Mapping file absent, starting empty");
            return Ok(Vec::new());
        }
        let label = self.path.display().to_string();
        let mappings = read_mappings(File::open(&self.path)?, &label)?;
        info!(count = mappings.len(), "Mappings loaded");
        Ok(mappings)
    }

    #[instrument(skip(self, mappings), fields(path = ?self.path, count = mappings.len()))]
    fn save_mappings(&self, mappings: &[MappingRecord]) -> Result<(), StewardError> {
        atomic_write(&self.path, write_mappings(mappings)?)?;
        info!("Mappings saved");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn rule(name: &str) -> RuleRecord {
        RuleRecord {
            data_qc_id: "23".to_string(),
            appl_cd: "EMM_PAYMENTS".to_string(),
            rule_nm: name.to_string(),
            rule_logic_txt: "SELECT COUNT(*) FROM T WHERE A = 'x,y'".to_string(),
            rule_seq_nr: "1".to_string(),
            ..Default::default()
        }
    }

    fn mapping() -> MappingRecord {
        MappingRecord {
            layer_transition: LayerTransition::FoundationToInformation,
            source: TableLocator::new("PCFOPAYMENTSDBI", "APP_CFOPYMT5", "SRC"),
            source_field: "ABA_ROUTING_NR".to_string(),
            target: TableLocator::new("PCFOINFOMDBI", "APP_CFOPYMT5", "TGT"),
            target_field: "ABA_RTE_NR".to_string(),
            target_data_type: "TYPE 1".to_string(),
            transformation_logic: "Transform ABA_ROUTING_NR to VARCHAR(36); Replace NULL values with '!'".to_string(),
            change_type: "New Field Added".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(3, 4, 5)
                .unwrap(),
        }
    }

    #[test]
    fn test_rule_file_header_and_delimiter() -> anyhow::Result<()> {
        let bytes = write_rules(&[rule("T_DL2_CNT_CHK")])?;
        let text = String::from_utf8(bytes)?;
        let header = text.lines().next().unwrap();
        assert!(header.starts_with("DATA_QC_ID~APPL_CD~RULE_NM~RULE_DSC_TXT~"));
        assert!(header.ends_with("~ASSET_NM~RULE_SEQ_NR"));
        assert_eq!(header.split('~').count(), 37);
        Ok(())
    }

    #[test]
    fn test_rules_survive_a_round_trip() -> anyhow::Result<()> {
        let rules = vec![rule("A_DL2_CNT_CHK"), rule("B_DL2_CNT_CHK")];
        let bytes = write_rules(&rules)?;
        assert_eq!(read_rules(bytes.as_slice())?, rules);
        Ok(())
    }

    #[test]
    fn test_missing_rule_columns_default_to_empty() -> anyhow::Result<()> {
        let input = "APPL_CD~RULE_NM~EXTRA\nemm_pay~t_dl2_cnt_chk~ignored\n";
        let rules = read_rules(input.as_bytes())?;
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].appl_cd, "emm_pay");
        assert_eq!(rules[0].rule_seq_nr, "");
        Ok(())
    }

    #[test]
    fn test_mappings_survive_a_round_trip() -> anyhow::Result<()> {
        let bytes = write_mappings(&[mapping()])?;
        let text = String::from_utf8(bytes.clone())?;
        assert!(text.starts_with("layer_transition~source_database~"));
        assert!(text.contains("Foundation_to_Information~PCFOPAYMENTSDBI"));
        assert_eq!(read_mappings(bytes.as_slice(), "test")?, vec![mapping()]);
        Ok(())
    }

    #[test]
    fn test_bad_mapping_row_is_reported() {
        let input = "layer_transition~timestamp\nGold~2024-01-01 00:00:00\n";
        let err = read_mappings(input.as_bytes(), "bad.csv").unwrap_err();
        assert!(matches!(err, InfrastructureError::InvalidRow { row: 1, .. }));
    }

    #[test]
    fn test_file_stores() -> anyhow::Result<()> {
        let dir = tempdir()?;
        let rules = RuleFile::new(dir.path().join("rules.csv"));
        assert!(rules.load_rules()?.is_empty());
        rules.save_rules(&[rule("A_DL2_CNT_CHK")])?;
        assert_eq!(rules.load_rules()?.len(), 1);

        let mappings = MappingFile::new(dir.path().join("out").join("mappings.csv"));
        mappings.save_mappings(&[mapping(), mapping()])?;
        assert_eq!(mappings.load_mappings()?.len(), 2);
        Ok(())
    }
}
