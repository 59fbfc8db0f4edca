// steward-core/src/domain/project/configuration.rs

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::mapping::LayerTransition;
use crate::domain::rules::DEFAULT_APPL_CD_PREFIX;

pub const EXPORT_FALLBACK_PREFIX: &str = "DDLC_Export";

#[derive(Debug, Deserialize, Serialize, Clone, Default, Validate)]
pub struct ProjectConfig {
    #[validate(length(min = 1, message = "Project name cannot be empty"))]
    pub name: String,

    #[validate(length(min = 1, message = "Project version cannot be empty"))]
    pub version: String,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(rename = "rules-path", default = "default_rules_path")]
    pub rules_path: String,

    #[serde(rename = "mappings-path", default = "default_mappings_path")]
    pub mappings_path: String,

    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[validate(nested)]
    #[serde(rename = "rule-defaults", default)]
    pub rule_defaults: RuleDefaults,

    #[validate(nested)]
    #[serde(rename = "mapping-defaults", default)]
    pub mapping_defaults: MappingDefaults,
}

impl ProjectConfig {
    /// Built-in settings used when no project file exists.
    pub fn builtin() -> Self {
        Self {
            rules_path: default_rules_path(),
            mappings_path: default_mappings_path(),
            target_path: default_target_path(),
            ..Default::default()
        }
    }

    /// `{name}_{version}` once both are known, `DDLC_Export` otherwise.
    pub fn export_prefix(&self) -> String {
        if self.name.trim().is_empty() || self.version.trim().is_empty() {
            EXPORT_FALLBACK_PREFIX.to_string()
        } else {
            format!("{}_{}", self.name.trim(), self.version.trim())
        }
    }

    /// Base name (no extension) of a per-layer mapping report.
    pub fn report_file_stem(&self, transition: LayerTransition, at: NaiveDateTime) -> String {
        format!(
            "{}_{}_Layer_DDLC_{}",
            self.export_prefix(),
            transition.target_layer(),
            at.format("%Y%m%d_%H%M%S")
        )
    }
}

/// Values stamped on every rule built from the form.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
#[serde(rename_all = "kebab-case", default)]
pub struct RuleDefaults {
    #[validate(length(min = 1))]
    pub data_qc_id: String,
    pub frequency: String,
    pub source_attribute: String,
    pub target_attribute: String,
    pub cde_indicator: String,
    pub expiry_date: String,
    pub asset_id: String,
    #[validate(length(min = 1, message = "Creator id cannot be empty"))]
    pub creator_id: String,
    pub appl_cd_prefix: String,
}

impl Default for RuleDefaults {
    fn default() -> Self {
        Self {
            data_qc_id: "23".to_string(),
            frequency: "DAILY".to_string(),
            source_attribute: "NA".to_string(),
            target_attribute: "NA".to_string(),
            cde_indicator: "N".to_string(),
            expiry_date: "9999-12-31".to_string(),
            asset_id: "9999".to_string(),
            creator_id: "PL6P223".to_string(),
            appl_cd_prefix: DEFAULT_APPL_CD_PREFIX.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
pub struct LayerLocation {
    #[validate(length(min = 1))]
    pub database: String,
    #[validate(length(min = 1))]
    pub schema: String,
}

impl LayerLocation {
    fn new(database: &str, schema: &str) -> Self {
        Self {
            database: database.to_string(),
            schema: schema.to_string(),
        }
    }
}

/// Default database and schema of each warehouse layer.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct MappingDefaults {
    #[validate(nested)]
    pub dl2: LayerLocation,
    #[validate(nested)]
    pub foundation: LayerLocation,
    #[validate(nested)]
    pub information: LayerLocation,
}

impl Default for MappingDefaults {
    fn default() -> Self {
        Self {
            dl2: LayerLocation::new("PROD_DL2_CHIEF_FINANCIAL_OFFICE_RQ", "ENTERPRISE"),
            foundation: LayerLocation::new("PCFOPAYMENTSDBI", "APP_CFOPYMT5"),
            information: LayerLocation::new("PCFOINFOMDBI", "APP_CFOPYMT5"),
        }
    }
}

impl MappingDefaults {
    pub fn source_for(&self, transition: LayerTransition) -> &LayerLocation {
        match transition {
            LayerTransition::Dl2ToFoundation => &self.dl2,
            LayerTransition::FoundationToInformation => &self.foundation,
        }
    }

    pub fn target_for(&self, transition: LayerTransition) -> &LayerLocation {
        match transition {
            LayerTransition::Dl2ToFoundation => &self.foundation,
            LayerTransition::FoundationToInformation => &self.information,
        }
    }
}

fn default_rules_path() -> String {
    "dqc_rules.csv".to_string()
}
fn default_mappings_path() -> String {
    "mappings.csv".to_string()
}
fn default_target_path() -> String {
    "target".to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_minimal_yaml_fills_defaults() -> anyhow::Result<()> {
        let config: ProjectConfig = serde_yaml::from_str("name: payments\nversion: v2\n")?;
        assert_eq!(config.rules_path, "dqc_rules.csv");
        assert_eq!(config.rule_defaults.data_qc_id, "23");
        assert_eq!(config.mapping_defaults.information.database, "PCFOINFOMDBI");
        assert!(config.validate().is_ok());
        Ok(())
    }

    #[test]
    fn test_partial_rule_defaults_keep_the_rest() -> anyhow::Result<()> {
        let yaml = "name: p\nversion: v1\nrule-defaults:\n  creator-id: AB12345\n";
        let config: ProjectConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.rule_defaults.creator_id, "AB12345");
        assert_eq!(config.rule_defaults.expiry_date, "9999-12-31");
        Ok(())
    }

    #[test]
    fn test_empty_name_fails_validation() -> anyhow::Result<()> {
        let config: ProjectConfig = serde_yaml::from_str("name: ''\nversion: v1\n")?;
        assert!(config.validate().is_err());
        Ok(())
    }

    #[test]
    fn test_report_file_stem() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap();
        let mut config = ProjectConfig::builtin();
        assert_eq!(
            config.report_file_stem(LayerTransition::Dl2ToFoundation, at),
            "DDLC_Export_Foundation_Layer_DDLC_20240301_093005"
        );
        config.name = "PAYMENTS".to_string();
        config.version = "v3".to_string();
        assert_eq!(
            config.report_file_stem(LayerTransition::FoundationToInformation, at),
            "PAYMENTS_v3_Information_Layer_DDLC_20240301_093005"
        );
    }
}
