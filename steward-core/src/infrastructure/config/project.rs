// steward-core/src/infrastructure/config/project.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};
use validator::Validate;

use crate::domain::project::configuration::ProjectConfig;
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["steward_project_conf.yaml", "steward.yaml"];

pub const ENV_RULES_PATH: &str = "STEWARD_RULES_PATH";
pub const ENV_MAPPINGS_PATH: &str = "STEWARD_MAPPINGS_PATH";
pub const ENV_CREATOR_ID: &str = "STEWARD_CREATOR_ID";

/// Loads the project file when there is one, built-in defaults otherwise,
/// then applies environment overrides.
#[instrument(skip(project_dir))]
pub fn load_project_config(project_dir: &Path) -> Result<ProjectConfig, InfrastructureError> {
    let mut config = match find_main_config(project_dir) {
        Some(config_path) => {
            info!(path = ?config_path, "Loading project configuration");
            let content = fs::read_to_string(&config_path)?;
            let config: ProjectConfig = serde_yaml::from_str(&content)?;
            config
                .validate()
                .map_err(|e| InfrastructureError::ConfigError(e.to_string()))?;
            config
        }
        None => {
            debug!(dir = ?project_dir, "No project file, using built-in defaults");
            ProjectConfig::builtin()
        }
    };

    // Override via Variables d'Environnement (Pattern 'Layering')
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn apply_env_overrides(config: &mut ProjectConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup(ENV_RULES_PATH) {
        info!(old = ?config.rules_path, new = ?val, "Overriding rules path via ENV");
        config.rules_path = val;
    }
    if let Some(val) = lookup(ENV_MAPPINGS_PATH) {
        info!(old = ?config.mappings_path, new = ?val, "Overriding mappings path via ENV");
        config.mappings_path = val;
    }
    if let Some(val) = lookup(ENV_CREATOR_ID) {
        info!(old = ?config.rule_defaults.creator_id, new = ?val, "Overriding creator id via ENV");
        config.rule_defaults.creator_id = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_builtin_defaults() -> Result<()> {
        let dir = tempdir()?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.export_prefix(), "DDLC_Export");
        assert_eq!(config.rule_defaults.data_qc_id, "23");
        Ok(())
    }

    #[test]
    fn test_project_file_is_loaded() -> Result<()> {
        let dir = tempdir()?;
        fs::write(
            dir.path().join("steward.yaml"),
            "name: PAYMENTS\nversion: v2\nauthor: data-eng\nrules-path: rules/dqc.csv\n",
        )?;
        let config = load_project_config(dir.path())?;
        assert_eq!(config.export_prefix(), "PAYMENTS_v2");
        assert_eq!(config.author.as_deref(), Some("data-eng"));
        Ok(())
    }

    #[test]
    fn test_invalid_project_file_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("steward.yaml"), "name: ''\nversion: v1\n")?;
        assert!(matches!(
            load_project_config(dir.path()),
            Err(InfrastructureError::ConfigError(_))
        ));

        fs::write(dir.path().join("steward.yaml"), "name: [unclosed\n")?;
        assert!(matches!(
            load_project_config(dir.path()),
            Err(InfrastructureError::YamlError(_))
        ));
        Ok(())
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProjectConfig::builtin();
        apply_env_overrides(&mut config, |key| match key {
            ENV_RULES_PATH => Some("/tmp/rules.csv".to_string()),
            ENV_CREATOR_ID => Some("ZZ99999".to_string()),
            _ => None,
        });
        assert_eq!(config.rules_path, "/tmp/rules.csv");
        assert_eq!(config.mappings_path, "mappings.csv");
        assert_eq!(config.rule_defaults.creator_id, "ZZ99999");
    }
}
