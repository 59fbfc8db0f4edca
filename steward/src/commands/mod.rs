// steward/src/commands/mod.rs

pub mod dbt;
pub mod ddl;
pub mod mappings;
pub mod rule;
pub mod rules;

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDateTime;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use tracing::debug;

use steward_core::application::{MappingSession, RuleSession};
use steward_core::domain::mapping::{LayerTransition, TableLocator};
use steward_core::domain::project::ProjectConfig;
use steward_core::infrastructure::config::load_project_config;
use steward_core::infrastructure::{MappingFile, RuleFile};
use steward_core::ports::{MappingStore, RuleStore};

use crate::cli::LocatorArgs;

/// Project directory plus its resolved configuration.
pub struct ProjectContext {
    pub project_dir: PathBuf,
    pub config: ProjectConfig,
}

impl ProjectContext {
    pub fn load(project_dir: PathBuf) -> anyhow::Result<Self> {
        let config = load_project_config(&project_dir).with_context(|| {
            format!(
                "Failed to load project configuration from {}",
                project_dir.display()
            )
        })?;
        debug!(dir = ?project_dir, rules = %config.rules_path, mappings = %config.mappings_path, "Project context ready");
        Ok(Self {
            project_dir,
            config,
        })
    }

    /// An explicit path wins; otherwise the configured one, relative to the project.
    fn resolve(&self, explicit: Option<PathBuf>, configured: &str) -> PathBuf {
        explicit.unwrap_or_else(|| self.project_dir.join(configured))
    }

    pub fn rule_file(&self, explicit: Option<PathBuf>) -> RuleFile {
        RuleFile::new(self.resolve(explicit, &self.config.rules_path))
    }

    pub fn mapping_file(&self, explicit: Option<PathBuf>) -> MappingFile {
        MappingFile::new(self.resolve(explicit, &self.config.mappings_path))
    }

    pub fn output_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        self.resolve(explicit, &self.config.target_path)
    }

    pub fn rule_session(&self, store: &RuleFile) -> anyhow::Result<RuleSession> {
        let rules = store
            .load_rules()
            .with_context(|| format!("Failed to read rules from {}", store.path().display()))?;
        Ok(RuleSession::with_rules(
            rules,
            self.config.rule_defaults.clone(),
        )?)
    }

    pub fn mapping_session(&self, store: &MappingFile) -> anyhow::Result<MappingSession> {
        let mappings = store
            .load_mappings()
            .with_context(|| format!("Failed to read mappings from {}", store.path().display()))?;
        Ok(MappingSession::with_mappings(mappings)?)
    }

    /// Fills missing database/schema from the layer defaults of `transition`.
    pub fn locators(
        &self,
        args: &LocatorArgs,
        transition: LayerTransition,
    ) -> (TableLocator, TableLocator) {
        let defaults = &self.config.mapping_defaults;
        let src = defaults.source_for(transition);
        let tgt = defaults.target_for(transition);
        let source = TableLocator::new(
            args.source_db.clone().unwrap_or_else(|| src.database.clone()),
            args.source_schema
                .clone()
                .unwrap_or_else(|| src.schema.clone()),
            args.source_table.trim(),
        );
        let target = TableLocator::new(
            args.target_db.clone().unwrap_or_else(|| tgt.database.clone()),
            args.target_schema
                .clone()
                .unwrap_or_else(|| tgt.schema.clone()),
            args.target_table.trim(),
        );
        (source, target)
    }
}

pub fn read_script(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Parses the `--transition` argument.
pub fn parse_transition(raw: &str) -> anyhow::Result<LayerTransition> {
    raw.parse::<LayerTransition>().map_err(anyhow::Error::msg)
}

/// Converts a 1-based row number from the CLI into a collection index.
pub fn row_index(row: usize) -> anyhow::Result<usize> {
    row.checked_sub(1)
        .ok_or_else(|| anyhow::anyhow!("Row numbers start at 1"))
}
