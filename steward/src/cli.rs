// steward/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "steward")]
#[command(about = "Lineage mappings and DQC rules for the medallion warehouse", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory (steward.yaml and exchange files live here)
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🏗️  Parses a foundation DDL into DL2 → Foundation mappings
    Ddl(DdlArgs),

    /// 🔄 Parses a DBT SELECT into Foundation → Information mappings
    Dbt(DbtArgs),

    /// 🗺️  Shows, reports and deletes lineage mappings
    Mappings {
        #[command(subcommand)]
        action: MappingsCommand,
    },

    /// 🧩 Derives, adds, edits or deletes a single DQC rule
    Rule {
        #[command(subcommand)]
        action: RuleCommand,
    },

    /// 📋 Validates, imports and exports the DQC rule collection
    Rules {
        #[command(subcommand)]
        action: RulesCommand,
    },
}

/// Source and target table coordinates; missing database/schema fall back
/// to the project's mapping defaults.
#[derive(Args, Debug, Clone)]
pub struct LocatorArgs {
    #[arg(long)]
    pub source_db: Option<String>,
    #[arg(long)]
    pub source_schema: Option<String>,
    #[arg(long)]
    pub source_table: String,
    #[arg(long)]
    pub target_db: Option<String>,
    #[arg(long)]
    pub target_schema: Option<String>,
    #[arg(long)]
    pub target_table: String,
}

#[derive(Args, Debug)]
pub struct DdlArgs {
    /// File holding the CREATE TABLE script
    #[arg(long)]
    pub ddl_file: PathBuf,

    #[command(flatten)]
    pub locator: LocatorArgs,

    /// Mapping file (default: mappings-path from the project config)
    #[arg(long)]
    pub mappings: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct DbtArgs {
    /// File holding the DBT SELECT body
    #[arg(long)]
    pub script_file: PathBuf,

    #[command(flatten)]
    pub locator: LocatorArgs,

    /// Information table type: type1 | type2
    #[arg(long, default_value = "type1")]
    pub table_type: String,

    /// Guess source fields of unrecognized expressions instead of marking them UNKNOWN
    #[arg(long)]
    pub heuristic: bool,

    #[arg(long)]
    pub mappings: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum MappingsCommand {
    /// Lists mappings grouped by target table
    Show {
        /// dl2-foundation | foundation-information (default: both)
        #[arg(long)]
        transition: Option<String>,
        #[arg(long)]
        mappings: Option<PathBuf>,
    },

    /// Writes the lineage report into the target directory
    Report {
        /// Output format: mermaid | json
        #[arg(long, default_value = "mermaid")]
        format: String,
        /// Exit with error if some lineage is still UNKNOWN
        #[arg(long)]
        check: bool,
        #[arg(long)]
        mappings: Option<PathBuf>,
    },

    /// Writes one DDLC mapping file per layer transition
    Export {
        /// Output directory (default: target-path from the project config)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[arg(long)]
        mappings: Option<PathBuf>,
    },

    /// Deletes every mapping of one target table
    DeleteTable {
        #[arg(long)]
        transition: String,
        #[arg(long)]
        table: String,
        #[arg(long)]
        mappings: Option<PathBuf>,
    },

    /// Deletes every mapping of one layer transition
    Clear {
        #[arg(long)]
        transition: String,
        #[arg(long)]
        mappings: Option<PathBuf>,
    },

    /// Deletes one mapping by its row number (as listed by `show`)
    Delete {
        #[arg(long)]
        index: usize,
        #[arg(long)]
        mappings: Option<PathBuf>,
    },
}

/// Form selections from which a rule is derived.
#[derive(Args, Debug, Clone)]
pub struct RuleFormArgs {
    #[arg(long)]
    pub target_object: String,

    /// CNT_CHK | SUM_CHK | DIFF_CNT_CHK | DIFF_SUM_CHK | DUP_CHK | OVERLAP_CHK
    #[arg(long, default_value = "CNT_CHK")]
    pub method: String,

    /// CFOPAYMENTSDB | CFOINFODMDB
    #[arg(long, default_value = "CFOPAYMENTSDB")]
    pub database: String,

    /// DL2 | DL3 | OnPrem_HOP1 | OnPrem_HOP2 | OnPrem_HOP3 | OnPrem
    #[arg(long, default_value = "DL2")]
    pub layer: String,

    /// Column summed by SUM_CHK / DIFF_SUM_CHK
    #[arg(long)]
    pub attribute: Option<String>,
}

#[derive(Subcommand)]
pub enum RuleCommand {
    /// Prints the derived name, description and abort indicator
    Name {
        #[command(flatten)]
        form: RuleFormArgs,
    },

    /// Adds a rule; invalid rules are rejected
    Add {
        #[command(flatten)]
        form: RuleFormArgs,

        #[arg(long)]
        appl_cd: String,

        /// POST | PRE
        #[arg(long, default_value = "POST")]
        category: String,

        /// 1..=20
        #[arg(long, default_value = "1")]
        sequence: String,

        #[arg(long)]
        source_db: Option<String>,
        #[arg(long)]
        source_schema: Option<String>,
        #[arg(long)]
        source_object: Option<String>,
        #[arg(long)]
        target_schema: Option<String>,

        #[arg(long)]
        logic: Option<String>,

        /// Overrides the derived rule name (e.g. to resolve (STG|INFO))
        #[arg(long)]
        rule_name: Option<String>,

        #[arg(long)]
        inactive: bool,

        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Edits columns of one rule: --set RULE_SEQ_NR=2
    Edit {
        /// Row number as listed by `rules show`
        #[arg(long)]
        index: usize,

        #[arg(long = "set", value_name = "FIELD=VALUE", required = true)]
        changes: Vec<String>,

        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Deletes one rule by row number
    Delete {
        #[arg(long)]
        index: usize,

        #[arg(long)]
        rules: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum RulesCommand {
    /// Lists the rules
    Show {
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Validates every rule; exits with error when violations exist
    Validate {
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Replaces the collection with a '~'-delimited file
    Import {
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Writes DATA_QC_RULE_INFO_<APPL_CD>.csv
    Export {
        /// Output directory (default: target-path from the project config)
        #[arg(long)]
        out_dir: Option<PathBuf>,

        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Total / active / inactive counts
    Stats {
        #[arg(long)]
        rules: Option<PathBuf>,
    },
}
