// steward/src/commands/dbt.rs
//
// USE CASE: Foundation → Information lineage from a DBT SELECT body.

use anyhow::{Context, bail};

use steward_core::application::DbtIngest;
use steward_core::domain::mapping::{InformationTableType, LayerTransition, SourceFieldPolicy};
use steward_core::ports::MappingStore;

use super::{ProjectContext, now, read_script};
use crate::cli::DbtArgs;

fn parse_table_type(raw: &str) -> anyhow::Result<InformationTableType> {
    match raw.to_lowercase().replace([' ', '_', '-'], "").as_str() {
        "type1" | "1" => Ok(InformationTableType::Type1),
        "type2" | "2" => Ok(InformationTableType::Type2),
        _ => bail!("Unknown table type '{}' (expected type1 or type2)", raw),
    }
}

pub fn execute(ctx: &ProjectContext, args: DbtArgs) -> anyhow::Result<()> {
    println!("🔄 Parsing DBT transformation script...");

    let table_type = parse_table_type(&args.table_type)?;
    let script = read_script(&args.script_file)?;
    let (source, target) =
        ctx.locators(&args.locator, LayerTransition::FoundationToInformation);
    let policy = if args.heuristic {
        SourceFieldPolicy::Heuristic
    } else {
        SourceFieldPolicy::Strict
    };

    let store = ctx.mapping_file(args.mappings);
    let mut session = ctx.mapping_session(&store)?;

    let request = DbtIngest {
        source,
        target,
        table_type,
        script,
        policy,
    };
    let outcome = session.ingest_dbt(&request, now())?;

    store
        .save_mappings(session.mappings())
        .with_context(|| format!("Failed to write {}", store.path().display()))?;

    println!(
        "✅ {} mapping(s) added for {} ({})",
        outcome.total(),
        outcome.target_table,
        table_type.as_str()
    );
    println!("   Business fields: {}", outcome.business_columns);
    println!("   Audit columns:   {}", outcome.audit_columns);
    if outcome.unknown_lineage > 0 {
        eprintln!(
            "⚠️  {} field(s) have UNKNOWN lineage and need manual input",
            outcome.unknown_lineage
        );
    }
    println!("   Saved to {}", store.path().display());

    Ok(())
}
