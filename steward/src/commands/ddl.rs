// steward/src/commands/ddl.rs
//
// USE CASE: DL2 → Foundation lineage from a CREATE TABLE script.

use anyhow::Context;

use steward_core::application::DdlIngest;
use steward_core::domain::mapping::LayerTransition;
use steward_core::ports::MappingStore;

use super::{ProjectContext, now, read_script};
use crate::cli::DdlArgs;

pub fn execute(ctx: &ProjectContext, args: DdlArgs) -> anyhow::Result<()> {
    println!("🏗️  Parsing foundation DDL...");

    let ddl = read_script(&args.ddl_file)?;
    let (source, target) = ctx.locators(&args.locator, LayerTransition::Dl2ToFoundation);

    let store = ctx.mapping_file(args.mappings);
    let mut session = ctx.mapping_session(&store)?;

    let request = DdlIngest {
        source,
        target,
        ddl,
    };
    let outcome = session.ingest_ddl(&request, now())?;

    store
        .save_mappings(session.mappings())
        .with_context(|| format!("Failed to write {}", store.path().display()))?;

    println!(
        "✅ {} mapping(s) added for {}",
        outcome.total(),
        outcome.target_table
    );
    println!("   Business columns: {}", outcome.business_columns);
    println!("   Audit columns:    {}", outcome.audit_columns);
    println!("   Saved to {}", store.path().display());

    Ok(())
}
