// steward/src/commands/mappings.rs
//
// USE CASE: Inspecting, reporting and pruning the lineage mappings.

use anyhow::Context;
use comfy_table::Cell;

use steward_core::application::{MappingReport, MappingSession};
use steward_core::domain::mapping::LayerTransition;
use steward_core::infrastructure::exchange::write_mappings;
use steward_core::infrastructure::fs::atomic_write;
use steward_core::infrastructure::MappingFile;
use steward_core::ports::MappingStore;

use super::{ProjectContext, new_table, now, parse_transition, row_index};
use crate::cli::MappingsCommand;

pub fn execute(ctx: &ProjectContext, action: MappingsCommand) -> anyhow::Result<()> {
    match action {
        MappingsCommand::Show {
            transition,
            mappings,
        } => {
            let store = ctx.mapping_file(mappings);
            let session = ctx.mapping_session(&store)?;
            let transitions = match transition {
                Some(raw) => vec![parse_transition(&raw)?],
                None => LayerTransition::ALL.to_vec(),
            };
            for t in transitions {
                show(&session, t);
            }
        }

        MappingsCommand::Report {
            format,
            check,
            mappings,
        } => {
            let store = ctx.mapping_file(mappings);
            let session = ctx.mapping_session(&store)?;
            report(ctx, &session, &format, check)?;
        }

        MappingsCommand::Export { out_dir, mappings } => {
            let store = ctx.mapping_file(mappings);
            let session = ctx.mapping_session(&store)?;
            let out_dir = ctx.output_dir(out_dir);
            let at = now();

            let mut written = 0;
            for t in LayerTransition::ALL {
                let rows: Vec<_> = session.for_transition(t).cloned().collect();
                if rows.is_empty() {
                    continue;
                }
                let path = out_dir.join(format!("{}.csv", ctx.config.report_file_stem(t, at)));
                atomic_write(&path, write_mappings(&rows)?)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("📄 {} mapping(s) → {}", rows.len(), path.display());
                written += 1;
            }
            if written == 0 {
                println!("ℹ️  No mappings to export.");
            }
        }

        MappingsCommand::DeleteTable {
            transition,
            table,
            mappings,
        } => {
            let transition = parse_transition(&transition)?;
            let store = ctx.mapping_file(mappings);
            let mut session = ctx.mapping_session(&store)?;
            let removed = session.delete_table(transition, table.trim());
            save(&store, &session)?;
            println!(
                "🗑️  {} mapping(s) removed for {} ({})",
                removed,
                table.trim(),
                transition.label()
            );
        }

        MappingsCommand::Clear {
            transition,
            mappings,
        } => {
            let transition = parse_transition(&transition)?;
            let store = ctx.mapping_file(mappings);
            let mut session = ctx.mapping_session(&store)?;
            let removed = session.clear(transition);
            save(&store, &session)?;
            println!("🧹 {} mapping(s) cleared from {}", removed, transition.label());
        }

        MappingsCommand::Delete { index, mappings } => {
            let store = ctx.mapping_file(mappings);
            let mut session = ctx.mapping_session(&store)?;
            let removed = session.delete(row_index(index)?)?;
            save(&store, &session)?;
            println!(
                "🗑️  Removed {}.{} → {}.{}",
                removed.source.table,
                removed.source_field,
                removed.target.table,
                removed.target_field
            );
        }
    }

    Ok(())
}

fn save(store: &MappingFile, session: &MappingSession) -> anyhow::Result<()> {
    store
        .save_mappings(session.mappings())
        .with_context(|| format!("Failed to write {}", store.path().display()))
}

fn show(session: &MappingSession, transition: LayerTransition) {
    let overview = session.overview(transition);
    println!("\n🗺️  {}", transition.label());

    if overview.tables.is_empty() {
        println!("   (no mappings)");
        return;
    }

    for group in &overview.tables {
        match &group.table_type {
            Some(ty) => println!("\n   {} [{}]", group.target_table, ty),
            None => println!("\n   {}", group.target_table),
        }

        let mut table = new_table();
        table.set_header(vec![
            "#",
            "Source",
            "Source Field",
            "Target Field",
            "Data Type",
            "Transformation",
        ]);
        // Row numbers are positions in the whole collection, as `delete --index` expects.
        for (i, m) in session.mappings().iter().enumerate().filter(|(_, m)| {
            m.layer_transition == transition && m.target.table == group.target_table
        }) {
            table.add_row(vec![
                Cell::new(i + 1),
                Cell::new(&m.source.table),
                Cell::new(&m.source_field),
                Cell::new(&m.target_field),
                Cell::new(&m.target_data_type),
                Cell::new(&m.transformation_logic),
            ]);
        }
        println!("{table}");
    }

    print!(
        "   Tables: {} | Mappings: {}",
        overview.total_tables, overview.total_mappings
    );
    if transition == LayerTransition::FoundationToInformation {
        print!(
            " | TYPE 1: {} | TYPE 2: {}",
            overview.type1_tables, overview.type2_tables
        );
    }
    println!();
}

fn report(
    ctx: &ProjectContext,
    session: &MappingSession,
    format: &str,
    check: bool,
) -> anyhow::Result<()> {
    println!("🔍 Building lineage report...");
    let report = MappingReport::build(session, &ctx.config);
    let target_dir = ctx.output_dir(None);

    match format {
        "json" => {
            let json = report.to_json()?;
            let out_path = target_dir.join("lineage.json");
            atomic_write(&out_path, &json)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
            println!("📄 JSON report saved to {}", out_path.display());
            println!("{}", json);
        }
        _ => {
            // Default: Mermaid
            let mermaid = report.to_mermaid();
            let out_path = target_dir.join("lineage.mmd");
            atomic_write(&out_path, &mermaid)
                .with_context(|| format!("Failed to write {}", out_path.display()))?;
            println!("\n```mermaid");
            println!("{}", mermaid);
            println!("```\n");
        }
    }

    println!("📊 Lineage Summary:");
    println!("   Tables:   {}", report.summary.total_tables);
    println!("   Mappings: {}", report.summary.total_mappings);

    if report.has_unknown_lineage() {
        eprintln!(
            "\n⚠️  {} field(s) with UNKNOWN lineage",
            report.summary.unknown_lineage
        );
        if check {
            eprintln!("\n💥 --check mode: Failing due to incomplete lineage.");
            std::process::exit(1);
        }
    } else {
        println!("   ✅ Every field has a known source.");
    }

    Ok(())
}
