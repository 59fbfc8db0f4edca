// steward/src/commands/rules.rs
//
// USE CASE: Whole-collection operations on the DQC rule file.

use std::fs::File;

use anyhow::Context;
use comfy_table::Cell;

use steward_core::infrastructure::exchange::{read_rules, write_rules};
use steward_core::infrastructure::fs::atomic_write;
use steward_core::ports::RuleStore;

use super::{ProjectContext, new_table};
use crate::cli::RulesCommand;

pub fn execute(ctx: &ProjectContext, action: RulesCommand) -> anyhow::Result<()> {
    match action {
        RulesCommand::Show { rules } => {
            let store = ctx.rule_file(rules);
            let session = ctx.rule_session(&store)?;
            if session.rules().is_empty() {
                println!("ℹ️  No rules in {}", store.path().display());
                return Ok(());
            }

            let mut table = new_table();
            table.set_header(vec![
                "#", "APPL_CD", "RULE_NM", "Method", "Layer", "Seq", "Abort", "Active",
            ]);
            for (i, r) in session.rules().iter().enumerate() {
                table.add_row(vec![
                    Cell::new(i + 1),
                    Cell::new(&r.appl_cd),
                    Cell::new(&r.rule_nm),
                    Cell::new(&r.rule_valid_meth_cd),
                    Cell::new(&r.rule_trgt_data_layer_nm),
                    Cell::new(&r.rule_seq_nr),
                    Cell::new(&r.rule_abort_ind),
                    Cell::new(&r.rule_actv_ind),
                ]);
            }
            println!("{table}");
        }

        RulesCommand::Validate { rules } => {
            let store = ctx.rule_file(rules);
            let session = ctx.rule_session(&store)?;
            println!(
                "🔍 Validating {} rule(s) from {}...",
                session.rules().len(),
                store.path().display()
            );

            let violations = session.validate_all();
            if violations.is_empty() {
                println!("✅ All rules are valid.");
            } else {
                eprintln!("\n⚠️  {} violation(s) detected:", violations.len());
                for v in &violations {
                    eprintln!("   ❌ {}", v);
                }
                std::process::exit(1);
            }
        }

        RulesCommand::Import { file, rules } => {
            let input = File::open(&file)
                .with_context(|| format!("Failed to open {}", file.display()))?;
            let imported = read_rules(input)
                .with_context(|| format!("Failed to parse {}", file.display()))?;

            let store = ctx.rule_file(rules);
            let mut session = ctx.rule_session(&store)?;
            let count = session.import(imported);
            store
                .save_rules(session.rules())
                .with_context(|| format!("Failed to write {}", store.path().display()))?;

            println!("📥 {} rule(s) imported into {}", count, store.path().display());
            let violations = session.validate_all();
            if !violations.is_empty() {
                eprintln!(
                    "⚠️  {} violation(s) in the imported rules (run `steward rules validate`)",
                    violations.len()
                );
            }
        }

        RulesCommand::Export { out_dir, rules } => {
            let store = ctx.rule_file(rules);
            let session = ctx.rule_session(&store)?;
            let path = ctx
                .output_dir(out_dir)
                .join(session.export_file_name());
            atomic_write(&path, write_rules(session.rules())?)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!(
                "📤 {} rule(s) exported to {}",
                session.rules().len(),
                path.display()
            );
        }

        RulesCommand::Stats { rules } => {
            let store = ctx.rule_file(rules);
            let session = ctx.rule_session(&store)?;
            let stats = session.stats();

            let mut table = new_table();
            table.set_header(vec!["Total", "Active", "Inactive"]);
            table.add_row(vec![
                Cell::new(stats.total),
                Cell::new(stats.active),
                Cell::new(stats.inactive),
            ]);
            println!("📊 Rule Summary");
            println!("{table}");
        }
    }

    Ok(())
}
