// steward/src/commands/rule.rs
//
// USE CASE: Deriving and maintaining a single DQC rule.

use anyhow::{Context, bail};

use steward_core::application::RuleSession;
use steward_core::domain::DomainError;
use steward_core::domain::project::RuleDefaults;
use steward_core::domain::rules::RuleForm;
use steward_core::infrastructure::RuleFile;
use steward_core::ports::RuleStore;

use super::{ProjectContext, now, row_index};
use crate::cli::{RuleCommand, RuleFormArgs};

/// Applies the CLI selections to a fresh form, in the order a user fills it.
fn form_from_args(args: &RuleFormArgs, defaults: &RuleDefaults) -> RuleForm {
    let mut form = RuleForm {
        method: args.method.trim().to_uppercase(),
        target_database: args.database.trim().to_uppercase(),
        target_object: args.target_object.trim().to_uppercase(),
        ..RuleForm::with_defaults(defaults)
    };
    if let Some(attr) = &args.attribute {
        form.target_attribute = attr.trim().to_uppercase();
    }
    form.with_data_layer(args.layer.trim())
}

fn print_derived(form: &RuleForm) {
    println!("🧩 Rule name:        {}", form.rule_name);
    println!("   Description:      {}", form.description);
    println!("   Abort indicator:  {}", form.abort_indicator);
    println!("   Target attribute: {}", form.target_attribute);
    println!("   Target database:  {}", form.target_database);
}

fn warn_ambiguity(form: &RuleForm) {
    if let Some(ambiguity) = form.derive().ambiguity() {
        eprintln!("⚠️  {}", ambiguity.message());
    }
}

/// Prints the violations of a rejected rule and exits; other errors propagate.
fn exit_on_rejection(err: DomainError) -> anyhow::Error {
    if let DomainError::RuleRejected {
        rule_name,
        violations,
    } = &err
    {
        eprintln!("❌ Rule '{}' rejected:", rule_name);
        for v in violations {
            eprintln!("   - {}", v);
        }
        std::process::exit(1);
    }
    err.into()
}

fn save(store: &RuleFile, session: &RuleSession) -> anyhow::Result<()> {
    store
        .save_rules(session.rules())
        .with_context(|| format!("Failed to write {}", store.path().display()))
}

pub fn execute(ctx: &ProjectContext, action: RuleCommand) -> anyhow::Result<()> {
    match action {
        RuleCommand::Name { form } => {
            let form = form_from_args(&form, &ctx.config.rule_defaults);
            print_derived(&form);
            warn_ambiguity(&form);
        }

        RuleCommand::Add {
            form,
            appl_cd,
            category,
            sequence,
            source_db,
            source_schema,
            source_object,
            target_schema,
            logic,
            rule_name,
            inactive,
            rules,
        } => {
            let mut form = form_from_args(&form, &ctx.config.rule_defaults);
            form.appl_cd = appl_cd.trim().to_string();
            form.category = category.trim().to_uppercase();
            form.sequence_number = sequence.trim().to_string();
            form.active = if inactive { "N" } else { "Y" }.to_string();
            if let Some(v) = source_db {
                form.source_database = v;
            }
            if let Some(v) = source_schema {
                form.source_schema = v;
            }
            if let Some(v) = source_object {
                form.source_object = v;
            }
            if let Some(v) = target_schema {
                form.target_schema = v;
            }
            if let Some(v) = logic {
                form.rule_logic = v;
            }
            if let Some(name) = rule_name {
                form = form.with_rule_name(name.trim());
            } else {
                warn_ambiguity(&form);
            }

            let store = ctx.rule_file(rules);
            let mut session = ctx.rule_session(&store)?;
            let index = session
                .add_from_form(form, now())
                .map_err(exit_on_rejection)?;
            save(&store, &session)?;

            let added = &session.rules()[index];
            println!("✅ Rule {} added as row {}", added.rule_nm, index + 1);
            println!("   {}", added.rule_dsc_txt);
        }

        RuleCommand::Edit {
            index,
            changes,
            rules,
        } => {
            let mut pairs = Vec::with_capacity(changes.len());
            for change in &changes {
                let Some((field, value)) = change.split_once('=') else {
                    bail!("Expected FIELD=VALUE, got '{}'", change);
                };
                pairs.push((field.trim().to_string(), value.trim().to_string()));
            }

            let store = ctx.rule_file(rules);
            let mut session = ctx.rule_session(&store)?;
            session
                .update_fields(row_index(index)?, &pairs)
                .map_err(exit_on_rejection)?;
            save(&store, &session)?;
            println!("✅ Row {} updated ({} field(s))", index, pairs.len());
        }

        RuleCommand::Delete { index, rules } => {
            let store = ctx.rule_file(rules);
            let mut session = ctx.rule_session(&store)?;
            let removed = session.delete_rule(row_index(index)?)?;
            save(&store, &session)?;
            println!("🗑️  Rule {} deleted", removed.rule_nm);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(method: &str, database: &str, layer: &str) -> RuleFormArgs {
        RuleFormArgs {
            target_object: "payment_tbl".to_string(),
            method: method.to_string(),
            database: database.to_string(),
            layer: layer.to_string(),
            attribute: None,
        }
    }

    #[test]
    fn test_form_from_args_derives_name() {
        let form = form_from_args(&args("CNT_CHK", "CFOPAYMENTSDB", "DL2"), &RuleDefaults::default());
        assert_eq!(form.rule_name, "PAYMENT_TBL_DL2_CNT_CHK");
        assert_eq!(form.abort_indicator, "N");
    }

    #[test]
    fn test_form_from_args_on_prem_layer_forces_payments_database() {
        let form = form_from_args(
            &args("DUP_CHK", "CFOINFODMDB", "OnPrem_HOP1"),
            &RuleDefaults::default(),
        );
        assert_eq!(form.target_database, "CFOPAYMENTSDB");
        assert_eq!(form.abort_indicator, "Y");
    }
}
