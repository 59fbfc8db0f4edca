// steward/src/main.rs

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};
use commands::ProjectContext;

fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug steward rules validate ... pour voir les détails
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = ProjectContext::load(cli.project_dir)?;

    match cli.command {
        // --- USE CASE: DL2 → FOUNDATION ---
        Commands::Ddl(args) => commands::ddl::execute(&ctx, args)?,

        // --- USE CASE: FOUNDATION → INFORMATION ---
        Commands::Dbt(args) => commands::dbt::execute(&ctx, args)?,

        // --- USE CASE: LINEAGE COLLECTION ---
        Commands::Mappings { action } => commands::mappings::execute(&ctx, action)?,

        // --- USE CASE: DQC RULES ---
        Commands::Rule { action } => commands::rule::execute(&ctx, action)?,
        Commands::Rules { action } => commands::rules::execute(&ctx, action)?,
    }

    Ok(())
}
