//! `task-converter` command line entry point

use anyhow::Context;
use taskconv_core::{cli, migrate, MigrationConfig, MigrationSummary, EXIT_FAILURE, EXIT_USAGE};
use tracing_subscriber::EnvFilter;

fn main() {
    let matches = cli::command().get_matches();
    init_tracing(cli::verbosity(&matches));

    let config = cli::config_from_matches(&matches);
    if config.validate().is_err() {
        eprintln!("{}", cli::USAGE_MESSAGE);
        std::process::exit(EXIT_USAGE);
    }

    match run(config) {
        Ok(summary) => println!("{summary}"),
        Err(err) => {
            eprintln!("error: {err:#}");
            std::process::exit(EXIT_FAILURE);
        }
    }
}

fn run(config: MigrationConfig) -> anyhow::Result<MigrationSummary> {
    let root = config.tasks_root.clone();
    let dry_run = config.dry_run;
    let summary =
        migrate(config).with_context(|| format!("migration of {} aborted", root.display()))?;
    if dry_run {
        tracing::warn!("dry run: no descriptor was written");
    }
    Ok(summary)
}

fn init_tracing(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli::log_level(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
