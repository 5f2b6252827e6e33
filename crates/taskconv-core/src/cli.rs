//! Command line surface of `task-converter`

use crate::config::MigrationConfig;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Printed to stderr when no operation flag is given
pub const USAGE_MESSAGE: &str =
    "Please select at least one of --delete-html and --convert-yaml. See task-converter --help";

/// Build the argument parser
#[must_use]
pub fn command() -> Command {
    Command::new("task-converter")
        .version(crate::VERSION)
        .about("Migrate task descriptors: convert *IsHTML fields and rewrite descriptors as YAML")
        .arg(
            Arg::new("tasks")
                .value_name("TASKS")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the tasks directory (one subdirectory per course)"),
        )
        .arg(
            Arg::new("delete-html")
                .long("delete-html")
                .action(ArgAction::SetTrue)
                .help("Convert fields flagged with *IsHTML to raw html blocks and remove the flags"),
        )
        .arg(
            Arg::new("convert-yaml")
                .long("convert-yaml")
                .action(ArgAction::SetTrue)
                .help("Rewrite every task descriptor as task.yaml"),
        )
        .arg(
            Arg::new("dry-run")
                .long("dry-run")
                .action(ArgAction::SetTrue)
                .help("Load and convert every task but write nothing"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug, -vvv trace)"),
        )
}

/// Map parsed arguments into a run configuration
#[must_use]
pub fn config_from_matches(matches: &ArgMatches) -> MigrationConfig {
    let tasks_root = matches
        .get_one::<PathBuf>("tasks")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));

    MigrationConfig::new(tasks_root)
        .with_delete_html(matches.get_flag("delete-html"))
        .with_convert_yaml(matches.get_flag("convert-yaml"))
        .with_dry_run(matches.get_flag("dry-run"))
}

/// Number of `-v` flags
#[inline]
#[must_use]
pub fn verbosity(matches: &ArgMatches) -> u8 {
    matches.get_count("verbose")
}

/// Default log filter for a verbosity count, used when `RUST_LOG` is unset
#[must_use]
pub fn log_level(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
