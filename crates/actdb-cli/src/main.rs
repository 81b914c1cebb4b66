//! # actdb CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use actdb_cli::add_act::{run_add_act, AddActArgs};
use actdb_cli::list::{run_list, ListArgs};
use actdb_cli::output::{run_output, OutputArgs};
use actdb_cli::recompute::{run_recompute, RecomputeArgs};
use actdb_db::Database;

/// Versioned act database.
///
/// Stores parsed acts, computes their point-in-time state day by day under
/// their amendments, and serves historical queries.
#[derive(Parser, Debug)]
#[command(name = "actdb", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// The database storage root.
    #[arg(long, global = true, default_value = ".")]
    storage_root: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// File parsed raw acts into the intake directory.
    AddAct(AddActArgs),

    /// Recompute day states over a date range.
    Recompute(RecomputeArgs),

    /// List the acts in force on a date.
    List(ListArgs),

    /// Emit one act's tree as JSON, as of a date.
    Output(OutputArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let db = Database::new(&cli.storage_root);

    let result = match cli.command {
        Commands::AddAct(args) => run_add_act(&args, &db),
        Commands::Recompute(args) => run_recompute(&args, &db),
        Commands::List(args) => run_list(&args, &db),
        Commands::Output(args) => run_output(&args, &db),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn cli_parse_add_act() {
        let cli = Cli::try_parse_from(["actdb", "add-act", "one.json.gz", "two.yaml"]).unwrap();
        if let Commands::AddAct(args) = cli.command {
            assert_eq!(
                args.act_files,
                [PathBuf::from("one.json.gz"), PathBuf::from("two.yaml")]
            );
        } else {
            panic!("wrong subcommand");
        }
    }

    #[test]
    fn cli_parse_add_act_requires_files() {
        assert!(Cli::try_parse_from(["actdb", "add-act"]).is_err());
    }

    #[test]
    fn cli_parse_recompute_single_day() {
        let cli = Cli::try_parse_from(["actdb", "recompute", "--from", "2020-01-01"]).unwrap();
        if let Commands::Recompute(args) = cli.command {
            assert_eq!(args.from, date("2020-01-01"));
            assert!(args.to.is_none());
        } else {
            panic!("wrong subcommand");
        }
    }

    #[test]
    fn cli_parse_recompute_range() {
        let cli = Cli::try_parse_from([
            "actdb",
            "recompute",
            "--from",
            "2020-01-01",
            "--to",
            "2020-12-31",
        ])
        .unwrap();
        if let Commands::Recompute(args) = cli.command {
            assert_eq!(args.to, Some(date("2020-12-31")));
        } else {
            panic!("wrong subcommand");
        }
    }

    #[test]
    fn cli_parse_list() {
        let cli = Cli::try_parse_from(["actdb", "list", "-d", "2020-06-01"]).unwrap();
        if let Commands::List(args) = cli.command {
            assert_eq!(args.date, date("2020-06-01"));
        } else {
            panic!("wrong subcommand");
        }
    }

    #[test]
    fn cli_parse_output_compact() {
        let cli = Cli::try_parse_from([
            "actdb",
            "output",
            "2012. évi C. törvény",
            "-d",
            "2020-06-01",
            "-n",
        ])
        .unwrap();
        if let Commands::Output(args) = cli.command {
            assert_eq!(args.identifier, "2012. évi C. törvény");
            assert!(args.compact);
        } else {
            panic!("wrong subcommand");
        }
    }

    #[test]
    fn cli_parse_rejects_bad_date() {
        assert!(Cli::try_parse_from(["actdb", "list", "-d", "not-a-date"]).is_err());
    }

    #[test]
    fn cli_parse_global_options() {
        let cli = Cli::try_parse_from([
            "actdb",
            "-vv",
            "--storage-root",
            "/tmp/actdb",
            "list",
            "-d",
            "2020-06-01",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.storage_root, PathBuf::from("/tmp/actdb"));
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["actdb"]).is_err());
    }
}
