//! # Output Subcommand
//!
//! Emits one act's full tree as JSON, as of a given day.

use std::io::Write;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Args;

use actdb_db::Database;

/// Arguments for the output subcommand.
#[derive(Args, Debug)]
pub struct OutputArgs {
    /// The act identifier to output.
    pub identifier: String,

    /// The day to query (YYYY-MM-DD).
    #[arg(short, long)]
    pub date: NaiveDate,

    /// Emit compact JSON instead of pretty-printed.
    #[arg(short = 'n', long)]
    pub compact: bool,
}

/// Write the act's JSON to stdout.
pub fn run_output(args: &OutputArgs, db: &Database) -> Result<()> {
    let Some(act) = db.act_at(&args.identifier, args.date)? else {
        bail!(
            "act \"{}\" is not present in the state of {}",
            args.identifier,
            args.date
        );
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if args.compact {
        serde_json::to_writer(&mut out, &*act).context("serializing act")?;
    } else {
        serde_json::to_writer_pretty(&mut out, &*act).context("serializing act")?;
    }
    writeln!(out)?;
    Ok(())
}
