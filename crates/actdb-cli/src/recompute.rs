//! # Recompute Subcommand
//!
//! Recomputes day states over an inclusive date range. Days are strictly
//! sequential; recomputing a day overwrites any state previously computed
//! for it.

use anyhow::{ensure, Context, Result};
use chrono::NaiveDate;
use clap::Args;

use actdb_db::Database;

/// Arguments for the recompute subcommand.
#[derive(Args, Debug)]
pub struct RecomputeArgs {
    /// First day to recompute (YYYY-MM-DD).
    #[arg(long)]
    pub from: NaiveDate,

    /// Last day to recompute, inclusive. Defaults to the first day.
    #[arg(long)]
    pub to: Option<NaiveDate>,
}

/// Recompute every day of the requested range, in order.
pub fn run_recompute(args: &RecomputeArgs, db: &Database) -> Result<()> {
    let to = args.to.unwrap_or(args.from);
    ensure!(
        args.from <= to,
        "range end {} precedes range start {}",
        to,
        args.from
    );
    db.recompute_range(args.from, to)
        .with_context(|| format!("recomputing {} through {}", args.from, to))?;
    println!("Recomputed {} through {}", args.from, to);
    Ok(())
}
