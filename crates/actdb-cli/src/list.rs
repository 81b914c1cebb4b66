//! # List Subcommand
//!
//! Lists the acts in force on a given day. Acts whose enforcement has not
//! yet begun (or which are fully repealed) are treated as absent.

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Args;

use actdb_db::Database;

/// Arguments for the list subcommand.
#[derive(Args, Debug)]
pub struct ListArgs {
    /// The day to query (YYYY-MM-DD).
    #[arg(short, long)]
    pub date: NaiveDate,
}

/// Print one line per act in force on the requested day.
pub fn run_list(args: &ListArgs, db: &Database) -> Result<()> {
    let Some(set) = db.act_set_at(args.date)? else {
        bail!("no state has been computed for {}", args.date);
    };
    for act in set.acts_in_force(args.date, db.persistence())? {
        println!("{}\t{}", act.identifier, act.subject);
    }
    Ok(())
}
