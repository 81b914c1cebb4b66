//! # Add-Act Subcommand
//!
//! Files parsed raw acts into the intake directory, keyed by publication
//! date. The acts become part of the corpus once their publication day is
//! recomputed.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use actdb_db::Database;

/// Arguments for the add-act subcommand.
#[derive(Args, Debug)]
pub struct AddActArgs {
    /// The parsed act file(s) to add (.json, .json.gz, or .yaml).
    #[arg(required = true)]
    pub act_files: Vec<PathBuf>,
}

/// File each given act into the intake directory.
pub fn run_add_act(args: &AddActArgs, db: &Database) -> Result<()> {
    for act_file in &args.act_files {
        let identifier = db
            .add_act(act_file)
            .with_context(|| format!("adding {}", act_file.display()))?;
        println!("Added \"{identifier}\"");
    }
    Ok(())
}
