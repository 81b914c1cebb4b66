//! # actdb-cli — Act Database Command-Line Interface
//!
//! ## Subcommands
//!
//! - `add-act` — File parsed raw acts into the intake directory
//! - `recompute` — Recompute day states over a date range
//! - `list` — List the acts in force on a date
//! - `output` — Emit one act's tree as JSON, as of a date
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from business logic.
//! - Handler functions delegate to `actdb-db` — no database logic here.

pub mod add_act;
pub mod list;
pub mod output;
pub mod recompute;
