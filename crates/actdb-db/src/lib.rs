//! # actdb-db — The Database Layer
//!
//! Ties the lower layers together into a versioned corpus:
//!
//! - [`ActSet`] — one day's acts, as working trees or stored handles,
//!   plus that day's reverse reference index.
//! - [`indexer`] — rebuilds the reference index after each amendment
//!   pass and answers incoming-reference queries.
//! - [`Database`] — the orchestrator: files raw acts into the intake,
//!   recomputes day states sequentially, and serves point-in-time
//!   queries through a bounded per-day cache.
//!
//! Day states are immutable once computed; changing history means
//! recomputing forward from the changed day.

pub mod act_set;
pub mod database;
pub mod error;
pub mod indexer;

#[cfg(test)]
pub(crate) mod testing;

pub use act_set::{ActSet, DaySnapshot};
pub use database::Database;
pub use error::DbError;
pub use indexer::{incoming_references, reindex, ReindexStats};
