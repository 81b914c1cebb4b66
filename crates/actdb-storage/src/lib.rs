//! # actdb-storage — Content-Addressed Persistence
//!
//! Everything durable lives under one storage root:
//!
//! - `articles/`, `acts/`, `reference_lists/` — content-addressed gzip
//!   blobs keyed by MD5 of their canonical JSON ([`ObjectStore`] /
//!   [`TypedStore`]). Acts store their articles by handle, so saving a
//!   state where one article changed writes exactly two blobs: the new
//!   article and the new act.
//! - `states/<yyyy>/<mm>/<dd>.json.gz` — per-day snapshots, handles only.
//! - `raw_acts/<yyyy>/<mm>/<dd>/` — the intake directory for parsed raw
//!   acts awaiting recomputation, keyed by publication date.
//!
//! Caches are bounded LRUs owned by the [`Persistence`] instance; nothing
//! here is process-global. There is no garbage collection: blobs no day
//! state references stay on disk.

pub mod error;
pub mod handles;
pub mod object_store;
pub mod persistence;
pub mod typed;

pub use error::StorageError;
pub use handles::{
    ActHandle, ArticleHandle, ReferencePair, ReferencePairList, StoredAct, StoredActChild,
};
pub use object_store::ObjectStore;
pub use persistence::{read_raw_act_file, Persistence};
pub use typed::TypedStore;
