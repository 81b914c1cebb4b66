//! # actdb-core — Foundational Types for the Act Database
//!
//! This crate is the bedrock of the actdb workspace. It defines the
//! primitives every other crate builds on; it depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **`CanonicalBytes` newtype.** ALL content-key computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for keys, ever.
//!    Two structurally identical values always produce identical bytes, which
//!    is what makes the content-addressed store deduplicate.
//!
//! 2. **`ObjectKey::compute()` accepts only `&CanonicalBytes`.** Compile-time
//!    enforcement that every storage key went through canonicalization.
//!
//! 3. **Legal identifier ordering.** Identifiers like `"5"`, `"5/A"`, `"12"`
//!    and `"1:2"` do not sort lexicographically. `identifier_cmp` is the one
//!    comparison used for cut-point scans and range membership.
//!
//! 4. **`Reference` as the single addressing scheme.** Both "where does this
//!    amendment land" and "what does this text cite" are `Reference` values.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `actdb-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod canonical;
pub mod error;
pub mod identifier;
pub mod key;
pub mod reference;

pub use canonical::CanonicalBytes;
pub use error::CoreError;
pub use identifier::{identifier_cmp, identifier_less};
pub use key::ObjectKey;
pub use reference::{
    ComboKind, IdPart, Reference, RefLevel, StructuralKind, StructuralReference,
    SubtitleArticleCombo, TargetPosition,
};
