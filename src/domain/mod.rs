//! Shared data model layer.
//!
//! ## Files
//! - `models.rs` — API records, request bodies, output envelopes.
//! - `questions.rs` — authorization criteria tree, status resolver, stats.
//!
//! ## Rule of thumb
//! Domain types are data-only: no filesystem/network side effects.
//!
//! ## Compatibility note
//! These structs shape the `--json` output. Keep `docs/contracts/*` in sync.

pub mod models;
pub mod questions;
