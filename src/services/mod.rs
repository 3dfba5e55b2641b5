//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `api.rs` — REST client and the `PriorAuthApi` seam.
//! - `upload.rs` — local PDF validation and the two-upload create flow.
//! - `records.rs` — record list state (refresh/add/remove).
//! - `detail.rs` — detail view state machine with stale-fetch gating.
//! - `criteria_view.rs` — criteria tree to display tree, stats line.
//! - `display.rs` — list rows, dates, detail panes.
//! - `config.rs` — config file + env + flag layering.
//! - `storage.rs` — audit log of mutating commands.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod api;
pub mod config;
pub mod criteria_view;
pub mod detail;
pub mod display;
pub mod output;
pub mod records;
pub mod storage;
pub mod upload;
