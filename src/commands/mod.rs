//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `records.rs` — list/show/criteria/create/update/delete.
//! - `files.rs` — health, file, questions and config trees.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod files;
pub mod records;

pub use files::{
    handle_config_commands, handle_file_commands, handle_health_command, handle_question_commands,
};
pub use records::handle_record_commands;
