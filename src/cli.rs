use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const API_URL_ENV: &str = "PRIOR_AUTH_API_URL";

/// Command-line input rejected before any request is made.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid answer `{0}`, expected QUESTION_ID=ANSWER")]
    BadAnswer(String),
    #[error("nothing to update, pass --patient-name, --procedure or --status")]
    EmptyUpdate,
}

/// Parses one `--set QUESTION_ID=ANSWER` value. The answer may be empty.
pub fn parse_answer(raw: &str) -> Result<(String, String), InputError> {
    match raw.split_once('=') {
        Some((id, answer)) if !id.trim().is_empty() => {
            Ok((id.trim().to_string(), answer.to_string()))
        }
        _ => Err(InputError::BadAnswer(raw.to_string())),
    }
}

#[derive(Parser, Debug)]
#[command(name = "priorauth", version, about = "Prior authorization portal CLI")]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Backend base URL (overrides PRIOR_AUTH_API_URL and config file)"
    )]
    pub api_url: Option<String>,
    #[arg(
        long,
        global = true,
        default_value = "warn",
        help = "Log filter (trace, debug, info, warn, error)"
    )]
    pub log_level: String,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the backend is up
    Health,
    /// List prior authorizations
    List,
    /// Show one prior authorization
    Show {
        id: String,
        #[arg(long, value_enum, default_value_t = DetailTab::Criteria)]
        tab: DetailTab,
        #[arg(long, default_value_t = false, help = "Keep refreshing until criteria are extracted")]
        watch: bool,
        #[arg(long)]
        interval_secs: Option<u64>,
        #[arg(long)]
        max_polls: Option<u32>,
    },
    /// Show the authorization criteria of a record
    Criteria { id: String },
    /// Create a prior authorization from two PDFs
    Create {
        #[arg(long)]
        patient_name: String,
        #[arg(long)]
        procedure: String,
        #[arg(long)]
        auth_document: PathBuf,
        #[arg(long)]
        clinical_notes: PathBuf,
    },
    /// Update patient, procedure, or status of a record
    Update {
        id: String,
        #[arg(long)]
        patient_name: Option<String>,
        #[arg(long)]
        procedure: Option<String>,
        #[arg(long)]
        status: Option<String>,
    },
    /// Delete a prior authorization
    Delete { id: String },
    File {
        #[command(subcommand)]
        command: FileCommands,
    },
    Questions {
        #[command(subcommand)]
        command: QuestionCommands,
    },
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    Upload {
        path: PathBuf,
        #[arg(long, value_enum)]
        file_type: FileType,
    },
    Get {
        id: String,
        #[arg(long)]
        out: PathBuf,
    },
    Url {
        id: String,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum QuestionCommands {
    List {
        id: String,
    },
    Answer {
        id: String,
        #[arg(long = "set", value_name = "QUESTION_ID=ANSWER", required = true)]
        answers: Vec<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    Show,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DetailTab {
    Criteria,
    Document,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FileType {
    #[value(name = "prior_authorization")]
    PriorAuthorization,
    #[value(name = "clinical_notes")]
    ClinicalNotes,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            FileType::PriorAuthorization => "prior_authorization",
            FileType::ClinicalNotes => "clinical_notes",
        }
    }
}
