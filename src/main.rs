mod cli;
mod commands;
mod domain;
mod services;

pub use clap::Parser;
pub use cli::*;
pub use commands::*;
pub use domain::models::*;
pub use domain::questions::*;
pub use services::api::*;
pub use services::config::*;
pub use services::criteria_view::*;
pub use services::detail::*;
pub use services::display::*;
pub use services::output::*;
pub use services::records::*;
pub use services::storage::*;
pub use services::upload::*;

use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Stable code for the first typed error found in the chain.
fn error_code(e: &anyhow::Error) -> &'static str {
    for cause in e.chain() {
        if let Some(api) = cause.downcast_ref::<ApiError>() {
            return api.code();
        }
        if let Some(upload) = cause.downcast_ref::<UploadError>() {
            return upload.code();
        }
        if cause.downcast_ref::<InputError>().is_some() {
            return "INVALID_INPUT";
        }
    }
    "ERROR"
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let settings = load_settings(cli.api_url.as_deref())?;
    if handle_config_commands(cli, &settings)? {
        return Ok(());
    }

    let api = ApiClient::new(&settings.base_url)?;
    if handle_health_command(cli, &api)?
        || handle_file_commands(cli, &api)?
        || handle_question_commands(cli, &api)?
    {
        return Ok(());
    }

    let mut store = RecordStore::new();
    handle_record_commands(cli, &settings, &api, &mut store)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let code = error_code(&e);
            tracing::debug!(code, "command failed");
            print_error(cli.json, code, &format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}
