// Standard library
use std::env;
use std::process;
use std::sync::OnceLock;

// External crates
use clap::Parser;
use tracing::{debug, info_span};
use uuid::Uuid;

// Internal imports
use mlws_core::ws_error;

// Local modules
mod cli;
mod commands;
mod error;

use cli::Args;
use commands::execute_command;

/// Request ID for this execution, attached to every log line of the run
static REQUEST_ID: OnceLock<String> = OnceLock::new();

fn get_request_id() -> &'static str {
    REQUEST_ID.get_or_init(|| Uuid::new_v4().to_string())
}

fn main() {
    let args = Args::parse();

    // --debug only raises the level when MLWS_LOG_LEVEL does not pin one.
    if args.debug && env::var_os("MLWS_LOG_LEVEL").is_none() {
        env::set_var("MLWS_LOG_LEVEL", "debug");
    }
    let log_guard = mlws_logging::init_subscriber();

    let span = info_span!(
        "request",
        request_id = get_request_id(),
        command = args.command.name()
    );
    let enter = span.enter();
    debug!(debug = args.debug, config = ?args.config, "Starting mlws");

    let code = match execute_command(args) {
        Ok(()) => 0,
        Err(e) => {
            debug!(error = ?e, "Command failed");
            ws_error!("{}", e.user_message());
            e.exit_code()
        }
    };

    // process::exit skips destructors; flush the log writer first.
    drop(enter);
    drop(log_guard);
    if code != 0 {
        process::exit(code);
    }
}
