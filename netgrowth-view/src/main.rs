//! Application entry point for the network growth viewer.
//!
//! This binary parses the initial run parameters, installs logging, and
//! delegates all interactive logic and rendering to [`Viewer`] from the
//! `viewer` module.

mod cli;
mod layout;
mod logging;
mod timeline;
mod viewer;

use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use cli::Cli;
use logging::init_logging;
use viewer::Viewer;

/// Starts the native eframe application.
///
/// The window is titled `"Network Growth"`. Invalid flags, logging setup
/// failures and window creation errors are reported and turn into a
/// failing exit code.
fn main() -> ExitCode {
    let log_format = match init_logging() {
        Ok(format) => format,
        Err(err) => {
            eprintln!("netgrowth: {err}");
            return ExitCode::FAILURE;
        }
    };

    let cfg = match Cli::parse().into_config() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!(error = %err, code = err.code(), "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let viewer = match Viewer::new(cfg) {
        Ok(viewer) => viewer,
        Err(err) => {
            error!(error = %err, code = err.code(), "failed to start growth run");
            return ExitCode::FAILURE;
        }
    };
    info!(log_format = %log_format, "opening viewer");

    let options = eframe::NativeOptions::default();
    match eframe::run_native(
        "Network Growth",
        options,
        Box::new(|_cc| Ok(Box::new(viewer))),
    ) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "viewer exited with an error");
            ExitCode::FAILURE
        }
    }
}
