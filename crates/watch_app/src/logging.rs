//! Logger setup for the listing-watch binary.
//!
//! Always logs to the terminal; with `--log-file` also appends to
//! `<state_dir>/listing_watch.log`.

use std::fs::{File, OpenOptions};
use std::path::Path;

use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};
use watch_engine::ensure_state_dir;

pub const LOG_FILENAME: &str = "listing_watch.log";

/// Destination for log output.
pub enum LogDestination {
    Terminal,
    /// Terminal plus the log file in the given state directory.
    Both,
}

pub fn initialize(verbose: bool, destination: LogDestination, state_dir: &Path) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let config = build_config();

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        config.clone(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    if let LogDestination::Both = destination {
        if let Some(file_logger) = create_file_logger(level, config, state_dir) {
            loggers.push(file_logger);
        }
    }

    let _ = CombinedLogger::init(loggers);
}

fn build_config() -> Config {
    // Quiet the HTTP stack; its info output drowns the pass log.
    ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .add_filter_ignore_str("reqwest")
        .add_filter_ignore_str("hyper")
        .build()
}

fn create_file_logger(
    level: LevelFilter,
    config: Config,
    state_dir: &Path,
) -> Option<Box<WriteLogger<File>>> {
    let log_path = state_dir.join(LOG_FILENAME);
    let opened = ensure_state_dir(state_dir)
        .map_err(|err| err.to_string())
        .and_then(|()| {
            OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_path)
                .map_err(|err| err.to_string())
        });
    match opened {
        Ok(file) => Some(WriteLogger::new(level, config, file)),
        Err(err) => {
            eprintln!("Warning: Could not open log file at {:?}: {}", log_path, err);
            None
        }
    }
}
