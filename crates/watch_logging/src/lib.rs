#![deny(missing_docs)]
//! Shared logging utilities for the listing watcher workspace.
//!
//! This crate provides the `watch_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. Every record emitted
//! through the macros is prefixed with the number of the scrape pass that is
//! currently running, so interleaved loop output stays readable.

use std::sync::atomic::{AtomicU64, Ordering};

#[doc(hidden)]
pub use log;

/// Number of the scrape pass currently in progress (0 before the first pass).
static CURRENT_PASS: AtomicU64 = AtomicU64::new(0);

/// Records the pass number used to prefix subsequent log records.
/// The run loop calls this once before each pass.
pub fn set_pass(pass: u64) {
    CURRENT_PASS.store(pass, Ordering::Relaxed);
}

/// Returns the pass number last set with [`set_pass`].
pub fn current_pass() -> u64 {
    CURRENT_PASS.load(Ordering::Relaxed)
}

/// Logs a trace-level message tagged with the current pass.
#[macro_export]
macro_rules! watch_trace {
    ($($arg:tt)*) => {{
        $crate::log::trace!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs a debug-level message tagged with the current pass.
#[macro_export]
macro_rules! watch_debug {
    ($($arg:tt)*) => {{
        $crate::log::debug!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs an info-level message tagged with the current pass.
#[macro_export]
macro_rules! watch_info {
    ($($arg:tt)*) => {{
        $crate::log::info!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs a warn-level message tagged with the current pass.
#[macro_export]
macro_rules! watch_warn {
    ($($arg:tt)*) => {{
        $crate::log::warn!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Logs an error-level message tagged with the current pass.
#[macro_export]
macro_rules! watch_error {
    ($($arg:tt)*) => {{
        $crate::log::error!("[pass {}] {}", $crate::current_pass(), format_args!($($arg)*));
    }};
}

/// Initializes a simple terminal logger for use in tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // Another test in the same binary may have won the race.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
