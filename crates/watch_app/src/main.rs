mod cli;
mod config;
mod logging;
mod runner;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use watch_core::ReportOptions;
use watch_engine::HttpRelayMailer;

use crate::cli::Cli;
use crate::config::{AppConfig, MAIL_KEY_ENV};
use crate::logging::LogDestination;
use crate::runner::Runner;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(&cli);

    let destination = if cli.log_file {
        LogDestination::Both
    } else {
        LogDestination::Terminal
    };
    logging::initialize(cli.verbose, destination, &config.state_dir);

    let mailer = if cli.email || cli.test_email {
        let settings = config.relay_settings(std::env::var(MAIL_KEY_ENV).ok())?;
        Some(HttpRelayMailer::new(settings).context("configuring mail relay")?)
    } else {
        None
    };
    let report_options = ReportOptions {
        notify_removed: cli.notify_removed,
    };
    let runner = Runner::new(config.to_watch_config()?, mailer, report_options)?;

    if cli.test_email {
        return runner.send_test_email();
    }
    runner.run(cli.interval.map(|minutes| Duration::from_secs(minutes.saturating_mul(60))))
}
