use std::thread;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use watch_core::{Report, ReportOptions};
use watch_engine::{
    run_pass, HttpRelayMailer, LogProgressSink, Mailer, PassSummary, ReqwestFetcher, WatchConfig,
};
use watch_logging::{set_pass, watch_error, watch_info, watch_warn};

/// Drives scrape passes: once, or forever on a fixed interval.
pub struct Runner {
    config: WatchConfig,
    fetcher: ReqwestFetcher,
    mailer: Option<HttpRelayMailer>,
    report_options: ReportOptions,
    runtime: tokio::runtime::Runtime,
}

impl Runner {
    pub fn new(
        config: WatchConfig,
        mailer: Option<HttpRelayMailer>,
        report_options: ReportOptions,
    ) -> anyhow::Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .context("starting tokio runtime")?;
        let fetcher =
            ReqwestFetcher::new(config.fetch.clone()).context("building http client")?;
        Ok(Self {
            fetcher,
            config,
            mailer,
            report_options,
            runtime,
        })
    }

    /// Runs one pass, or keeps going every `interval` when given.
    ///
    /// In loop mode a failed pass is logged and the next one is waited for;
    /// a single run returns the error.
    pub fn run(&self, interval: Option<Duration>) -> anyhow::Result<()> {
        let Some(interval) = interval else {
            set_pass(1);
            return self.run_once();
        };

        for pass in 1.. {
            set_pass(pass);
            self.tick();

            let next = chrono::Duration::from_std(interval)
                .ok()
                .and_then(|step| Local::now().checked_add_signed(step));
            if let Some(next) = next {
                watch_info!("Next check at {}", next.format("%Y-%m-%d %H:%M"));
            }
            thread::sleep(interval);
        }
        Ok(())
    }

    /// One loop iteration. A failed pass is logged, never propagated;
    /// returns whether the pass succeeded.
    fn tick(&self) -> bool {
        match self.run_once() {
            Ok(()) => true,
            Err(err) => {
                watch_error!("Pass failed: {:#}", err);
                false
            }
        }
    }

    pub fn send_test_email(&self) -> anyhow::Result<()> {
        let mailer = self
            .mailer
            .as_ref()
            .context("test email requested but email is not configured")?;
        self.runtime
            .block_on(mailer.send(&Report::test_message()))
            .context("sending test email")
    }

    fn run_once(&self) -> anyhow::Result<()> {
        self.runtime.block_on(self.pass_and_notify())
    }

    async fn pass_and_notify(&self) -> anyhow::Result<()> {
        let summary = run_pass(&self.config, &self.fetcher, &LogProgressSink).await?;
        print_summary(&summary);

        let Some(mailer) = &self.mailer else {
            return Ok(());
        };
        if let Some(report) = Report::from_outcome(&summary.outcome, self.report_options) {
            if let Err(err) = mailer.send(&report).await {
                // State is already saved, so this change will not be reported again.
                watch_warn!("Unsent notification \"{}\":\n{}", report.subject, report.body);
                return Err(err).context("sending change notification");
            }
        }
        Ok(())
    }
}

fn print_summary(summary: &PassSummary) {
    if !summary.failed_pages.is_empty() {
        watch_warn!(
            "{} of {} pages could not be read this pass",
            summary.failed_pages.len(),
            summary.page_count
        );
    }

    let everything = ReportOptions {
        notify_removed: true,
    };
    match Report::from_outcome(&summary.outcome, everything) {
        Some(report) => println!("{}", report.body),
        None => watch_info!(
            "No changes across {} titles on {} pages",
            summary.collected,
            summary.page_count
        ),
    }
}
