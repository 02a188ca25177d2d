use std::path::PathBuf;

use clap::Parser;

/// Watch a paginated shop listing and report titles that appear or disappear.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "listing-watch", version)]
pub struct Cli {
    /// Send an email when new titles show up
    #[arg(long)]
    pub email: bool,

    /// Also email when titles disappear (requires --email)
    #[arg(long, requires = "email")]
    pub notify_removed: bool,

    /// Repeat the check every MINUTES instead of running once
    #[arg(long, value_name = "MINUTES", value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Send a one-off test email and exit
    #[arg(long)]
    pub test_email: bool,

    /// RON config file [default: ./listing_watch.ron if present]
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory holding the snapshot files
    #[arg(long, value_name = "DIR")]
    pub state_dir: Option<PathBuf>,

    /// Listing URL template containing a {page} placeholder
    #[arg(long, value_name = "TEMPLATE")]
    pub url: Option<String>,

    /// Report titles that come back after having disappeared
    #[arg(long)]
    pub announce_reappeared: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write the log to <state_dir>/listing_watch.log
    #[arg(long)]
    pub log_file: bool,
}
