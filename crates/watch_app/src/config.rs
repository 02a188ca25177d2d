//! Application configuration, read from a RON file.
//!
//! Every field has a default, so the file only needs the values that differ.
//! Command-line flags are applied on top of whatever the file provides.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use watch_core::DiffPolicy;
use watch_engine::{
    FetchSettings, ListingMarkers, ListingSource, RelaySettings, SnapshotPaths, WatchConfig,
    DEFAULT_CONCURRENCY, DEFAULT_LISTING_URL, DEFAULT_PAGINATION_CLASS, DEFAULT_TITLE_CLASS,
};
use watch_logging::watch_info;

use crate::cli::Cli;

pub const CONFIG_FILENAME: &str = "listing_watch.ron";
pub const MAIL_KEY_ENV: &str = "LISTING_WATCH_MAIL_KEY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub listing_url: String,
    pub title_class: String,
    pub pagination_class: String,
    pub state_dir: PathBuf,
    pub previous_file: String,
    pub seen_file: String,
    pub request_timeout_secs: u64,
    pub concurrency: usize,
    /// Seen-ever suppression of reappearing titles.
    pub suppress_seen: bool,
    pub mail: Option<MailConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        let paths = SnapshotPaths::default();
        Self {
            listing_url: DEFAULT_LISTING_URL.to_string(),
            title_class: DEFAULT_TITLE_CLASS.to_string(),
            pagination_class: DEFAULT_PAGINATION_CLASS.to_string(),
            state_dir: paths.dir,
            previous_file: paths.previous_file,
            seen_file: paths.seen_file,
            request_timeout_secs: FetchSettings::default().request_timeout.as_secs(),
            concurrency: DEFAULT_CONCURRENCY,
            suppress_seen: DiffPolicy::default().suppress_seen,
            mail: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailConfig {
    pub endpoint: String,
    #[serde(default = "default_mail_username")]
    pub username: String,
    /// Falls back to the `LISTING_WATCH_MAIL_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,
    pub from: String,
    pub to: Vec<String>,
}

fn default_mail_username() -> String {
    "api".to_string()
}

impl AppConfig {
    /// Reads `path`, or `./listing_watch.ron` when no path is given.
    ///
    /// An explicitly named file must exist; the default one is optional.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match path {
            Some(path) => (path.to_path_buf(), true),
            None => (PathBuf::from(CONFIG_FILENAME), false),
        };

        let content = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(err) => {
                return Err(err).with_context(|| format!("reading config {}", path.display()))
            }
        };

        let config = ron::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        watch_info!("Loaded config from {:?}", path);
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(url) = &cli.url {
            self.listing_url = url.clone();
        }
        if let Some(dir) = &cli.state_dir {
            self.state_dir = dir.clone();
        }
        if cli.announce_reappeared {
            self.suppress_seen = false;
        }
    }

    pub fn to_watch_config(&self) -> anyhow::Result<WatchConfig> {
        let source = ListingSource::new(self.listing_url.clone())?;
        Ok(WatchConfig {
            source,
            markers: ListingMarkers {
                title_class: self.title_class.clone(),
                pagination_class: self.pagination_class.clone(),
            },
            fetch: FetchSettings {
                request_timeout: Duration::from_secs(self.request_timeout_secs),
                ..FetchSettings::default()
            },
            snapshot: SnapshotPaths {
                dir: self.state_dir.clone(),
                previous_file: self.previous_file.clone(),
                seen_file: self.seen_file.clone(),
            },
            policy: DiffPolicy {
                suppress_seen: self.suppress_seen,
            },
            concurrency: self.concurrency,
        })
    }

    /// Relay settings for the notifier; `env_key` is the value of
    /// `LISTING_WATCH_MAIL_KEY`, used when the file has no key.
    pub fn relay_settings(&self, env_key: Option<String>) -> anyhow::Result<RelaySettings> {
        let Some(mail) = &self.mail else {
            bail!("email requested but the config has no `mail` section");
        };
        let api_key = mail
            .api_key
            .clone()
            .or(env_key)
            .with_context(|| format!("no mail api_key in config and {MAIL_KEY_ENV} is unset"))?;
        Ok(RelaySettings {
            endpoint: mail.endpoint.clone(),
            username: mail.username.clone(),
            api_key,
            from: mail.from.clone(),
            to: mail.to.clone(),
            timeout: Duration::from_secs(self.request_timeout_secs),
        })
    }
}
