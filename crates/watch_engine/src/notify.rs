use std::time::Duration;

use watch_core::Report;
use watch_logging::watch_info;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("mail relay request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("mail relay rejected the message ({status}): {body}")]
    Rejected { status: u16, body: String },
    #[error("mail relay is not configured: {0}")]
    NotConfigured(String),
}

#[async_trait::async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, report: &Report) -> Result<(), NotifyError>;
}

/// Connection details for an HTTP email relay that accepts a form-encoded
/// `from`/`to`/`subject`/`text` POST with basic auth (Mailgun-style API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelaySettings {
    pub endpoint: String,
    pub username: String,
    pub api_key: String,
    pub from: String,
    pub to: Vec<String>,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpRelayMailer {
    settings: RelaySettings,
    client: reqwest::Client,
}

impl HttpRelayMailer {
    pub fn new(settings: RelaySettings) -> Result<Self, NotifyError> {
        if settings.to.is_empty() {
            return Err(NotifyError::NotConfigured("no recipients".into()));
        }
        if settings.api_key.is_empty() {
            return Err(NotifyError::NotConfigured("missing api key".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()?;
        Ok(Self { settings, client })
    }
}

#[async_trait::async_trait]
impl Mailer for HttpRelayMailer {
    async fn send(&self, report: &Report) -> Result<(), NotifyError> {
        let to = self.settings.to.join(",");
        let form = [
            ("from", self.settings.from.as_str()),
            ("to", to.as_str()),
            ("subject", report.subject.as_str()),
            ("text", report.body.as_str()),
        ];

        let response = self
            .client
            .post(self.settings.endpoint.as_str())
            .basic_auth(&self.settings.username, Some(&self.settings.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        watch_info!("Sent \"{}\" to {}", report.subject, to);
        Ok(())
    }
}
