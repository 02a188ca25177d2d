use std::time::Duration;

use futures_util::{stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use watch_logging::watch_debug;

use crate::{FetchedPage, PageError};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// Upper bound for one page; a hung request fails after this.
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
    /// Media types accepted as listing pages. A response without a
    /// content type is let through.
    pub html_types: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(60),
            redirect_limit: 5,
            max_bytes: 5 * 1024 * 1024,
            html_types: vec!["text/html".into(), "application/xhtml+xml".into()],
            user_agent: concat!("listing-watch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchSettings {
    fn accepts(&self, content_type: &str) -> bool {
        let media_type = content_type.split(';').next().unwrap_or_default().trim();
        self.html_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(media_type))
    }
}

#[async_trait::async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, PageError>;
}

/// HTTP fetcher sharing one connection pool across every page of a pass.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, PageError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .user_agent(settings.user_agent.as_str())
            .redirect(reqwest::redirect::Policy::limited(settings.redirect_limit))
            .build()?;
        Ok(Self { client, settings })
    }
}

#[async_trait::async_trait]
impl Fetcher for ReqwestFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedPage, PageError> {
        let parsed =
            reqwest::Url::parse(url).map_err(|err| PageError::InvalidUrl(err.to_string()))?;
        let response = self.client.get(parsed).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        if let Some(content_type) = &content_type {
            if !self.settings.accepts(content_type) {
                return Err(PageError::ContentType(content_type.clone()));
            }
        }

        let final_url = response.url().to_string();
        let body = read_capped(response, self.settings.max_bytes).await?;
        watch_debug!("{} bytes from {}", body.len(), final_url);

        Ok(FetchedPage {
            url: final_url,
            content_type,
            body,
        })
    }
}

async fn read_capped(response: reqwest::Response, limit: u64) -> Result<Vec<u8>, PageError> {
    if response.content_length().is_some_and(|len| len > limit) {
        return Err(PageError::TooLarge { limit });
    }
    let mut body = Vec::new();
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        body.extend_from_slice(&chunk?);
        if body.len() as u64 > limit {
            return Err(PageError::TooLarge { limit });
        }
    }
    Ok(body)
}

/// Fetch every URL with at most `concurrency` requests in flight.
///
/// Results come back in input order; a failed URL only affects its own entry.
pub async fn fetch_all(
    fetcher: &dyn Fetcher,
    urls: &[String],
    concurrency: usize,
) -> Vec<(String, Result<FetchedPage, PageError>)> {
    stream::iter(urls.iter().cloned())
        .map(|url| async move {
            let result = fetcher.fetch(&url).await;
            (url, result)
        })
        .buffered(concurrency.max(1))
        .collect()
        .await
}

impl From<reqwest::Error> for PageError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            PageError::Status(status.as_u16())
        } else if err.is_timeout() {
            PageError::Timeout
        } else if err.is_redirect() {
            PageError::TooManyRedirects
        } else {
            PageError::Network(err.to_string())
        }
    }
}
