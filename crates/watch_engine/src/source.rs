use url::Url;

pub const PAGE_PLACEHOLDER: &str = "{page}";
pub const DEFAULT_LISTING_URL: &str = "https://www.bol.com/be/nl/l/games-voor-de-ps5/51867/?page={page}";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SourceError {
    #[error("listing url template has no {{page}} placeholder: {0}")]
    MissingPlaceholder(String),
    #[error("listing url is not valid: {0}")]
    InvalidUrl(String),
}

/// Paginated listing addressed by a URL template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingSource {
    url_template: String,
}

impl ListingSource {
    pub fn new(url_template: impl Into<String>) -> Result<Self, SourceError> {
        let url_template = url_template.into();
        if !url_template.contains(PAGE_PLACEHOLDER) {
            return Err(SourceError::MissingPlaceholder(url_template));
        }
        let source = Self { url_template };
        Url::parse(&source.page_url(1)).map_err(|err| SourceError::InvalidUrl(err.to_string()))?;
        Ok(source)
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn page_url(&self, page: u32) -> String {
        self.url_template.replace(PAGE_PLACEHOLDER, &page.to_string())
    }

    /// URLs for pages `2..=page_count`; page 1 is fetched on its own first.
    pub fn remaining_page_urls(&self, page_count: u32) -> Vec<String> {
        (2..=page_count).map(|page| self.page_url(page)).collect()
    }
}

impl Default for ListingSource {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_LISTING_URL.to_string(),
        }
    }
}
