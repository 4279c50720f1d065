use crate::core::PageSource;
use crate::utils::error::{FetchFailure, Result, TrackerError};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const BANNER_LINK_SELECTOR: &str = "h1.bannerTitle a";
const ERROR_BANNER_TEXT: &str = "Error";

pub(crate) fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("Invalid static CSS selector")
}

pub(crate) fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// HTTP-backed page source; every request is bounded by the client timeout.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TrackerError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl Default for HttpPageSource {
    fn default() -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn get_page(&self, url: &str) -> Result<String> {
        tracing::debug!("Requesting listing page: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TrackerError::fetch(url, e))?;

        let status = response.status();
        tracing::debug!("Listing response status: {}", status);
        if !status.is_success() {
            return Err(TrackerError::fetch(url, FetchFailure::HttpStatus(status.as_u16())));
        }

        response.text().await.map_err(|e| TrackerError::fetch(url, e))
    }
}

/// A parsed listing page. Lives for a single lookup and is never cached.
#[derive(Debug)]
pub struct ListingPage {
    url: String,
    document: Html,
}

impl ListingPage {
    /// 解析 HTML 並排除站台的通用錯誤頁
    pub fn parse(url: &str, body: &str) -> Result<Self> {
        let page = Self {
            url: url.to_string(),
            document: Html::parse_document(body),
        };

        if page.is_error_page() {
            tracing::warn!("Listing {} returned the site error page", url);
            return Err(TrackerError::fetch(url, FetchFailure::ErrorPage));
        }

        Ok(page)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// A missing banner is not treated as an error page.
    pub fn is_error_page(&self) -> bool {
        let banner = selector(BANNER_LINK_SELECTOR);
        self.document
            .select(&banner)
            .next()
            .map(|link| element_text(link) == ERROR_BANNER_TEXT)
            .unwrap_or(false)
    }

    pub fn find_first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }
}

pub async fn fetch_listing<S>(source: &S, url: &str) -> Result<ListingPage>
where
    S: PageSource + ?Sized,
{
    let body = source.get_page(url).await?;
    tracing::debug!("Fetched {} bytes from {}", body.len(), url);
    ListingPage::parse(url, &body)
}
