use crate::core::fetcher::{fetch_listing, HttpPageSource};
use crate::core::lookup;
use crate::core::url_builder::UrlBuilder;
use crate::core::{ConfigProvider, PageSource};
use crate::domain::model::{Crn, Status};
use crate::utils::error::Result;
use std::time::Duration;

/// Caller-facing lookups. Each call builds its own URL, performs one fetch
/// and scans the page; nothing is shared between calls but the template.
pub struct CourseTracker<S: PageSource> {
    urls: UrlBuilder,
    source: S,
}

impl<S: PageSource> CourseTracker<S> {
    pub fn new(urls: UrlBuilder, source: S) -> Self {
        Self { urls, source }
    }

    pub fn url_builder(&self) -> &UrlBuilder {
        &self.urls
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub async fn check_status(&self, crn: Crn, subject: &str) -> Result<Status> {
        let url = self.urls.build_listing_url(subject);
        let page = fetch_listing(&self.source, &url).await?;
        let status = lookup::find_status(&page, crn)?;
        tracing::debug!("CRN {} in {} is {}", crn, subject, status);
        Ok(status)
    }

    /// `false` only when the page was fetched but the CRN is absent.
    pub async fn check_validity(&self, crn: Crn, subject: &str) -> Result<bool> {
        let url = self.urls.build_listing_url(subject);
        let page = fetch_listing(&self.source, &url).await?;
        let found = lookup::exists(&page, crn)?;
        tracing::debug!("CRN {} in {} exists: {}", crn, subject, found);
        Ok(found)
    }
}

impl CourseTracker<HttpPageSource> {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut urls = UrlBuilder::new(config.listing_template())?;
        if let Some(term) = config.term_code() {
            urls = urls.with_term(term)?;
        }
        let source = HttpPageSource::new(Duration::from_secs(config.timeout_secs()))?;

        tracing::debug!(
            "Tracker configured with template {} and {}s timeout",
            urls.template(),
            config.timeout_secs()
        );
        Ok(Self::new(urls, source))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::lookup::fixtures::listing_html;
    use crate::utils::error::{FetchFailure, TrackerError};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    pub(crate) const TEMPLATE: &str = "http://listing.test/search?term_code=202310&term_subj=&status=0";

    /// 以網址對應固定頁面內容的假來源，並記錄請求次數
    #[derive(Clone, Default)]
    pub(crate) struct MockSource {
        pages: Arc<HashMap<String, String>>,
        pub(crate) requests: Arc<AtomicUsize>,
    }

    impl MockSource {
        pub(crate) fn with_subject(mut self, subject: &str, html: String) -> Self {
            let url = UrlBuilder::new(TEMPLATE).unwrap().build_listing_url(subject);
            Arc::make_mut(&mut self.pages).insert(url, html);
            self
        }
    }

    #[async_trait]
    impl PageSource for MockSource {
        async fn get_page(&self, url: &str) -> Result<String> {
            self.requests.fetch_add(1, Ordering::SeqCst);
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| TrackerError::fetch(url, FetchFailure::HttpStatus(404)))
        }
    }

    pub(crate) fn tracker() -> CourseTracker<MockSource> {
        let source = MockSource::default()
            .with_subject("CSCI", listing_html(&[("12345", "OPEN"), ("67890", "CLOSED")]))
            .with_subject("BIOL", listing_html(&[("11111", "CLOSED")]));
        CourseTracker::new(UrlBuilder::new(TEMPLATE).unwrap(), source)
    }

    fn crn(value: u32) -> Crn {
        Crn::new(value).unwrap()
    }

    #[tokio::test]
    async fn test_check_status() {
        let tracker = tracker();
        assert_eq!(tracker.check_status(crn(12345), "CSCI").await.unwrap(), Status::Open);
        assert_eq!(tracker.check_status(crn(67890), "CSCI").await.unwrap(), Status::Closed);
        assert_eq!(tracker.check_status(crn(11111), "BIOL").await.unwrap(), Status::Closed);
    }

    #[tokio::test]
    async fn test_check_status_not_found_propagates() {
        let tracker = tracker();
        let err = tracker.check_status(crn(99999), "CSCI").await.unwrap_err();
        assert!(err.is_not_found());

        // 同一 CRN 在別的科目列表中不存在
        let err = tracker.check_status(crn(12345), "BIOL").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_check_validity() {
        let tracker = tracker();
        assert!(tracker.check_validity(crn(12345), "CSCI").await.unwrap());
        assert!(!tracker.check_validity(crn(99999), "CSCI").await.unwrap());
    }

    #[tokio::test]
    async fn test_check_validity_propagates_fetch_error() {
        let tracker = tracker();
        let err = tracker.check_validity(crn(12345), "NOPE").await.unwrap_err();
        assert!(err.is_fetch_error());
    }

    #[tokio::test]
    async fn test_error_page_fails_both_operations() {
        let error_page = r#"<html><body><h1 class="bannerTitle"><a>Error</a></h1>
            <div id="results"><table><tbody><tr><td>12345</td></tr></tbody></table></div>
            </body></html>"#;
        let source = MockSource::default().with_subject("XXXX", error_page.to_string());
        let tracker = CourseTracker::new(UrlBuilder::new(TEMPLATE).unwrap(), source);

        assert!(tracker.check_status(crn(12345), "XXXX").await.unwrap_err().is_fetch_error());
        assert!(tracker.check_validity(crn(12345), "XXXX").await.unwrap_err().is_fetch_error());
    }

    #[tokio::test]
    async fn test_each_call_fetches_once() {
        let tracker = tracker();
        tracker.check_status(crn(12345), "CSCI").await.unwrap();
        tracker.check_validity(crn(12345), "CSCI").await.unwrap();
        assert_eq!(tracker.source.requests.load(Ordering::SeqCst), 2);
    }
}
