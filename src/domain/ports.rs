use crate::utils::error::Result;
use async_trait::async_trait;

pub trait ConfigProvider: Send + Sync {
    fn listing_template(&self) -> &str;
    fn term_code(&self) -> Option<&str>;
    fn timeout_secs(&self) -> u64;
    fn concurrent_requests(&self) -> usize;
}

/// Source of raw listing pages. One call is one request, never retried.
#[async_trait]
pub trait PageSource: Send + Sync {
    async fn get_page(&self, url: &str) -> Result<String>;
}
