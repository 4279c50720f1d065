pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};

pub use crate::config::toml_config::TomlConfig;
pub use crate::core::{
    batch::check_all,
    fetcher::{fetch_listing, HttpPageSource, ListingPage},
    lookup::{exists, find_status, ROW_STRIDE, STATUS_OFFSET},
    tracker::CourseTracker,
    url_builder::UrlBuilder,
};
pub use crate::domain::model::{CourseQuery, Crn, Status, StatusReport};
pub use crate::utils::error::{ErrorCategory, FetchFailure, Result, TrackerError};
