pub mod batch;
pub mod fetcher;
pub mod lookup;
pub mod tracker;
pub mod url_builder;

pub use crate::domain::model::{CourseQuery, Crn, Status, StatusReport};
pub use crate::domain::ports::{ConfigProvider, PageSource};
pub use crate::utils::error::Result;
