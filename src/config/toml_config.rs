use crate::core::fetcher::DEFAULT_TIMEOUT_SECS;
use crate::core::url_builder::DEFAULT_LISTING_TEMPLATE;
use crate::core::ConfigProvider;
use crate::domain::model::{CourseQuery, Crn};
use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONCURRENT_REQUESTS: usize = 4;
pub const MAX_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub listing: ListingConfig,
    pub batch: Option<BatchConfig>,
    #[serde(default)]
    pub courses: Vec<CourseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingConfig {
    #[serde(default = "default_template")]
    pub template: String,
    pub term_code: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            term_code: None,
            timeout_seconds: default_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    pub concurrent_requests: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEntry {
    pub crn: u32,
    pub subject: String,
}

fn default_template() -> String {
    DEFAULT_LISTING_TEMPLATE.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TrackerError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TrackerError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TERM_CODE})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TrackerError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_listing_template("listing.template", &self.listing.template)?;

        if let Some(term) = &self.listing.term_code {
            validation::validate_non_empty_string("listing.term_code", term)?;
        }

        validation::validate_range(
            "listing.timeout_seconds",
            self.listing.timeout_seconds,
            1,
            MAX_TIMEOUT_SECS,
        )?;

        validation::validate_positive_number(
            "batch.concurrent_requests",
            self.concurrent_requests(),
            1,
        )?;

        for course in &self.courses {
            validation::validate_non_empty_string("courses.subject", &course.subject)?;
            Crn::new(course.crn)?;
        }

        Ok(())
    }

    pub fn concurrent_requests(&self) -> usize {
        self.batch
            .as_ref()
            .and_then(|b| b.concurrent_requests)
            .unwrap_or(DEFAULT_CONCURRENT_REQUESTS)
    }

    /// 設定檔中列出的課程清單
    pub fn queries(&self) -> Result<Vec<CourseQuery>> {
        self.courses
            .iter()
            .map(|c| Ok(CourseQuery::new(Crn::new(c.crn)?, c.subject.trim())))
            .collect()
    }
}

impl ConfigProvider for TomlConfig {
    fn listing_template(&self) -> &str {
        &self.listing.template
    }

    fn term_code(&self) -> Option<&str> {
        self.listing.term_code.as_deref()
    }

    fn timeout_secs(&self) -> u64 {
        self.listing.timeout_seconds
    }

    fn concurrent_requests(&self) -> usize {
        TomlConfig::concurrent_requests(self)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[listing]
template = "https://courses.example.edu/search?term_code=202310&term_subj=&status=0"
term_code = "202420"
timeout_seconds = 5

[batch]
concurrent_requests = 2

[[courses]]
crn = 12345
subject = "CSCI"

[[courses]]
crn = 67890
subject = "BIOL"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.term_code(), Some("202420"));
        assert_eq!(config.timeout_secs(), 5);
        assert_eq!(config.concurrent_requests(), 2);

        let queries = config.queries().unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].subject, "BIOL");
        assert_eq!(queries[1].crn.get(), 67890);
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();

        assert_eq!(config.listing_template(), DEFAULT_LISTING_TEMPLATE);
        assert_eq!(config.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.concurrent_requests(), DEFAULT_CONCURRENT_REQUESTS);
        assert!(config.term_code().is_none());
        assert!(config.courses.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("COURSE_TRACKER_TEST_TERM", "202510");

        let toml_content = r#"
[listing]
term_code = "${COURSE_TRACKER_TEST_TERM}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.term_code(), Some("202510"));

        std::env::remove_var("COURSE_TRACKER_TEST_TERM");
    }

    #[test]
    fn test_config_validation() {
        let bad_template = r#"
[listing]
template = "https://courses.example.edu/search?term_code=202310"
"#;
        let config = TomlConfig::from_toml_str(bad_template).unwrap();
        assert!(config.validate().is_err());

        let bad_timeout = r#"
[listing]
timeout_seconds = 0
"#;
        let config = TomlConfig::from_toml_str(bad_timeout).unwrap();
        assert!(config.validate().is_err());

        let bad_course = r#"
[[courses]]
crn = 0
subject = "CSCI"
"#;
        let config = TomlConfig::from_toml_str(bad_course).unwrap();
        assert!(config.validate().is_err());
        assert!(config.queries().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[listing\ntemplate = ").unwrap_err();
        assert!(matches!(err, TrackerError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[listing]
timeout_seconds = 15

[[courses]]
crn = 12345
subject = "CSCI"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.timeout_secs(), 15);
        assert_eq!(config.courses.len(), 1);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = TomlConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, TrackerError::IoError(_)));
    }
}
