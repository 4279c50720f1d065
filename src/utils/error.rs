use thiserror::Error;

/// 抓取失敗的具體原因；對外仍統一歸類為 `FetchError`
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("unexpected HTTP status {0}")]
    HttpStatus(u16),

    #[error("site returned its error page")]
    ErrorPage,

    #[error("results table not found on page")]
    MissingResults,
}

impl From<reqwest::Error> for FetchFailure {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchFailure::Timeout
        } else if let Some(status) = err.status() {
            FetchFailure::HttpStatus(status.as_u16())
        } else {
            FetchFailure::Transport(err)
        }
    }
}

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Could not fetch listing {url}: {reason}")]
    FetchError { url: String, reason: FetchFailure },

    #[error("CRN {crn} not found in listing {listing}")]
    NotFoundError { crn: u32, listing: String },

    #[error("Unrecognized status '{text}' for CRN {crn}")]
    UnknownStatusError { crn: u32, text: String },

    #[error("Row for CRN {crn} at cell {index} has no status column")]
    MalformedRowError { crn: u32, index: usize },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Lookup task failed: {message}")]
    TaskError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    NotFound,
    Parse,
    Config,
    System,
}

impl TrackerError {
    pub fn fetch(url: impl Into<String>, reason: impl Into<FetchFailure>) -> Self {
        TrackerError::FetchError {
            url: url.into(),
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TrackerError::FetchError { .. } => ErrorCategory::Fetch,
            TrackerError::NotFoundError { .. } => ErrorCategory::NotFound,
            TrackerError::UnknownStatusError { .. } | TrackerError::MalformedRowError { .. } => {
                ErrorCategory::Parse
            }
            TrackerError::ConfigError { .. }
            | TrackerError::InvalidConfigValueError { .. }
            | TrackerError::MissingConfigError { .. } => ErrorCategory::Config,
            TrackerError::TaskError { .. } | TrackerError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn is_fetch_error(&self) -> bool {
        self.category() == ErrorCategory::Fetch
    }

    pub fn is_not_found(&self) -> bool {
        self.category() == ErrorCategory::NotFound
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TrackerError::FetchError { .. } => {
                "Could not determine course status: the listing page could not be retrieved"
                    .to_string()
            }
            TrackerError::NotFoundError { crn, .. } => {
                format!("CRN {} does not appear in the subject listing", crn)
            }
            TrackerError::UnknownStatusError { .. } | TrackerError::MalformedRowError { .. } => {
                "The listing page layout was not recognized".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Fetch => "Check the subject code and your network connection",
            ErrorCategory::NotFound => "Check the CRN belongs to the given subject and term",
            ErrorCategory::Parse => "The site layout may have changed; the row stride may need updating",
            ErrorCategory::Config => "Fix the configuration value and try again",
            ErrorCategory::System => "Re-run the command; report it if the problem persists",
        }
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
