use crate::utils::error::{Result, TrackerError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 課程註冊編號 (CRN)，恆為正整數
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Crn(u32);

impl Crn {
    pub fn new(value: u32) -> Result<Self> {
        if value == 0 {
            return Err(TrackerError::InvalidConfigValueError {
                field: "crn".to_string(),
                value: value.to_string(),
                reason: "CRN must be a positive integer".to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Crn {
    type Error = TrackerError;

    fn try_from(value: u32) -> Result<Self> {
        Crn::new(value)
    }
}

impl From<Crn> for u32 {
    fn from(crn: Crn) -> Self {
        crn.0
    }
}

impl FromStr for Crn {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|e| TrackerError::InvalidConfigValueError {
                field: "crn".to_string(),
                value: s.to_string(),
                reason: e.to_string(),
            })?;
        Crn::new(value)
    }
}

impl fmt::Display for Crn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Open,
    Closed,
}

impl Status {
    /// 解析狀態欄文字；只接受 `OPEN` 與 `CLOSED`
    pub fn from_cell(text: &str) -> Option<Self> {
        match text.trim() {
            "OPEN" => Some(Status::Open),
            "CLOSED" => Some(Status::Closed),
            _ => None,
        }
    }

    pub fn is_open(self) -> bool {
        self == Status::Open
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Open => write!(f, "OPEN"),
            Status::Closed => write!(f, "CLOSED"),
        }
    }
}

/// One (CRN, subject) pair to look up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseQuery {
    pub crn: Crn,
    pub subject: String,
}

impl CourseQuery {
    pub fn new(crn: Crn, subject: impl Into<String>) -> Self {
        Self {
            crn,
            subject: subject.into(),
        }
    }
}

impl FromStr for CourseQuery {
    type Err = TrackerError;

    /// `12345:CSCI`
    fn from_str(s: &str) -> Result<Self> {
        let (crn, subject) = s.split_once(':').ok_or_else(|| {
            TrackerError::InvalidConfigValueError {
                field: "course".to_string(),
                value: s.to_string(),
                reason: "Expected CRN:SUBJECT".to_string(),
            }
        })?;
        let subject = subject.trim();
        crate::utils::validation::validate_non_empty_string("subject", subject)?;
        Ok(CourseQuery::new(crn.parse()?, subject))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub crn: Crn,
    pub subject: String,
    pub status: Option<Status>,
    pub error: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl StatusReport {
    pub fn from_result(query: CourseQuery, result: &Result<Status>) -> Self {
        let (status, error) = match result {
            Ok(status) => (Some(*status), None),
            Err(e) => (None, Some(e.to_string())),
        };
        Self {
            crn: query.crn,
            subject: query.subject,
            status,
            error,
            checked_at: Utc::now(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}
