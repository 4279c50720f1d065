use crate::utils::error::{Result, TrackerError};
use crate::utils::validation::{validate_listing_template, validate_non_empty_string};

pub const SUBJECT_PARAM: &str = "term_subj=";
pub const TERM_PARAM: &str = "term_code=";

pub const DEFAULT_LISTING_TEMPLATE: &str = "https://courselist.wm.edu/courselist/courseinfo/searchresults?term_code=202310&term_subj=&attr=0&attr2=0&levl=0&status=0&ptrm=0&search=Search";

/// Builds per-subject listing URLs from an immutable query template.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    template: String,
    insert_at: usize,
}

impl UrlBuilder {
    pub fn new(template: impl Into<String>) -> Result<Self> {
        let template = template.into();
        validate_listing_template("listing.template", &template)?;

        let insert_at = param_value_start(&template, SUBJECT_PARAM).ok_or_else(|| {
            TrackerError::InvalidConfigValueError {
                field: "listing.template".to_string(),
                value: template.clone(),
                reason: format!("{} must appear literally in the query string", SUBJECT_PARAM),
            }
        })?;

        Ok(Self {
            template,
            insert_at,
        })
    }

    /// 以指定學期代碼取代模板中 `term_code=` 的值
    pub fn with_term(self, term_code: &str) -> Result<Self> {
        validate_non_empty_string("listing.term_code", term_code)?;
        if term_code.contains(|c: char| c.is_whitespace() || matches!(c, '&' | '#' | '=')) {
            return Err(TrackerError::InvalidConfigValueError {
                field: "listing.term_code".to_string(),
                value: term_code.to_string(),
                reason: "Term code cannot contain whitespace, '&', '#' or '='".to_string(),
            });
        }

        let start = param_value_start(&self.template, TERM_PARAM).ok_or_else(|| {
            TrackerError::InvalidConfigValueError {
                field: "listing.template".to_string(),
                value: self.template.clone(),
                reason: format!("Template has no {} parameter to override", TERM_PARAM),
            }
        })?;
        let end = self.template[start..]
            .find(|c: char| c == '&' || c == '#')
            .map(|i| start + i)
            .unwrap_or(self.template.len());

        let mut template = String::with_capacity(self.template.len() + term_code.len());
        template.push_str(&self.template[..start]);
        template.push_str(term_code);
        template.push_str(&self.template[end..]);

        UrlBuilder::new(template)
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn build_listing_url(&self, subject: &str) -> String {
        let mut url = String::with_capacity(self.template.len() + subject.len());
        url.push_str(&self.template[..self.insert_at]);
        url.push_str(subject);
        url.push_str(&self.template[self.insert_at..]);
        url
    }
}

impl Default for UrlBuilder {
    fn default() -> Self {
        let insert_at = DEFAULT_LISTING_TEMPLATE
            .find(SUBJECT_PARAM)
            .map(|i| i + SUBJECT_PARAM.len())
            .unwrap_or(DEFAULT_LISTING_TEMPLATE.len());
        Self {
            template: DEFAULT_LISTING_TEMPLATE.to_string(),
            insert_at,
        }
    }
}

/// Byte offset just past `param` when it starts a query parameter.
fn param_value_start(template: &str, param: &str) -> Option<usize> {
    template
        .match_indices(param)
        .find(|(i, _)| *i > 0 && matches!(template.as_bytes()[i - 1], b'?' | b'&'))
        .map(|(i, _)| i + param.len())
}
