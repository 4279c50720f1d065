use crate::core::url_builder::SUBJECT_PARAM;
use crate::utils::error::{Result, TrackerError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(TrackerError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 模板必須是合法網址，且恰好含有一個空值的 `term_subj=` 參數
pub fn validate_listing_template(field_name: &str, template: &str) -> Result<()> {
    validate_url(field_name, template)?;

    let url = Url::parse(template).map_err(|e| TrackerError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: template.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;

    let key = SUBJECT_PARAM.trim_end_matches('=');
    let values: Vec<String> = url
        .query_pairs()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
        .collect();

    let reason = match values.as_slice() {
        [] => Some(format!("Template has no {} parameter", key)),
        [value] if !value.is_empty() => Some(format!("{} must be empty in the template", key)),
        [_] => None,
        _ => Some(format!("Template repeats the {} parameter", key)),
    };

    match reason {
        Some(reason) => Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: template.to_string(),
            reason,
        }),
        None => Ok(()),
    }
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(TrackerError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}
