use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: String },
    #[error("invalid {field}: {reason}")]
    InvalidFormat { field: String, reason: String },
    #[error("invalid {field}: {value:?} is not one of the accepted values")]
    UnknownVariant { field: String, value: String },
    #[error("{field} must be between {min} and {max} characters")]
    Length {
        field: String,
        min: usize,
        max: usize,
    },
    #[error("end_date {end} is before start_date {start}")]
    DateOrder { start: NaiveDate, end: NaiveDate },
}

impl ValidationError {
    fn format(field: &str, reason: &str) -> Self {
        Self::InvalidFormat {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,30}$").unwrap());
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static PERSON_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{L}[\p{L}' .-]{0,49}$").unwrap());
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ()-]{6,19}$").unwrap());
static COMPANY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}][\p{L}\p{N}&.,'() -]{1,99}$").unwrap());
static FILE_URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^https?://\S+$").unwrap());

const EMAIL_MAX_LEN: usize = 254;
const PASSWORD_MIN_LEN: usize = 8;
const PASSWORD_MAX_LEN: usize = 64;
pub const TITLE_MAX_LEN: usize = 120;
pub const ISSUE_MAX_LEN: usize = 500;
pub const TEXT_MAX_LEN: usize = 2000;

/// Validate a username. Returns the lowercased form used for storage and lookup.
pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(ValidationError::MissingField {
            field: "username".into(),
        });
    }
    if !USERNAME_RE.is_match(username) {
        return Err(ValidationError::format(
            "username",
            "use 3-30 letters, digits, '_', '.' or '-'",
        ));
    }
    Ok(username.to_lowercase())
}

/// Validate and normalize an email address. Returns the lowercased, trimmed email.
pub fn validate_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    if email.is_empty() {
        return Err(ValidationError::MissingField {
            field: "email".into(),
        });
    }
    if email.len() > EMAIL_MAX_LEN || !EMAIL_RE.is_match(&email) {
        return Err(ValidationError::format("email", "not a valid email address"));
    }
    Ok(email)
}

/// First or last name of a person.
pub fn validate_person_name(field: &str, name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.into(),
        });
    }
    if !PERSON_NAME_RE.is_match(name) {
        return Err(ValidationError::format(
            field,
            "letters, spaces, apostrophes, dots and hyphens only (max 50)",
        ));
    }
    Ok(name.to_string())
}

pub fn validate_phone(phone: &str) -> Result<String, ValidationError> {
    let phone = phone.trim();
    if !PHONE_RE.is_match(phone) {
        return Err(ValidationError::format("phone", "not a valid phone number"));
    }
    Ok(phone.to_string())
}

/// Passwords are 8-64 characters and mix at least one letter with one digit.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        return Err(ValidationError::Length {
            field: "password".into(),
            min: PASSWORD_MIN_LEN,
            max: PASSWORD_MAX_LEN,
        });
    }
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if !has_letter || !has_digit {
        return Err(ValidationError::format(
            "password",
            "must contain at least one letter and one digit",
        ));
    }
    Ok(())
}

pub fn validate_company_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::MissingField {
            field: "name".into(),
        });
    }
    if !COMPANY_NAME_RE.is_match(name) {
        return Err(ValidationError::format(
            "name",
            "2-100 letters, digits, spaces or &.,'()- characters",
        ));
    }
    Ok(name.to_string())
}

/// Required single-line text (project names, titles). Trimmed; 1..=max chars.
pub fn validate_title(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ValidationError::MissingField {
            field: field.into(),
        });
    }
    if value.contains(['\n', '\r']) {
        return Err(ValidationError::format(field, "must be a single line"));
    }
    validate_text(field, value, 1, max)
}

/// Required free text that may span several lines. Trimmed; min..=max chars.
pub fn validate_text(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<String, ValidationError> {
    let value = value.trim();
    if value.is_empty() && min > 0 {
        return Err(ValidationError::MissingField {
            field: field.into(),
        });
    }
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ValidationError::Length {
            field: field.into(),
            min,
            max,
        });
    }
    Ok(value.to_string())
}

/// Optional free text. Blank input normalizes to `None`.
pub fn normalize_text(field: &str, value: &str) -> Result<Option<String>, ValidationError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > TEXT_MAX_LEN {
        return Err(ValidationError::Length {
            field: field.into(),
            min: 0,
            max: TEXT_MAX_LEN,
        });
    }
    Ok(Some(value.to_string()))
}

pub fn validate_budget(budget: f64) -> Result<f64, ValidationError> {
    if !budget.is_finite() || budget < 0.0 {
        return Err(ValidationError::format(
            "budget",
            "must be a non-negative number",
        ));
    }
    Ok(budget)
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(field: &str, value: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| ValidationError::format(field, "expected a YYYY-MM-DD date"))
}

pub fn validate_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => Err(ValidationError::DateOrder { start, end }),
        _ => Ok(()),
    }
}

pub fn validate_file_url(url: &str) -> Result<String, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingField {
            field: "file_url".into(),
        });
    }
    if !FILE_URL_RE.is_match(url) {
        return Err(ValidationError::format(
            "file_url",
            "must be an http(s) URL without spaces",
        ));
    }
    Ok(url.to_string())
}

pub fn validate_version(version: i64) -> Result<u32, ValidationError> {
    u32::try_from(version)
        .ok()
        .filter(|v| *v >= 1)
        .ok_or_else(|| ValidationError::format("version", "must be a positive integer"))
}
