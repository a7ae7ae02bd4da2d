//! User validation utilities

use std::fmt;

use chrono::{DateTime, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;
use validator::{ValidateEmail, ValidateUrl};

pub const MIN_USERNAME_LENGTH: usize = 3;
pub const MAX_USERNAME_LENGTH: usize = 30;
pub const MIN_PASSWORD_LENGTH: usize = 10;
pub const MAX_BIO_LENGTH: usize = 500;

/// Regex pattern for valid usernames (alphanumeric, underscores and hyphens)
static USERNAME_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,30}$").unwrap());

/// Offset-less timestamps are read as UTC
const NAIVE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// Errors that can occur while validating a single field
#[derive(Debug, Error, Clone, PartialEq, Serialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum UserValidationError {
    #[error("{message}")]
    InvalidFormat {
        #[serde(skip_serializing)]
        message: String,
    },

    #[error("Value is too short. Minimum length is {min} characters")]
    TooShort { min: usize },

    #[error("Value is too long. Maximum length is {max} characters")]
    TooLong { max: usize },

    #[error("Username already exists.")]
    DuplicateUsername { username: String },

    #[error("Field is required")]
    MissingRequiredField,
}

impl UserValidationError {
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }

    /// Stable machine-readable code for the error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFormat { .. } => "invalid_format",
            Self::TooShort { .. } => "too_short",
            Self::TooLong { .. } => "too_long",
            Self::DuplicateUsername { .. } => "duplicate_username",
            Self::MissingRequiredField => "missing_required_field",
        }
    }
}

/// A validation error attached to the field that produced it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    field: String,
    /// Human-readable reason, rendered from `error`
    message: String,
    #[serde(flatten)]
    error: UserValidationError,
}

impl FieldError {
    pub fn new(field: impl Into<String>, error: UserValidationError) -> Self {
        Self {
            field: field.into(),
            message: error.to_string(),
            error,
        }
    }

    /// Path of the offending field, e.g. `username` or `links[0].href`
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn error(&self) -> &UserValidationError {
        &self.error
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub(crate) fn nested(self, prefix: &str) -> Self {
        Self {
            field: format!("{}.{}", prefix, self.field),
            message: self.message,
            error: self.error,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.error)
    }
}

/// Every field error found while assembling one record
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Errors reported for one field path
    pub fn for_field<'a>(
        &'a self,
        field: &'a str,
    ) -> impl Iterator<Item = &'a UserValidationError> + 'a {
        self.errors
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| &e.error)
    }

    /// Check whether `field` failed with the given error code
    pub fn has(&self, field: &str, code: &str) -> bool {
        self.for_field(field).any(|e| e.code() == code)
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Validation failed")?;

        for (i, error) in self.errors.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{}{}", sep, error)?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Validate a username
///
/// Rules:
/// - 3 to 30 characters
/// - Only ASCII letters, digits, underscores and hyphens
pub fn validate_username(username: &str) -> Result<&str, UserValidationError> {
    if !USERNAME_PATTERN.is_match(username) {
        return Err(UserValidationError::invalid_format(format!(
            "Username must be {}-{} characters of letters, digits, underscores or hyphens",
            MIN_USERNAME_LENGTH, MAX_USERNAME_LENGTH
        )));
    }

    Ok(username)
}

/// Validate a password
///
/// Rules:
/// - Minimum 10 characters
pub fn validate_password(password: &str) -> Result<&str, UserValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(UserValidationError::TooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(password)
}

pub fn validate_email(email: &str) -> Result<&str, UserValidationError> {
    if !email.validate_email() {
        return Err(UserValidationError::invalid_format(
            "Value is not a valid email address",
        ));
    }

    Ok(email)
}

pub fn validate_bio(bio: &str) -> Result<&str, UserValidationError> {
    if bio.chars().count() > MAX_BIO_LENGTH {
        return Err(UserValidationError::TooLong {
            max: MAX_BIO_LENGTH,
        });
    }

    Ok(bio)
}

/// Validate a profile picture URL (must be absolute)
pub fn validate_profile_picture_url(url: &str) -> Result<&str, UserValidationError> {
    if !url.validate_url() {
        return Err(UserValidationError::invalid_format(
            "Value is not a valid URL",
        ));
    }

    Ok(url)
}

/// Reject empty strings for fields that only need to be present
pub fn validate_required_text(value: &str) -> Result<&str, UserValidationError> {
    if value.is_empty() {
        return Err(UserValidationError::MissingRequiredField);
    }

    Ok(value)
}

/// Parse an RFC 3339 timestamp; a timestamp without offset is taken as UTC
pub fn validate_timestamp(value: &str) -> Result<DateTime<Utc>, UserValidationError> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, NAIVE_TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            UserValidationError::invalid_format(format!("Invalid timestamp '{}'", value))
        })
}
