//! Login request

use serde::Serialize;

use super::fields::{FieldReader, Fields};
use super::validation::{validate_required_text, ValidationErrors};

/// Credentials submitted at login
///
/// Only presence is checked; the username format is not enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    username: String,
    #[serde(skip_serializing)]
    password: String,
}

impl LoginRequest {
    pub fn from_fields(fields: &Fields) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(fields);
        let username = reader.required("username", |s| validate_required_text(s).map(str::to_string));
        let password = reader.required("password", |s| validate_required_text(s).map(str::to_string));

        let login = username
            .zip(password)
            .map(|(username, password)| Self { username, password });
        reader.finish(login)
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}
