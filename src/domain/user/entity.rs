//! User records accepted from clients

use serde::Serialize;
use tracing::debug;

use super::fields::{text, FieldReader, Fields, Patch};
use super::registry::UsernameRegistry;
use super::validation::{
    validate_bio, validate_email, validate_password, validate_profile_picture_url,
    validate_username, UserValidationError, ValidationErrors,
};

/// Identity and profile fields shared by every user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserBase {
    username: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_picture_url: Option<String>,
}

impl UserBase {
    /// Build a validated record from an untyped field mapping
    pub fn from_fields(fields: &Fields) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(fields);
        let base = Self::read(&mut reader);
        reader.finish(base)
    }

    pub(crate) fn read(reader: &mut FieldReader<'_>) -> Option<Self> {
        let username = reader.required("username", |s| validate_username(s).map(str::to_string));
        let email = reader.required("email", |s| validate_email(s).map(str::to_string));
        let full_name = reader.optional("full_name", text);
        let bio = reader.optional("bio", |s| validate_bio(s).map(str::to_string));
        let profile_picture_url = reader.optional("profile_picture_url", |s| {
            validate_profile_picture_url(s).map(str::to_string)
        });

        username.zip(email).map(|(username, email)| Self {
            username,
            email,
            full_name,
            bio,
            profile_picture_url,
        })
    }

    // Getters

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }

    pub fn profile_picture_url(&self) -> Option<&str> {
        self.profile_picture_url.as_deref()
    }
}

/// Account creation request: base fields plus a password
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserCreate {
    #[serde(flatten)]
    base: UserBase,
    /// Plain-text password - never exposed in serialization
    #[serde(skip_serializing)]
    password: String,
}

impl UserCreate {
    /// Build a validated record, reserving the username in `registry`
    ///
    /// The username is only reserved once every other field is valid, so a
    /// rejected request never claims a name.
    pub fn from_fields<R>(fields: &Fields, registry: &R) -> Result<Self, ValidationErrors>
    where
        R: UsernameRegistry + ?Sized,
    {
        let mut reader = FieldReader::new(fields);
        let base = UserBase::read(&mut reader);
        let password = reader.required("password", |s| validate_password(s).map(str::to_string));

        let record = base
            .zip(password)
            .map(|(base, password)| Self { base, password });

        if let Some(record) = &record {
            if !reader.has_errors() && !registry.reserve(record.username()) {
                debug!(username = %record.username(), "Rejected duplicate username");
                reader.push(
                    "username",
                    UserValidationError::DuplicateUsername {
                        username: record.username().to_string(),
                    },
                );
            }
        }

        reader.finish(record)
    }

    pub fn base(&self) -> &UserBase {
        &self.base
    }

    pub fn username(&self) -> &str {
        self.base.username()
    }

    pub fn email(&self) -> &str {
        self.base.email()
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn into_base(self) -> UserBase {
        self.base
    }
}

/// Partial update of a user's base fields
///
/// `username` and `email` may be omitted but never cleared; the profile
/// fields distinguish an omitted value from an explicit null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    full_name: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    bio: Patch<String>,
    #[serde(skip_serializing_if = "Patch::is_absent")]
    profile_picture_url: Patch<String>,
}

impl UserUpdate {
    pub fn from_fields(fields: &Fields) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(fields);

        let update = Self {
            username: reader.not_null("username", |s| validate_username(s).map(str::to_string)),
            email: reader.not_null("email", |s| validate_email(s).map(str::to_string)),
            full_name: reader.patch("full_name", text),
            bio: reader.patch("bio", |s| validate_bio(s).map(str::to_string)),
            profile_picture_url: reader.patch("profile_picture_url", |s| {
                validate_profile_picture_url(s).map(str::to_string)
            }),
        };

        reader.finish(Some(update))
    }

    /// True if applying this update changes nothing
    pub fn is_empty(&self) -> bool {
        self.username.is_none()
            && self.email.is_none()
            && self.full_name.is_absent()
            && self.bio.is_absent()
            && self.profile_picture_url.is_absent()
    }

    /// Produce the record that results from applying this update to `current`
    pub fn apply(&self, current: &UserBase) -> UserBase {
        UserBase {
            username: self
                .username
                .clone()
                .unwrap_or_else(|| current.username.clone()),
            email: self.email.clone().unwrap_or_else(|| current.email.clone()),
            full_name: self.full_name.apply(current.full_name.as_ref()),
            bio: self.bio.apply(current.bio.as_ref()),
            profile_picture_url: self
                .profile_picture_url
                .apply(current.profile_picture_url.as_ref()),
        }
    }

    // Getters

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    pub fn full_name(&self) -> &Patch<String> {
        &self.full_name
    }

    pub fn bio(&self) -> &Patch<String> {
        &self.bio
    }

    pub fn profile_picture_url(&self) -> &Patch<String> {
        &self.profile_picture_url
    }
}
