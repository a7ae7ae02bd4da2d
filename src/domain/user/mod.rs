//! User domain
//!
//! This module provides the validated user records (base, create, update,
//! response, list and login), the field validators they are built from and
//! the username registry trait used to keep usernames unique.

mod entity;
mod fields;
mod login;
mod registry;
mod response;
mod validation;

#[cfg(test)]
pub(crate) mod fixtures;

pub use entity::{UserBase, UserCreate, UserUpdate};
pub use fields::{Fields, Patch};
pub use login::LoginRequest;
pub use registry::UsernameRegistry;
pub use response::{Link, UserListResponse, UserResponse};
pub use validation::{
    validate_bio, validate_email, validate_password, validate_profile_picture_url,
    validate_required_text, validate_timestamp, validate_username, FieldError,
    UserValidationError, ValidationErrors, MAX_BIO_LENGTH, MAX_USERNAME_LENGTH,
    MIN_PASSWORD_LENGTH, MIN_USERNAME_LENGTH,
};

#[cfg(test)]
pub use registry::MockUsernameRegistry;
