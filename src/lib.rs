//! User Schemas
//!
//! Validated records for user accounts in a web application:
//! - Field validators for usernames, emails, passwords and profile metadata
//! - Base, create, update, response, list and login record variants
//! - Username uniqueness through an injectable registry
//! - A command-line front end for validating JSON documents

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::user::{
    LoginRequest, UserBase, UserCreate, UserListResponse, UserResponse, UserUpdate,
    UsernameRegistry, ValidationErrors,
};
pub use infrastructure::user::{InMemoryUsernameRegistry, SchemaKind, UserSchemaService};
