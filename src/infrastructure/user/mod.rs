//! User infrastructure module
//!
//! This module provides the in-memory username registry and the schema
//! service that validates user documents against a record variant.

mod registry;
mod service;

pub use registry::InMemoryUsernameRegistry;
pub use service::{SchemaKind, SchemaServiceError, UserSchemaService};
