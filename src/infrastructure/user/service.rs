//! User schema service: validates untyped documents against a record variant

use std::fmt;
use std::sync::Arc;

use clap::ValueEnum;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::domain::user::{
    Fields, LoginRequest, UserBase, UserCreate, UserListResponse, UserResponse, UserUpdate,
    UsernameRegistry, ValidationErrors,
};

/// Record variant a document is validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    Base,
    Create,
    Update,
    Response,
    List,
    Login,
}

impl SchemaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Create => "create",
            Self::Update => "update",
            Self::Response => "response",
            Self::List => "list",
            Self::Login => "login",
        }
    }
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by the schema service
#[derive(Debug, Error)]
pub enum SchemaServiceError {
    #[error("Expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error("Failed to render record: {0}")]
    Render(#[from] serde_json::Error),
}

/// Service validating user documents against a shared username registry
#[derive(Debug)]
pub struct UserSchemaService<R: UsernameRegistry> {
    registry: Arc<R>,
}

impl<R: UsernameRegistry> UserSchemaService<R> {
    /// Create a new schema service
    pub fn new(registry: Arc<R>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn base(&self, fields: &Fields) -> Result<UserBase, ValidationErrors> {
        UserBase::from_fields(fields)
    }

    /// Validate an account creation request, reserving its username
    pub fn create(&self, fields: &Fields) -> Result<UserCreate, ValidationErrors> {
        UserCreate::from_fields(fields, self.registry.as_ref())
    }

    pub fn update(&self, fields: &Fields) -> Result<UserUpdate, ValidationErrors> {
        UserUpdate::from_fields(fields)
    }

    pub fn response(&self, fields: &Fields) -> Result<UserResponse, ValidationErrors> {
        UserResponse::from_fields(fields)
    }

    pub fn list(&self, fields: &Fields) -> Result<UserListResponse, ValidationErrors> {
        UserListResponse::from_fields(fields)
    }

    pub fn login(&self, fields: &Fields) -> Result<LoginRequest, ValidationErrors> {
        LoginRequest::from_fields(fields)
    }

    /// Validate `document` as `kind` and render the accepted record
    ///
    /// Passwords are never part of the rendered record.
    pub fn validate(&self, kind: SchemaKind, document: &Value) -> Result<Value, SchemaServiceError> {
        let Value::Object(fields) = document else {
            return Err(SchemaServiceError::NotAnObject(json_type(document)));
        };

        let result = match kind {
            SchemaKind::Base => render(self.base(fields)),
            SchemaKind::Create => render(self.create(fields)),
            SchemaKind::Update => render(self.update(fields)),
            SchemaKind::Response => render(self.response(fields)),
            SchemaKind::List => render(self.list(fields)),
            SchemaKind::Login => render(self.login(fields)),
        };

        if let Err(SchemaServiceError::Validation(errors)) = &result {
            debug!(schema = %kind, errors = errors.len(), "Document rejected");
        }

        result
    }
}

fn render<T: Serialize>(record: Result<T, ValidationErrors>) -> Result<Value, SchemaServiceError> {
    Ok(serde_json::to_value(record?)?)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::domain::user::fixtures::{
        login_request_data, user_create_data, user_response_data,
    };
    use crate::infrastructure::user::InMemoryUsernameRegistry;

    fn create_service() -> UserSchemaService<InMemoryUsernameRegistry> {
        UserSchemaService::new(Arc::new(InMemoryUsernameRegistry::new()))
    }

    #[test]
    fn test_validate_create_hides_password() {
        let service = create_service();
        let document = Value::Object(user_create_data());

        let rendered = service.validate(SchemaKind::Create, &document).unwrap();

        assert_eq!(rendered["username"], "john_doe_123");
        assert!(rendered.get("password").is_none());
        assert!(service.registry().contains("john_doe_123"));
    }

    #[test]
    fn test_validate_create_duplicate() {
        let service = create_service();
        let document = Value::Object(user_create_data());

        service.validate(SchemaKind::Create, &document).unwrap();
        let err = service.validate(SchemaKind::Create, &document).unwrap_err();

        match err {
            SchemaServiceError::Validation(errors) => {
                assert!(errors.has("username", "duplicate_username"))
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_validate_response_and_login() {
        let service = create_service();

        let response = service
            .validate(SchemaKind::Response, &Value::Object(user_response_data()))
            .unwrap();
        assert_eq!(response["id"], "UUID");
        assert_eq!(response["links"], json!([]));

        let login = service
            .validate(SchemaKind::Login, &Value::Object(login_request_data()))
            .unwrap();
        assert_eq!(login, json!({ "username": "john_doe_123" }));
    }

    #[test]
    fn test_validate_rejects_non_object() {
        let service = create_service();

        let err = service
            .validate(SchemaKind::Base, &json!(["not", "an", "object"]))
            .unwrap_err();

        assert!(matches!(err, SchemaServiceError::NotAnObject("an array")));
        assert_eq!(err.to_string(), "Expected a JSON object, got an array");
    }

    #[test]
    fn test_update_does_not_touch_registry() {
        let service = create_service();

        service
            .validate(SchemaKind::Update, &json!({ "username": "new_name" }))
            .unwrap();

        assert!(service.registry().is_empty());
    }

    #[test]
    fn test_schema_kind_display() {
        assert_eq!(SchemaKind::Create.to_string(), "create");
        assert_eq!(SchemaKind::List.as_str(), "list");
    }
}
