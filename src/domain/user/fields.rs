//! Reading typed fields out of an untyped JSON mapping

use serde_json::{Map, Value};

use super::validation::{FieldError, UserValidationError, ValidationErrors};

/// Input mapping handed to every `from_fields` constructor
pub type Fields = Map<String, Value>;

/// Value of a nullable field in a partial update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Field not present: leave unchanged
    #[default]
    Absent,
    /// Explicit null: clear the value
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Resolve the patch against the current value
    pub fn apply(&self, current: Option<&T>) -> Option<T>
    where
        T: Clone,
    {
        match self {
            Self::Absent => current.cloned(),
            Self::Null => None,
            Self::Value(v) => Some(v.clone()),
        }
    }
}

impl<T: serde::Serialize> serde::Serialize for Patch<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.value().serialize(serializer)
    }
}

/// Collects field errors while a record is being assembled
pub(crate) struct FieldReader<'a> {
    fields: &'a Fields,
    errors: Vec<FieldError>,
}

impl<'a> FieldReader<'a> {
    pub fn new(fields: &'a Fields) -> Self {
        Self {
            fields,
            errors: Vec::new(),
        }
    }

    pub fn push(&mut self, field: impl Into<String>, error: UserValidationError) {
        self.errors.push(FieldError::new(field, error));
    }

    /// Merge errors of a nested record under `prefix`
    pub fn extend_nested(&mut self, prefix: &str, errors: ValidationErrors) {
        self.errors
            .extend(errors.into_errors().into_iter().map(|e| e.nested(prefix)));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn raw(&self, name: &str) -> Option<&'a Value> {
        self.fields.get(name)
    }

    /// Required string field, checked by `validate`
    pub fn required<T>(
        &mut self,
        name: &str,
        validate: impl FnOnce(&'a str) -> Result<T, UserValidationError>,
    ) -> Option<T> {
        let fields = self.fields;
        match fields.get(name) {
            None | Some(Value::Null) => {
                self.push(name, UserValidationError::MissingRequiredField);
                None
            }
            Some(value) => self.check_str(name, value, validate),
        }
    }

    /// Optional string field; absent and null both read as `None`
    pub fn optional<T>(
        &mut self,
        name: &str,
        validate: impl FnOnce(&'a str) -> Result<T, UserValidationError>,
    ) -> Option<T> {
        let fields = self.fields;
        match fields.get(name) {
            None | Some(Value::Null) => None,
            Some(value) => self.check_str(name, value, validate),
        }
    }

    /// Field that may be omitted but not nulled
    pub fn not_null<T>(
        &mut self,
        name: &str,
        validate: impl FnOnce(&'a str) -> Result<T, UserValidationError>,
    ) -> Option<T> {
        let fields = self.fields;
        match fields.get(name) {
            None => None,
            Some(Value::Null) => {
                self.push(name, UserValidationError::invalid_format("Value cannot be null"));
                None
            }
            Some(value) => self.check_str(name, value, validate),
        }
    }

    /// Nullable field with patch semantics
    pub fn patch<T>(
        &mut self,
        name: &str,
        validate: impl FnOnce(&'a str) -> Result<T, UserValidationError>,
    ) -> Patch<T> {
        let fields = self.fields;
        match fields.get(name) {
            None => Patch::Absent,
            Some(Value::Null) => Patch::Null,
            // A rejected value is recorded as an error; the patch itself is discarded
            Some(value) => self
                .check_str(name, value, validate)
                .map_or(Patch::Absent, Patch::Value),
        }
    }

    /// Required non-negative integer
    pub fn required_count(&mut self, name: &str) -> Option<u64> {
        let fields = self.fields;
        match fields.get(name) {
            None | Some(Value::Null) => {
                self.push(name, UserValidationError::MissingRequiredField);
                None
            }
            Some(value) => match value.as_u64() {
                Some(count) => Some(count),
                None => {
                    self.push(
                        name,
                        UserValidationError::invalid_format("Expected a non-negative integer"),
                    );
                    None
                }
            },
        }
    }

    fn check_str<T>(
        &mut self,
        name: &str,
        value: &'a Value,
        validate: impl FnOnce(&'a str) -> Result<T, UserValidationError>,
    ) -> Option<T> {
        let Some(s) = value.as_str() else {
            self.push(name, UserValidationError::invalid_format("Expected a string"));
            return None;
        };

        match validate(s) {
            Ok(v) => Some(v),
            Err(e) => {
                self.push(name, e);
                None
            }
        }
    }

    /// Finish assembly: any recorded error wins over the assembled value
    pub fn finish<T>(self, value: Option<T>) -> Result<T, ValidationErrors> {
        match value {
            Some(v) if self.errors.is_empty() => Ok(v),
            _ => Err(ValidationErrors::new(self.errors)),
        }
    }
}

/// Accept any string as-is
pub(crate) fn text(value: &str) -> Result<String, UserValidationError> {
    Ok(value.to_string())
}
