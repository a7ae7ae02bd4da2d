//! User records rendered by the server

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::fields::{text, FieldReader, Fields};
use super::validation::{
    validate_bio, validate_email, validate_profile_picture_url, validate_required_text,
    validate_timestamp, validate_username, UserValidationError, ValidationErrors,
};

/// Reference to a related resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    rel: String,
    href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    method: Option<String>,
}

impl Link {
    pub fn from_fields(fields: &Fields) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(fields);
        let rel = reader.required("rel", |s| validate_required_text(s).map(str::to_string));
        let href = reader.required("href", |s| validate_required_text(s).map(str::to_string));
        let method = reader.optional("method", text);

        let link = rel
            .zip(href)
            .map(|(rel, href)| Self { rel, href, method });
        reader.finish(link)
    }

    pub fn rel(&self) -> &str {
        &self.rel
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn method(&self) -> Option<&str> {
        self.method.as_deref()
    }
}

/// Server view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserResponse {
    id: String,
    username: String,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profile_picture_url: Option<String>,
    /// `None` until the user logs in for the first time
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    links: Vec<Link>,
}

impl UserResponse {
    pub fn from_fields(fields: &Fields) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(fields);

        let id = reader.required("id", |s| validate_required_text(s).map(str::to_string));
        let username = reader.required("username", |s| validate_username(s).map(str::to_string));
        let email = reader.required("email", |s| validate_email(s).map(str::to_string));
        let full_name = reader.optional("full_name", text);
        let bio = reader.optional("bio", |s| validate_bio(s).map(str::to_string));
        let profile_picture_url = reader.optional("profile_picture_url", |s| {
            validate_profile_picture_url(s).map(str::to_string)
        });
        let last_login_at = reader.optional("last_login_at", validate_timestamp);
        let created_at = reader.required("created_at", validate_timestamp);
        let updated_at = reader.required("updated_at", validate_timestamp);
        let links = read_links(&mut reader);

        let response = match (id, username, email, created_at, updated_at) {
            (Some(id), Some(username), Some(email), Some(created_at), Some(updated_at)) => {
                Some(Self {
                    id,
                    username,
                    email,
                    full_name,
                    bio,
                    profile_picture_url,
                    last_login_at,
                    created_at,
                    updated_at,
                    links,
                })
            }
            _ => None,
        };

        reader.finish(response)
    }

    // Getters

    pub fn id(&self) -> &str {
        &self.id
    }

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

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

/// A page of users
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserListResponse {
    items: Vec<UserResponse>,
    total: u64,
    links: Vec<Link>,
}

impl UserListResponse {
    pub fn from_fields(fields: &Fields) -> Result<Self, ValidationErrors> {
        let mut reader = FieldReader::new(fields);

        let items = read_items(&mut reader);
        let total = reader.required_count("total");
        let links = read_links(&mut reader);

        if let (Some(items), Some(total)) = (&items, total) {
            if (items.len() as u64) > total {
                reader.push(
                    "total",
                    UserValidationError::invalid_format(format!(
                        "Total {} is smaller than the number of items ({})",
                        total,
                        items.len()
                    )),
                );
            }
        }

        let list = items
            .zip(total)
            .map(|(items, total)| Self { items, total, links });
        reader.finish(list)
    }

    pub fn items(&self) -> &[UserResponse] {
        &self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }
}

/// Read `links`; absent or null means no links
fn read_links(reader: &mut FieldReader<'_>) -> Vec<Link> {
    match reader.raw("links") {
        None | Some(Value::Null) => Vec::new(),
        Some(_) => read_objects(reader, "links", Link::from_fields).unwrap_or_default(),
    }
}

fn read_items(reader: &mut FieldReader<'_>) -> Option<Vec<UserResponse>> {
    match reader.raw("items") {
        None | Some(Value::Null) => {
            reader.push("items", UserValidationError::MissingRequiredField);
            None
        }
        Some(_) => read_objects(reader, "items", UserResponse::from_fields),
    }
}

/// Validate every element of an array of objects, prefixing nested errors with `name[i]`
fn read_objects<T>(
    reader: &mut FieldReader<'_>,
    name: &str,
    build: impl Fn(&Fields) -> Result<T, ValidationErrors>,
) -> Option<Vec<T>> {
    let Some(Value::Array(elements)) = reader.raw(name) else {
        reader.push(name, UserValidationError::invalid_format("Expected an array"));
        return None;
    };

    let mut built = Vec::with_capacity(elements.len());
    let mut failed = false;

    for (i, element) in elements.iter().enumerate() {
        let path = format!("{}[{}]", name, i);

        let Value::Object(fields) = element else {
            reader.push(path, UserValidationError::invalid_format("Expected an object"));
            failed = true;
            continue;
        };

        match build(fields) {
            Ok(value) => built.push(value),
            Err(errors) => {
                reader.extend_nested(&path, errors);
                failed = true;
            }
        }
    }

    (!failed).then_some(built)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::domain::user::fixtures::{as_fields, user_response_data};

    #[test]
    fn test_user_response_datetime() {
        let data = user_response_data();
        let user = UserResponse::from_fields(&data).unwrap();

        assert_eq!(
            user.last_login_at(),
            Some(validate_timestamp("2024-05-01T09:15:00.123456Z").unwrap())
        );
        assert_eq!(
            user.created_at(),
            Utc.with_ymd_and_hms(2023, 11, 20, 14, 2, 11).unwrap()
        );
        assert_eq!(
            user.updated_at(),
            validate_timestamp("2024-04-30T18:45:59.5Z").unwrap()
        );
        assert!(user.links().is_empty());
    }

    #[test]
    fn test_user_response_timestamps_survive_rendering() {
        let user = UserResponse::from_fields(&user_response_data()).unwrap();

        let rendered = serde_json::to_value(&user).unwrap();
        let reparsed = UserResponse::from_fields(&as_fields(rendered)).unwrap();

        assert_eq!(reparsed.last_login_at(), user.last_login_at());
        assert_eq!(reparsed.created_at(), user.created_at());
        assert_eq!(reparsed.updated_at(), user.updated_at());
    }

    #[test]
    fn test_user_response_timestamps_render_in_utc() {
        let mut data = user_response_data();
        data.insert("created_at".into(), json!("2024-05-01T12:30:00+02:00"));

        let user = UserResponse::from_fields(&data).unwrap();
        let rendered = serde_json::to_value(&user).unwrap();

        assert_eq!(rendered["created_at"], json!("2024-05-01T10:30:00Z"));
    }

    #[test]
    fn test_user_response_checks_bio_and_picture_url() {
        let mut data = user_response_data();
        data.insert("bio".into(), json!("a".repeat(501)));
        data.insert("profile_picture_url".into(), json!("/images/me.png"));

        let errors = UserResponse::from_fields(&data).unwrap_err();
        assert!(errors.has("bio", "too_long"));
        assert!(errors.has("profile_picture_url", "invalid_format"));
    }

    #[test]
    fn test_user_response_without_login() {
        let mut data = user_response_data();
        data.insert("last_login_at".into(), Value::Null);
        data.remove("links");

        let user = UserResponse::from_fields(&data).unwrap();
        assert_eq!(user.last_login_at(), None);
        assert!(user.links().is_empty());
    }

    #[test]
    fn test_user_response_requires_timestamps() {
        let mut data = user_response_data();
        data.remove("created_at");
        data.insert("updated_at".into(), json!("not a date"));

        let errors = UserResponse::from_fields(&data).unwrap_err();
        assert!(errors.has("created_at", "missing_required_field"));
        assert!(errors.has("updated_at", "invalid_format"));
    }

    #[test]
    fn test_user_response_links_keep_order() {
        let mut data = user_response_data();
        data.insert(
            "links".into(),
            json!([
                { "rel": "self", "href": "/users/UUID", "method": "GET" },
                { "rel": "update", "href": "/users/UUID", "method": "PUT" },
                { "rel": "delete", "href": "/users/UUID" }
            ]),
        );

        let user = UserResponse::from_fields(&data).unwrap();
        let rels: Vec<_> = user.links().iter().map(Link::rel).collect();

        assert_eq!(rels, ["self", "update", "delete"]);
        assert_eq!(user.links()[1].method(), Some("PUT"));
        assert_eq!(user.links()[2].method(), None);
    }

    #[test]
    fn test_user_response_invalid_links() {
        let mut data = user_response_data();
        data.insert("links".into(), json!([{ "rel": "self" }, "oops"]));

        let errors = UserResponse::from_fields(&data).unwrap_err();
        assert!(errors.has("links[0].href", "missing_required_field"));
        assert!(errors.has("links[1]", "invalid_format"));
    }

    #[test]
    fn test_user_response_links_not_an_array() {
        let mut data = user_response_data();
        data.insert("links".into(), json!("self"));

        let errors = UserResponse::from_fields(&data).unwrap_err();
        assert!(errors.has("links", "invalid_format"));
    }

    #[test]
    fn test_user_list_response() {
        let data = as_fields(json!({
            "items": [user_response_data(), user_response_data()],
            "total": 7,
            "links": [{ "rel": "next", "href": "/users?page=2" }]
        }));

        let list = UserListResponse::from_fields(&data).unwrap();
        assert_eq!(list.items().len(), 2);
        assert_eq!(list.total(), 7);
        assert_eq!(list.links()[0].href(), "/users?page=2");
    }

    #[test]
    fn test_user_list_response_nested_errors() {
        let mut bad = user_response_data();
        bad.insert("email".into(), json!("nope"));

        let data = as_fields(json!({
            "items": [user_response_data(), bad],
            "total": 1
        }));

        let errors = UserListResponse::from_fields(&data).unwrap_err();
        assert!(errors.has("items[1].email", "invalid_format"));
        assert!(!errors.has("total", "invalid_format"));
    }

    #[test]
    fn test_user_list_response_total_below_items() {
        let data = as_fields(json!({
            "items": [user_response_data(), user_response_data()],
            "total": 1
        }));

        let errors = UserListResponse::from_fields(&data).unwrap_err();
        assert!(errors.has("total", "invalid_format"));
    }

    #[test]
    fn test_user_list_response_requires_items() {
        let errors = UserListResponse::from_fields(&as_fields(json!({ "total": 0 }))).unwrap_err();
        assert!(errors.has("items", "missing_required_field"));
    }
}
