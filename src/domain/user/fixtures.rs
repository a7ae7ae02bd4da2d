//! Shared user documents for tests

use serde_json::{json, Value};

use super::fields::Fields;

pub fn as_fields(value: Value) -> Fields {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be a JSON object, got {}", other),
    }
}

pub fn user_base_data() -> Fields {
    as_fields(json!({
        "username": "john_doe_123",
        "email": "john.doe@example.com",
        "full_name": "John Doe",
        "bio": "I am a software engineer with over 5 years of experience.",
        "profile_picture_url": "https://example.com/profile_pictures/john_doe.jpg"
    }))
}

pub fn user_create_data() -> Fields {
    let mut data = user_base_data();
    data.insert("password".into(), json!("SecurePassword123!"));
    data
}

pub fn user_update_data() -> Fields {
    as_fields(json!({
        "email": "john.doe.new@example.com",
        "full_name": "John H. Doe",
        "bio": "I specialize in backend development and API design.",
        "profile_picture_url": "https://example.com/profile_pictures/john_doe_updated.jpg"
    }))
}

pub fn user_response_data() -> Fields {
    as_fields(json!({
        "id": "UUID",
        "username": "testuser",
        "email": "test@example.com",
        "last_login_at": "2024-05-01T09:15:00.123456Z",
        "created_at": "2023-11-20T14:02:11Z",
        "updated_at": "2024-04-30T18:45:59.5Z",
        "links": []
    }))
}

pub fn login_request_data() -> Fields {
    as_fields(json!({
        "username": "john_doe_123",
        "password": "SecurePassword123!"
    }))
}
