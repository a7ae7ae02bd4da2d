//! Domain layer - User records and their validation rules

pub mod user;

pub use user::{
    FieldError, Fields, Link, LoginRequest, Patch, UserBase, UserCreate, UserListResponse,
    UserResponse, UserUpdate, UserValidationError, UsernameRegistry, ValidationErrors,
};
