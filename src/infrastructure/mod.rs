//! Infrastructure layer - Registry implementations, services and logging

pub mod logging;
pub mod user;
