//! CLI module for user schemas
//!
//! Provides subcommands for working with user documents:
//! - `validate`: check JSON documents against a user record variant

pub mod validate;

use clap::{Parser, Subcommand};

/// User schemas - validate user account documents
#[derive(Parser)]
#[command(name = "user-schemas")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate one document, or an array of documents, against a schema
    Validate(validate::ValidateArgs),
}
