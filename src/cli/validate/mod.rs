//! Validate command - checks JSON documents against a user schema

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::domain::user::{FieldError, UsernameRegistry};
use crate::infrastructure::logging;
use crate::infrastructure::user::{
    InMemoryUsernameRegistry, SchemaKind, SchemaServiceError, UserSchemaService,
};

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Record variant to validate against
    #[arg(short, long, value_enum)]
    pub schema: SchemaKind,

    /// JSON file to read, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: PathBuf,

    /// Pretty-print each report
    #[arg(long)]
    pub pretty: bool,
}

/// Outcome of validating one document
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DocumentReport {
    Valid { index: usize, record: Value },
    Invalid { index: usize, errors: Vec<FieldError> },
    Malformed { index: usize, message: String },
}

impl DocumentReport {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }
}

/// Run the validate command
pub fn run(args: ValidateArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let registry = InMemoryUsernameRegistry::with_usernames(
        config.registry.reserved_usernames.iter().cloned(),
    );
    let service = UserSchemaService::new(Arc::new(registry));

    let input = read_input(&args.input)?;
    let documents = parse_documents(&input)?;
    info!(schema = %args.schema, documents = documents.len(), "Validating documents");

    let reports = validate_documents(&service, args.schema, &documents);

    for report in &reports {
        let line = if args.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        println!("{}", line);
    }

    let rejected = reports.iter().filter(|r| !r.is_valid()).count();

    if rejected > 0 {
        warn!(rejected, total = reports.len(), "Validation finished with failures");
        anyhow::bail!(
            "{} of {} document(s) failed {} validation",
            rejected,
            reports.len(),
            args.schema
        );
    }

    Ok(())
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        let mut input = String::new();
        std::io::stdin()
            .read_to_string(&mut input)
            .context("Failed to read stdin")?;
        return Ok(input);
    }

    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

/// Parse the input as one document or an array of documents
pub fn parse_documents(input: &str) -> anyhow::Result<Vec<Value>> {
    let value: Value = serde_json::from_str(input).context("Input is not valid JSON")?;

    Ok(match value {
        Value::Array(documents) => documents,
        document => vec![document],
    })
}

/// Validate documents in order; they share the service's username registry
pub fn validate_documents<R: UsernameRegistry>(
    service: &UserSchemaService<R>,
    kind: SchemaKind,
    documents: &[Value],
) -> Vec<DocumentReport> {
    documents
        .iter()
        .enumerate()
        .map(|(index, document)| match service.validate(kind, document) {
            Ok(record) => DocumentReport::Valid { index, record },
            Err(SchemaServiceError::Validation(errors)) => DocumentReport::Invalid {
                index,
                errors: errors.into_errors(),
            },
            Err(e) => DocumentReport::Malformed {
                index,
                message: e.to_string(),
            },
        })
        .collect()
}
