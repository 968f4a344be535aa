//! Validate commands: credentials from a raw stream or from parsed events.

use crate::input::InputArgs;
use cesr_credentials::{validate_batch, DirSchemaStore, Validator, DEFAULT_SCHEMA_VERSIONS};
use cesr_stream::Event;
use clap::Args;
use std::path::PathBuf;
use tracing::info;

/// Schema store selection.
#[derive(Args, Debug)]
pub struct SchemaArgs {
    /// Directory holding one subdirectory per schema version
    #[arg(long, env = "CESR_SCHEMA_DIR", default_value = "schema/acdc")]
    pub schema_dir: PathBuf,
    /// Schema version to try, repeatable, in preference order (default: 2023, 2022)
    #[arg(long = "schema-version", value_name = "VERSION")]
    pub schema_versions: Vec<String>,
}

impl SchemaArgs {
    fn validator(&self) -> Validator {
        let store = DirSchemaStore::new(&self.schema_dir);
        if self.schema_versions.is_empty() {
            Validator::with_versions(store, DEFAULT_SCHEMA_VERSIONS.iter().copied())
        } else {
            Validator::with_versions(store, self.schema_versions.iter().cloned())
        }
    }
}

/// Parses a CESR stream and validates its credentials.
pub fn run(input: &InputArgs, schemas: &SchemaArgs) -> Result<(), Box<dyn std::error::Error>> {
    let content = input.read()?;
    let events = cesr_stream::parse(&content)?;
    validate(&events, schemas)
}

/// Validates a JSON array of already-parsed events.
pub fn run_parsed(
    input: &InputArgs,
    schemas: &SchemaArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let content = input.read()?;
    let events: Vec<Event> = serde_json::from_str(&content)
        .map_err(|e| format!("failed to unmarshal events JSON: {}", e))?;
    validate(&events, schemas)
}

fn validate(events: &[Event], schemas: &SchemaArgs) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        schema_dir = %schemas.schema_dir.display(),
        events = events.len(),
        "validating credentials"
    );
    let mut validator = schemas.validator();
    let accepted = validate_batch(&mut validator, events).into_result()?;
    println!("✅ {} credential bodies valid", accepted);
    Ok(())
}
