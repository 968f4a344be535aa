//! ACDC credential classification and schema validation.
//!
//! This crate provides:
//! - The fixed catalog of vLEI credential schemas and an ordered rule table
//!   that picks one from a credential's attribute shape
//! - Schema stores that serve `<version>/<file>` documents from disk or memory
//! - A [`Validator`] that tries schema-spec versions newest first, caching
//!   compiled schemas, and aggregates every failed attempt
//! - Batch validation over events parsed by `cesr-stream`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cesr_credentials::{validate_batch, DirSchemaStore, Validator};
//!
//! let stream = std::fs::read_to_string("credentials.cesr")?;
//! let events = cesr_stream::parse(&stream)?;
//!
//! let mut validator = Validator::new(DirSchemaStore::new("schema/acdc"));
//! let accepted = validate_batch(&mut validator, &events).into_result()?;
//! println!("{accepted} credential bodies valid");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![deny(missing_docs)]

/// Batch validation and reporting.
pub mod batch;
/// Credential families and their schema filenames.
pub mod catalog;
/// Attribute-shape classification.
pub mod classify;
/// Error types for classification and validation.
pub mod errors;
/// Schema store trait and implementations.
pub mod store;
/// Multi-version validator with compiled-schema cache.
pub mod validator;

pub use batch::{validate_batch, BatchError, BatchReport, EventFailure};
pub use catalog::{CredentialKind, DEFAULT_SCHEMA_VERSIONS};
pub use classify::{classify, Rule, RULES};
pub use errors::{AttemptFailure, CredentialError, SchemaAttempt, StoreError};
pub use store::{DirSchemaStore, MemorySchemaStore, SchemaStore};
pub use validator::{Outcome, Validator};
