use crate::catalog::CredentialKind;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a schema store.
///
/// A missing schema is not an error; stores report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The schema exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Location that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Why one schema version did not accept a credential.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptFailure {
    /// The schema file exists but is unreadable, not JSON, or not a valid schema.
    #[error("compile error: {0}")]
    Compile(String),
    /// The schema compiled and rejected the credential.
    #[error("validation error: {0}")]
    Rejected(String),
}

/// A recorded failure for one schema version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaAttempt {
    /// Schema-spec version identifier.
    pub version: String,
    /// Schema that was tried.
    pub kind: CredentialKind,
    /// What went wrong.
    pub failure: AttemptFailure,
}

impl SchemaAttempt {
    /// Identifier of the tried schema, `acdc-schema:///<version>/<file>`.
    pub fn uri(&self) -> String {
        schema_uri(&self.version, self.kind)
    }
}

impl fmt::Display for SchemaAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.uri(), self.failure)
    }
}

/// Builds the identifier used for a schema in messages and logs.
pub fn schema_uri(version: &str, kind: CredentialKind) -> String {
    format!("acdc-schema:///{}/{}", version, kind.file_name())
}

/// Errors from classifying or validating one credential.
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The credential has no `a` attribute map.
    #[error("missing \"a\" section")]
    MissingAttributes,
    /// No classification rule matched the attribute shape.
    #[error("unrecognised credential type")]
    UnrecognizedCredentialType,
    /// The validator was built without any schema version directory.
    #[error("no schema versions available for validation")]
    NoSchemaVersions,
    /// No configured version contains the classified schema file.
    #[error("no schema version provides {kind}")]
    SchemaNotFound {
        /// Classified credential family.
        kind: CredentialKind,
    },
    /// Every version that provided the schema failed; attempts in preference order.
    #[error("no schema accepted credential; tried:\n  {}", join_attempts(.attempts))]
    Rejected {
        /// Classified credential family.
        kind: CredentialKind,
        /// One entry per recorded attempt.
        attempts: Vec<SchemaAttempt>,
    },
}

fn join_attempts(attempts: &[SchemaAttempt]) -> String {
    attempts
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n  ")
}
