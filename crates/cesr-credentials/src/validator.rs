//! Multi-version credential validator.

use crate::catalog::{CredentialKind, DEFAULT_SCHEMA_VERSIONS};
use crate::classify::classify;
use crate::errors::{schema_uri, AttemptFailure, CredentialError, SchemaAttempt};
use crate::store::SchemaStore;
use cesr_stream::{protocol_of, Event, Ked, Protocol};
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

type SchemaCache = HashMap<(String, CredentialKind), jsonschema::Validator>;

/// Successful result of validating one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event is not an ACDC body and was not validated.
    NotCredential,
    /// A schema version accepted the credential.
    Accepted {
        /// Classified credential family.
        kind: CredentialKind,
        /// Version whose schema accepted the credential.
        version: String,
        /// Failures recorded for newer versions before acceptance.
        attempts: Vec<SchemaAttempt>,
    },
}

impl Outcome {
    /// Returns true if a schema accepted the credential.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }
}

/// Validates ACDC credential bodies against versioned schemas.
///
/// Versions are tried in the order given at construction (newest first by
/// default) and the first schema that accepts a credential ends the search.
/// Compiled schemas are cached per `(version, file)` for the lifetime of the
/// validator and never evicted.
///
/// Validation takes `&mut self` because it fills the cache. To share one
/// validator between threads, wrap it in a `Mutex`; otherwise build one
/// validator per worker.
///
/// # Example
///
/// ```rust
/// use cesr_credentials::{CredentialKind, MemorySchemaStore, Outcome, Validator};
/// use serde_json::json;
///
/// let store = MemorySchemaStore::new().with_schema(
///     "2023",
///     CredentialKind::QualifiedVleiIssuer.file_name(),
///     r#"{"type": "object", "required": ["a"]}"#,
/// );
/// let mut validator = Validator::new(store);
///
/// let credential = json!({"v": "ACDC10JSON000100_", "a": {"LEI": "5493001KJTIIGC8Y1R17"}});
/// let outcome = validator.validate_credential(credential.as_object().unwrap())?;
/// assert!(outcome.is_accepted());
/// # Ok::<(), cesr_credentials::CredentialError>(())
/// ```
pub struct Validator {
    store: Box<dyn SchemaStore>,
    versions: Vec<String>,
    compiled: SchemaCache,
}

impl Validator {
    /// Creates a validator over the default versions (`2023`, then `2022`).
    pub fn new(store: impl SchemaStore + 'static) -> Self {
        Self::with_versions(store, DEFAULT_SCHEMA_VERSIONS.iter().copied())
    }

    /// Creates a validator trying `versions` in the given order.
    ///
    /// Versions the store does not contain are dropped here and never
    /// consulted again.
    pub fn with_versions<I, V>(store: impl SchemaStore + 'static, versions: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let versions: Vec<String> = versions
            .into_iter()
            .map(Into::into)
            .filter(|version| store.has_version(version))
            .collect();

        if versions.is_empty() {
            warn!("no schema version directories found");
        } else {
            debug!(?versions, "schema versions");
        }

        Self {
            store: Box::new(store),
            versions,
            compiled: HashMap::new(),
        }
    }

    /// Versions in preference order.
    pub fn versions(&self) -> &[String] {
        &self.versions
    }

    /// Number of compiled schemas held in the cache.
    pub fn cached_schemas(&self) -> usize {
        self.compiled.len()
    }

    /// Validates the body of a decoded event.
    pub fn validate_event(&mut self, event: &Event) -> Result<Outcome, CredentialError> {
        self.validate_credential(&event.ked)
    }

    /// Validates one body.
    ///
    /// Non-ACDC bodies succeed with [`Outcome::NotCredential`]. For
    /// credentials, each version is tried in order:
    /// - a version without the schema file is skipped and not recorded
    /// - a schema that fails to compile is recorded and the next version tried
    /// - a schema that rejects the credential is recorded and the next version tried
    /// - the first schema that accepts ends the search
    ///
    /// # Errors
    ///
    /// - [`CredentialError::NoSchemaVersions`] if no version was found at construction
    /// - [`CredentialError::MissingAttributes`] or
    ///   [`CredentialError::UnrecognizedCredentialType`] from classification
    /// - [`CredentialError::SchemaNotFound`] if no version has the schema file
    /// - [`CredentialError::Rejected`] with every recorded attempt otherwise
    pub fn validate_credential(&mut self, ked: &Ked) -> Result<Outcome, CredentialError> {
        if protocol_of(ked) != Some(Protocol::Acdc) {
            return Ok(Outcome::NotCredential);
        }
        if self.versions.is_empty() {
            return Err(CredentialError::NoSchemaVersions);
        }

        let kind = classify(ked)?;
        let instance = Value::Object(ked.clone());
        let mut attempts = Vec::new();

        for version in &self.versions {
            let schema = match load_schema(&*self.store, &mut self.compiled, version, kind) {
                Ok(Some(schema)) => schema,
                Ok(None) => {
                    trace!(uri = %schema_uri(version, kind), "schema not in version, skipping");
                    continue;
                }
                Err(failure) => {
                    attempts.push(SchemaAttempt {
                        version: version.clone(),
                        kind,
                        failure,
                    });
                    continue;
                }
            };

            let messages: Vec<String> = schema
                .iter_errors(&instance)
                .map(|error| error.to_string())
                .collect();
            if messages.is_empty() {
                debug!(uri = %schema_uri(version, kind), "credential accepted");
                return Ok(Outcome::Accepted {
                    kind,
                    version: version.clone(),
                    attempts,
                });
            }

            trace!(uri = %schema_uri(version, kind), errors = messages.len(), "credential rejected");
            attempts.push(SchemaAttempt {
                version: version.clone(),
                kind,
                failure: AttemptFailure::Rejected(messages.join("; ")),
            });
        }

        if attempts.is_empty() {
            Err(CredentialError::SchemaNotFound { kind })
        } else {
            Err(CredentialError::Rejected { kind, attempts })
        }
    }
}

/// Returns the compiled schema for `(version, kind)`, compiling on first use.
///
/// `Ok(None)` means the version has no such file. Compile failures are not
/// cached.
fn load_schema<'c>(
    store: &dyn SchemaStore,
    compiled: &'c mut SchemaCache,
    version: &str,
    kind: CredentialKind,
) -> Result<Option<&'c jsonschema::Validator>, AttemptFailure> {
    match compiled.entry((version.to_string(), kind)) {
        Entry::Occupied(entry) => Ok(Some(entry.into_mut())),
        Entry::Vacant(entry) => {
            let bytes = match store.read_schema(version, kind.file_name()) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => return Ok(None),
                Err(e) => return Err(AttemptFailure::Compile(e.to_string())),
            };
            let document: Value = serde_json::from_slice(&bytes)
                .map_err(|e| AttemptFailure::Compile(e.to_string()))?;
            let validator = jsonschema::options()
                .build(&document)
                .map_err(|e| AttemptFailure::Compile(e.to_string()))?;
            debug!(uri = %schema_uri(version, kind), "compiled schema");
            Ok(Some(entry.insert(validator)))
        }
    }
}
