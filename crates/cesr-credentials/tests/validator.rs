use cesr_credentials::{
    validate_batch, AttemptFailure, CredentialError, CredentialKind, DirSchemaStore,
    MemorySchemaStore, Outcome, SchemaStore, StoreError, Validator,
};
use cesr_stream::{Event, Ked};
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const LEGAL_ENTITY_SCHEMA: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "title": "Legal Entity vLEI Credential",
  "type": "object",
  "required": ["v", "a", "e"],
  "properties": {
    "v": { "type": "string" },
    "a": {
      "type": "object",
      "required": ["LEI"],
      "properties": { "LEI": { "type": "string" } },
      "additionalProperties": false
    },
    "e": { "type": "object" }
  },
  "additionalProperties": false
}"#;

/// Newer revision: attributes must also carry an issuance date.
const LEGAL_ENTITY_SCHEMA_2023: &str = r#"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "type": "object",
  "required": ["v", "a", "e"],
  "properties": {
    "a": {
      "type": "object",
      "required": ["LEI", "dt"],
      "properties": {
        "LEI": { "type": "string" },
        "dt": { "type": "string" }
      }
    }
  }
}"#;

fn ked(value: Value) -> Ked {
    value.as_object().cloned().unwrap()
}

fn legal_entity() -> Ked {
    ked(json!({
        "v": "ACDC10JSON000197_",
        "a": { "LEI": "5493001KJTIIGC8Y1R17" },
        "e": { "qvi": { "n": "EBfdlu8R27Fbx-ehrqwImnK-8Cm79sqbAQ4MmvEAYqao" } }
    }))
}

fn write_schema(root: &Path, version: &str, kind: CredentialKind, content: &str) {
    let dir = root.join(version);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(kind.file_name()), content).unwrap();
}

#[test]
fn test_valid_credential_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );

    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));
    let outcome = validator.validate_credential(&legal_entity()).unwrap();
    assert_eq!(
        outcome,
        Outcome::Accepted {
            kind: CredentialKind::LegalEntity,
            version: "2023".into(),
            attempts: vec![],
        }
    );
}

#[test]
fn test_non_acdc_is_ignored() {
    let temp_dir = TempDir::new().unwrap();
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));
    let outcome = validator
        .validate_credential(&ked(json!({"v": "KERI100000_", "a": {"LEI": "xyz"}})))
        .unwrap();
    assert_eq!(outcome, Outcome::NotCredential);
}

#[test]
fn test_unrecognized_credential_type() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));
    let err = validator
        .validate_credential(&ked(json!({"v": "ACDC/1.0", "a": {"unknownField": true}})))
        .unwrap_err();
    assert!(matches!(err, CredentialError::UnrecognizedCredentialType));
    assert!(err.to_string().contains("unrecognised credential type"));
}

#[test]
fn test_schema_compile_error_is_recorded() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::LegalEntity,
        "{ invalid json ",
    );
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));

    let err = validator.validate_credential(&legal_entity()).unwrap_err();
    match &err {
        CredentialError::Rejected { kind, attempts } => {
            assert_eq!(*kind, CredentialKind::LegalEntity);
            assert_eq!(attempts.len(), 1);
            assert_eq!(attempts[0].version, "2023");
            assert!(matches!(attempts[0].failure, AttemptFailure::Compile(_)));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
    assert!(err.to_string().contains("compile error"));
    assert!(err
        .to_string()
        .contains("acdc-schema:///2023/legal-entity-vLEI-credential.json"));
}

#[test]
fn test_older_version_accepts_legacy_credential() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA_2023,
    );
    write_schema(
        temp_dir.path(),
        "2022",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));

    match validator.validate_credential(&legal_entity()).unwrap() {
        Outcome::Accepted {
            kind,
            version,
            attempts,
        } => {
            assert_eq!(kind, CredentialKind::LegalEntity);
            assert_eq!(version, "2022");
            assert_eq!(attempts.len(), 1);
            assert_eq!(attempts[0].version, "2023");
            assert!(matches!(&attempts[0].failure, AttemptFailure::Rejected(m) if m.contains("dt")));
        }
        other => panic!("expected acceptance, got {other:?}"),
    }
}

#[test]
fn test_all_versions_reject() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA_2023,
    );
    write_schema(
        temp_dir.path(),
        "2022",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));

    let mut credential = legal_entity();
    credential["a"]["extra"] = json!("not allowed in 2022");

    match validator.validate_credential(&credential).unwrap_err() {
        CredentialError::Rejected { attempts, .. } => {
            let versions: Vec<_> = attempts.iter().map(|a| a.version.as_str()).collect();
            assert_eq!(versions, ["2023", "2022"]);
            assert!(attempts
                .iter()
                .all(|a| matches!(a.failure, AttemptFailure::Rejected(_))));
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[test]
fn test_missing_schema_files_are_skipped() {
    let temp_dir = TempDir::new().unwrap();
    // 2023 exists but lacks the legal entity schema.
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::QualifiedVleiIssuer,
        LEGAL_ENTITY_SCHEMA,
    );
    write_schema(
        temp_dir.path(),
        "2022",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));

    match validator.validate_credential(&legal_entity()).unwrap() {
        Outcome::Accepted {
            version, attempts, ..
        } => {
            assert_eq!(version, "2022");
            assert!(attempts.is_empty());
        }
        other => panic!("expected acceptance, got {other:?}"),
    }
}

#[test]
fn test_no_version_provides_schema() {
    let temp_dir = TempDir::new().unwrap();
    fs::create_dir_all(temp_dir.path().join("2023")).unwrap();
    fs::create_dir_all(temp_dir.path().join("2022")).unwrap();
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));

    let err = validator.validate_credential(&legal_entity()).unwrap_err();
    assert!(matches!(
        err,
        CredentialError::SchemaNotFound {
            kind: CredentialKind::LegalEntity
        }
    ));
}

#[test]
fn test_no_schema_versions() {
    let temp_dir = TempDir::new().unwrap();
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));
    assert!(validator.versions().is_empty());

    for credential in [
        legal_entity(),
        ked(json!({"v": "ACDC10JSON000010_", "a": {"unknownField": true}})),
        ked(json!({"v": "ACDC10JSON000010_"})),
    ] {
        let err = validator.validate_credential(&credential).unwrap_err();
        assert!(matches!(err, CredentialError::NoSchemaVersions));
    }
}

#[test]
fn test_missing_attributes() {
    let store = MemorySchemaStore::new().with_schema(
        "2023",
        CredentialKind::LegalEntity.file_name(),
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(store);
    let err = validator
        .validate_credential(&ked(json!({"v": "ACDC10JSON000010_", "e": {}})))
        .unwrap_err();
    assert!(matches!(err, CredentialError::MissingAttributes));
}

#[test]
fn test_custom_version_order() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );
    write_schema(
        temp_dir.path(),
        "2022",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::with_versions(
        DirSchemaStore::new(temp_dir.path()),
        ["2022", "2024", "2023"],
    );
    assert_eq!(validator.versions(), ["2022".to_string(), "2023".to_string()]);

    match validator.validate_credential(&legal_entity()).unwrap() {
        Outcome::Accepted { version, .. } => assert_eq!(version, "2022"),
        other => panic!("expected acceptance, got {other:?}"),
    }
}

#[test]
fn test_compiled_schema_survives_file_removal() {
    let temp_dir = TempDir::new().unwrap();
    write_schema(
        temp_dir.path(),
        "2023",
        CredentialKind::LegalEntity,
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(DirSchemaStore::new(temp_dir.path()));
    validator.validate_credential(&legal_entity()).unwrap();

    fs::remove_file(
        temp_dir
            .path()
            .join("2023")
            .join(CredentialKind::LegalEntity.file_name()),
    )
    .unwrap();

    assert!(validator
        .validate_credential(&legal_entity())
        .unwrap()
        .is_accepted());
    assert_eq!(validator.cached_schemas(), 1);
}

/// Store that records every schema read.
struct RecordingStore {
    inner: MemorySchemaStore,
    reads: Arc<Mutex<Vec<String>>>,
}

impl SchemaStore for RecordingStore {
    fn has_version(&self, version: &str) -> bool {
        self.inner.has_version(version)
    }

    fn read_schema(&self, version: &str, file: &str) -> Result<Option<Vec<u8>>, StoreError> {
        self.reads.lock().unwrap().push(format!("{version}/{file}"));
        self.inner.read_schema(version, file)
    }
}

#[test]
fn test_resolution_stops_at_first_acceptance() {
    let reads = Arc::new(Mutex::new(Vec::new()));
    let inner = MemorySchemaStore::new()
        .with_schema(
            "2023",
            CredentialKind::LegalEntity.file_name(),
            LEGAL_ENTITY_SCHEMA,
        )
        .with_schema("2022", CredentialKind::LegalEntity.file_name(), "{ broken");
    let mut validator = Validator::new(RecordingStore {
        inner,
        reads: Arc::clone(&reads),
    });

    assert!(validator
        .validate_credential(&legal_entity())
        .unwrap()
        .is_accepted());
    assert_eq!(
        *reads.lock().unwrap(),
        ["2023/legal-entity-vLEI-credential.json".to_string()]
    );
}

#[test]
fn test_batch_collects_every_failure() {
    let store = MemorySchemaStore::new().with_schema(
        "2023",
        CredentialKind::LegalEntity.file_name(),
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(store);

    let events = vec![
        Event::new(ked(json!({"v": "KERI10JSON000100_", "t": "icp", "s": "0"})), 88),
        Event::new(
            ked(json!({"v": "ACDC10JSON000010_", "s": "EOne", "a": {"f": "x"}})),
            0,
        ),
        Event::new(legal_entity(), 0),
        Event::new(ked(json!({"v": "ACDC10JSON000010_", "s": 7})), 0),
        Event::new(legal_entity(), 0),
    ];

    let report = validate_batch(&mut validator, &events);
    assert_eq!(report.accepted, 2);
    assert!(!report.is_success());

    let indexes: Vec<_> = report.failures.iter().map(|f| f.index).collect();
    assert_eq!(indexes, [1, 3]);
    assert!(matches!(
        report.failures[0].error,
        CredentialError::SchemaNotFound { .. }
    ));

    let err = report.into_result().unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("validation errors:\n"));
    assert!(message.contains("event 2 (sn=EOne) ⇒ no schema version provides"));
    assert!(message.contains("event 4 (sn=7) ⇒ missing \"a\" section"));
    assert_eq!(err.accepted, 2);
}

#[test]
fn test_batch_success_counts_credentials_only() {
    let store = MemorySchemaStore::new().with_schema(
        "2023",
        CredentialKind::LegalEntity.file_name(),
        LEGAL_ENTITY_SCHEMA,
    );
    let mut validator = Validator::new(store);
    let events = vec![
        Event::new(ked(json!({"v": "KERI10JSON000100_", "t": "icp"})), 0),
        Event::new(legal_entity(), 12),
    ];

    assert_eq!(validate_batch(&mut validator, &events).into_result().unwrap(), 1);
}

struct UnreadableVersionStore {
    inner: MemorySchemaStore,
    unreadable: &'static str,
}

impl SchemaStore for UnreadableVersionStore {
    fn has_version(&self, version: &str) -> bool {
        self.inner.has_version(version)
    }

    fn read_schema(&self, version: &str, file: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if version == self.unreadable {
            return Err(StoreError::Io {
                path: Path::new(version).join(file),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
            });
        }
        self.inner.read_schema(version, file)
    }
}

#[test]
fn test_unreadable_schema_is_recorded_and_next_version_tried() {
    let mut inner = MemorySchemaStore::new().with_schema(
        "2022",
        CredentialKind::LegalEntity.file_name(),
        LEGAL_ENTITY_SCHEMA,
    );
    inner.add_version("2023");
    let mut validator = Validator::new(UnreadableVersionStore {
        inner,
        unreadable: "2023",
    });
    assert_eq!(validator.versions(), ["2023", "2022"]);

    let outcome = validator.validate_credential(&legal_entity()).unwrap();
    let Outcome::Accepted {
        version, attempts, ..
    } = outcome
    else {
        panic!("expected acceptance by 2022");
    };
    assert_eq!(version, "2022");
    assert_eq!(attempts.len(), 1);
    assert_eq!(attempts[0].version, "2023");
    assert!(matches!(
        &attempts[0].failure,
        AttemptFailure::Compile(message) if message.contains("denied")
    ));
}

#[test]
fn test_remote_reference_is_a_compile_failure() {
    let store = MemorySchemaStore::new().with_schema(
        "2023",
        CredentialKind::LegalEntity.file_name(),
        r#"{"$ref": "https://example.com/x.json"}"#,
    );
    let mut validator = Validator::new(store);

    let err = validator.validate_credential(&legal_entity()).unwrap_err();
    let CredentialError::Rejected { attempts, .. } = err else {
        panic!("expected a recorded rejection");
    };
    assert_eq!(attempts.len(), 1);
    assert!(matches!(attempts[0].failure, AttemptFailure::Compile(_)));
    assert_eq!(validator.cached_schemas(), 0);
}
