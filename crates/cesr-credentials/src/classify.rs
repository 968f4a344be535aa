//! Credential classification by attribute shape.
//!
//! Rules overlap on purpose: a role credential that also names an `AID` is
//! an authorization credential, so the combined rules sit above the
//! single-key rules. [`RULES`] is evaluated top to bottom and the first
//! match wins.

use crate::catalog::CredentialKind;
use crate::errors::CredentialError;
use cesr_stream::Ked;
use serde_json::{Map, Value};

/// Attribute map field.
pub const ATTRIBUTES_FIELD: &str = "a";
/// Edge (chained credential) section field.
pub const EDGES_FIELD: &str = "e";

/// One entry of the classification table.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Attribute keys that must all be present.
    pub attributes: &'static [&'static str],
    /// Whether the credential must also carry an edge section.
    pub requires_edges: bool,
    /// Result when the rule matches.
    pub kind: CredentialKind,
}

impl Rule {
    const fn new(attributes: &'static [&'static str], kind: CredentialKind) -> Self {
        Self {
            attributes,
            requires_edges: false,
            kind,
        }
    }

    const fn with_edges(attributes: &'static [&'static str], kind: CredentialKind) -> Self {
        Self {
            attributes,
            requires_edges: true,
            kind,
        }
    }

    fn matches(&self, ked: &Ked, attributes: &Map<String, Value>) -> bool {
        self.attributes.iter().all(|key| present(attributes, key))
            && (!self.requires_edges || present(ked, EDGES_FIELD))
    }
}

/// Classification table in priority order.
pub const RULES: &[Rule] = &[
    Rule::new(
        &["engagementContextRole", "AID"],
        CredentialKind::EcrAuthorization,
    ),
    Rule::new(
        &["engagementContextRole"],
        CredentialKind::EngagementContextRole,
    ),
    Rule::new(&["officialRole", "AID"], CredentialKind::OorAuthorization),
    Rule::new(&["officialRole"], CredentialKind::OfficialOrganizationalRole),
    Rule::with_edges(&["LEI"], CredentialKind::LegalEntity),
    Rule::new(&["LEI"], CredentialKind::QualifiedVleiIssuer),
    Rule::new(&["f"], CredentialKind::IxbrlReportAttestation),
];

/// A key counts as present when it exists with a non-null value.
fn present(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).is_some_and(|v| !v.is_null())
}

/// Picks the schema for a credential body.
///
/// # Errors
///
/// - [`CredentialError::MissingAttributes`] if `a` is absent or not an object
/// - [`CredentialError::UnrecognizedCredentialType`] if no rule matches
pub fn classify(ked: &Ked) -> Result<CredentialKind, CredentialError> {
    let attributes = ked
        .get(ATTRIBUTES_FIELD)
        .and_then(Value::as_object)
        .ok_or(CredentialError::MissingAttributes)?;

    RULES
        .iter()
        .find(|rule| rule.matches(ked, attributes))
        .map(|rule| rule.kind)
        .ok_or(CredentialError::UnrecognizedCredentialType)
}
