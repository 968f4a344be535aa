use std::fmt;

/// Schema-spec versions tried by default, newest first.
pub const DEFAULT_SCHEMA_VERSIONS: &[&str] = &["2023", "2022"];

/// Credential families with a schema in the catalog.
///
/// Each variant maps to exactly one schema filename; the same filename is
/// looked up in every schema version directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CredentialKind {
    /// Engagement context role authorization (ECR AUTH).
    EcrAuthorization,
    /// Legal entity engagement context role credential (ECR).
    EngagementContextRole,
    /// Official organizational role authorization (OOR AUTH).
    OorAuthorization,
    /// Legal entity official organizational role credential (OOR).
    OfficialOrganizationalRole,
    /// Legal entity vLEI credential.
    LegalEntity,
    /// Qualified vLEI issuer credential (QVI).
    QualifiedVleiIssuer,
    /// Verifiable iXBRL report attestation.
    IxbrlReportAttestation,
}

impl CredentialKind {
    /// Every catalog entry.
    pub const ALL: [CredentialKind; 7] = [
        CredentialKind::EcrAuthorization,
        CredentialKind::EngagementContextRole,
        CredentialKind::OorAuthorization,
        CredentialKind::OfficialOrganizationalRole,
        CredentialKind::LegalEntity,
        CredentialKind::QualifiedVleiIssuer,
        CredentialKind::IxbrlReportAttestation,
    ];

    /// Schema filename inside a version directory.
    pub fn file_name(self) -> &'static str {
        match self {
            CredentialKind::EcrAuthorization => "ecr-authorization-vlei-credential.json",
            CredentialKind::EngagementContextRole => {
                "legal-entity-engagement-context-role-vLEI-credential.json"
            }
            CredentialKind::OorAuthorization => "oor-authorization-vlei-credential.json",
            CredentialKind::OfficialOrganizationalRole => {
                "legal-entity-official-organizational-role-vLEI-credential.json"
            }
            CredentialKind::LegalEntity => "legal-entity-vLEI-credential.json",
            CredentialKind::QualifiedVleiIssuer => "qualified-vLEI-issuer-vLEI-credential.json",
            CredentialKind::IxbrlReportAttestation => "verifiable-ixbrl-report-attestation.json",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.file_name())
    }
}
