use crate::frame::{Protocol, VersionString};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Key event dictionary: the decoded JSON body of one framed event.
pub type Ked = Map<String, Value>;

/// One decoded protocol message.
///
/// The attachment that trails the body in the stream is counted, never
/// decoded. The serialized form (`{"KED": {...}, "AttachBytes": n}`) is the
/// interchange format for already-parsed event lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Decoded body.
    #[serde(rename = "KED")]
    pub ked: Ked,
    /// Attachment length in bytes.
    #[serde(rename = "AttachBytes", default)]
    pub attachment_len: usize,
}

impl Event {
    /// Creates an event from a decoded body and its attachment length.
    pub fn new(ked: Ked, attachment_len: usize) -> Self {
        Self {
            ked,
            attachment_len,
        }
    }

    /// Raw `v` field, if present and a string.
    pub fn version_field(&self) -> Option<&str> {
        self.ked.get("v").and_then(Value::as_str)
    }

    /// Strictly decoded version string.
    pub fn version_string(&self) -> Option<VersionString> {
        self.version_field()
            .and_then(|v| VersionString::parse(v).ok())
    }

    /// Protocol inferred from the `v` field prefix.
    pub fn protocol(&self) -> Option<Protocol> {
        protocol_of(&self.ked)
    }

    /// Returns true for ACDC credential bodies.
    pub fn is_credential(&self) -> bool {
        self.protocol() == Some(Protocol::Acdc)
    }

    /// Message type (`t`), e.g. `icp`, `rot`, `iss`.
    pub fn ilk(&self) -> Option<&Value> {
        self.ked.get("t")
    }

    /// Sequence identifier (`s`).
    pub fn sequence(&self) -> Option<&Value> {
        self.ked.get("s")
    }
}

/// Protocol of a decoded body, taken from the prefix of its `v` field.
pub fn protocol_of(ked: &Ked) -> Option<Protocol> {
    ked.get("v")
        .and_then(Value::as_str)
        .and_then(Protocol::from_version_field)
}

/// Renders a field for human output: strings unquoted, other values as JSON,
/// missing values as `?`.
pub fn display_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "?".to_string(),
    }
}
