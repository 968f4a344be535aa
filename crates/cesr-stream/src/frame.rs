use crate::errors::StreamError;
use regex::bytes::Regex;
use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

/// Literal that opens every framed JSON body: `{"v":"`.
pub const BODY_PREFIX: &str = "{\"v\":\"";

/// Version string width in bytes: 17.
pub const VERSION_STRING_SIZE: usize = 17;

/// Byte range of the hex size field within the version string.
pub const SIZE_FIELD: Range<usize> = 10..16;

/// Version string terminator.
pub const TERMINATOR: u8 = b'_';

fn header_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let pattern = format!(
            "{}((?:KERI|ACDC)[0-9]{{2}}[A-Z]{{4}}[0-9A-F]{{6}}_)",
            regex::escape(BODY_PREFIX)
        );
        Regex::new(&pattern).expect("header pattern is a valid regex")
    })
}

/// Protocol tag carried in the first four characters of a version string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// Key event (KEL) messages.
    Keri,
    /// Authentic chained data container, i.e. a verifiable credential.
    Acdc,
}

impl Protocol {
    /// Returns the four-character tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::Keri => "KERI",
            Protocol::Acdc => "ACDC",
        }
    }

    /// Parses an exact four-byte tag.
    pub fn from_tag(tag: &[u8]) -> Option<Self> {
        match tag {
            b"KERI" => Some(Protocol::Keri),
            b"ACDC" => Some(Protocol::Acdc),
            _ => None,
        }
    }

    /// Detects the protocol from the start of a `v` field value.
    ///
    /// Only the prefix is inspected, so loosely formed values such as
    /// `ACDC/1.0` still classify as credentials.
    pub fn from_version_field(value: &str) -> Option<Self> {
        value.as_bytes().get(..4).and_then(Self::from_tag)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decoded 17-character version string, e.g. `KERI10JSON000249_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionString {
    /// Protocol tag.
    pub protocol: Protocol,
    /// Major version digit (`1` in `KERI10...`).
    pub major: u8,
    /// Minor version digit (`0` in `KERI10...`).
    pub minor: u8,
    /// Serialization kind, four uppercase ASCII letters (e.g. `JSON`).
    pub kind: String,
    /// Total body length in bytes, measured from the body's opening brace.
    pub size: usize,
}

impl VersionString {
    /// Parses a stand-alone version string.
    pub fn parse(value: &str) -> Result<Self, StreamError> {
        Self::from_bytes(value.as_bytes())
    }

    /// Parses a version string from exactly [`VERSION_STRING_SIZE`] bytes.
    ///
    /// Every field is checked at its fixed offset.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, StreamError> {
        if bytes.len() != VERSION_STRING_SIZE {
            return Err(StreamError::Header(format!(
                "expected {} bytes, got {}",
                VERSION_STRING_SIZE,
                bytes.len()
            )));
        }

        let protocol = Protocol::from_tag(&bytes[0..4]).ok_or_else(|| {
            StreamError::Header(format!(
                "unknown protocol tag {:?}",
                String::from_utf8_lossy(&bytes[0..4])
            ))
        })?;

        if !bytes[4..6].iter().all(u8::is_ascii_digit) {
            return Err(StreamError::Header(format!(
                "version digits {:?} are not decimal",
                String::from_utf8_lossy(&bytes[4..6])
            )));
        }
        let major = bytes[4] - b'0';
        let minor = bytes[5] - b'0';

        if !bytes[6..10].iter().all(u8::is_ascii_uppercase) {
            return Err(StreamError::Header(format!(
                "serialization kind {:?} is not four uppercase letters",
                String::from_utf8_lossy(&bytes[6..10])
            )));
        }
        // All four bytes are ASCII, checked above.
        let kind = String::from_utf8_lossy(&bytes[6..10]).into_owned();

        let size = parse_size(&bytes[SIZE_FIELD])?;

        if bytes[16] != TERMINATOR {
            return Err(StreamError::Header(format!(
                "terminator is {:?}, expected '_'",
                bytes[16] as char
            )));
        }

        Ok(Self {
            protocol,
            major,
            minor,
            kind,
            size,
        })
    }

    /// Returns true when the protocol tag is `ACDC`.
    pub fn is_credential(&self) -> bool {
        self.protocol == Protocol::Acdc
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{:06X}_",
            self.protocol, self.major, self.minor, self.kind, self.size
        )
    }
}

/// Decodes the six uppercase hex digits of the size field.
fn parse_size(field: &[u8]) -> Result<usize, StreamError> {
    field.iter().try_fold(0usize, |acc, &b| {
        let digit = match b {
            b'0'..=b'9' => b - b'0',
            b'A'..=b'F' => b - b'A' + 10,
            _ => {
                return Err(StreamError::Header(format!(
                    "size field {:?} is not uppercase hex",
                    String::from_utf8_lossy(field)
                )))
            }
        };
        Ok(acc * 16 + usize::from(digit))
    })
}

/// Finds the next framed body at or after `from`.
///
/// Returns the offset of the body's opening brace and its decoded version
/// string. Text that does not match the header grammar is skipped.
pub fn find_header(
    stream: &[u8],
    from: usize,
) -> Result<Option<(usize, VersionString)>, StreamError> {
    let Some(haystack) = stream.get(from..) else {
        return Ok(None);
    };
    let Some(captures) = header_pattern().captures(haystack) else {
        return Ok(None);
    };
    let (Some(whole), Some(version)) = (captures.get(0), captures.get(1)) else {
        return Ok(None);
    };
    let header = VersionString::from_bytes(version.as_bytes())?;
    Ok(Some((from + whole.start(), header)))
}

/// Byte boundaries of one framed event within a stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Version string found at the start of the body.
    pub header: VersionString,
    /// Body span, `[brace, brace + header.size)`.
    pub body: Range<usize>,
    /// Attachment span from body end to the next header or stream end.
    pub attachment: Range<usize>,
}

impl Frame {
    /// Attachment length in bytes.
    pub fn attachment_len(&self) -> usize {
        self.attachment.len()
    }
}
