use thiserror::Error;

/// Errors that can occur while framing or decoding a CESR stream.
///
/// Any of these aborts the whole parse; callers never receive a partial
/// event list alongside an error.
#[derive(Error, Debug)]
pub enum StreamError {
    /// Malformed version string (protocol, version digits, kind, size, or terminator).
    #[error("invalid version string: {0}")]
    Header(String),
    /// The header declares more body bytes than remain in the stream.
    #[error("truncated body at offset {offset}: header declares {declared} bytes, {available} available")]
    TruncatedBody {
        /// Byte offset of the body's opening brace.
        offset: usize,
        /// Body length declared by the version string.
        declared: usize,
        /// Bytes remaining from `offset` to the end of the stream.
        available: usize,
    },
    /// The framed body is not a syntactically valid JSON object.
    #[error("invalid JSON body at offset {offset}: {source}")]
    Decode {
        /// Byte offset of the body's opening brace.
        offset: usize,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
}
