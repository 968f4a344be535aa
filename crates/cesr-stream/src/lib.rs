//! Framing parser for CESR streams carrying KERI and ACDC events.
//!
//! This crate provides:
//! - Version string decoding (`KERI10JSON000249_` and friends)
//! - A strict reader that splits a concatenated stream into JSON bodies and
//!   counts the opaque attachment bytes that follow each body
//! - The [`Event`] type shared with credential validation
//!
//! ## Quick Start
//!
//! ```rust
//! use cesr_stream::parse;
//!
//! let stream = r#"{"v":"KERI10JSON00002B_","t":"icp","s":"0"}-AAB"#;
//! let events = parse(stream)?;
//! assert_eq!(events.len(), 1);
//! assert_eq!(events[0].ked["t"], "icp");
//! assert_eq!(events[0].attachment_len, 4);
//! # Ok::<(), cesr_stream::StreamError>(())
//! ```
//!
//! ## Framing
//!
//! Every body starts with `{"v":"` followed by a 17-character version string.
//! Its six hex digits give the body length in bytes, counted from the opening
//! brace. That length is the only boundary marker: the attachment runs from
//! the body end to the next header or to the end of the stream.

#![deny(missing_docs)]

/// Error types for stream parsing.
pub mod errors;
/// Decoded event type and field helpers.
pub mod event;
/// Version string grammar and frame boundaries.
pub mod frame;
/// Stream reader implementation.
pub mod reader;

pub use errors::StreamError;
pub use event::{display_field, protocol_of, Event, Ked};
pub use frame::{Frame, Protocol, VersionString};
pub use reader::{parse, StreamReader};
