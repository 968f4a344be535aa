//! Stream reader: locates frames and decodes their bodies.

use crate::errors::StreamError;
use crate::event::{Event, Ked};
use crate::frame::{find_header, Frame, VersionString};
use tracing::{debug, trace};

/// Sequential reader over an in-memory CESR stream.
///
/// Each call to [`StreamReader::next_frame`] finds the next version string,
/// checks the declared body length against the remaining bytes, and measures
/// the attachment up to the following header. Text before the first header
/// and after the last attachment is not protocol data and is skipped.
///
/// # Example
///
/// ```rust
/// use cesr_stream::StreamReader;
///
/// let stream = r#"{"v":"KERI10JSON00002B_","t":"icp","s":"0"}-AAB"#;
/// let mut reader = StreamReader::new(stream);
/// let event = reader.read_event()?.unwrap();
/// assert_eq!(event.attachment_len, 4);
/// assert!(reader.read_event()?.is_none());
/// # Ok::<(), cesr_stream::StreamError>(())
/// ```
///
/// Reading is strict: after an error the reader is exhausted and returns
/// `Ok(None)`.
pub struct StreamReader<'a> {
    stream: &'a [u8],
    position: usize,
}

impl<'a> StreamReader<'a> {
    /// Creates a reader over text input.
    pub fn new(stream: &'a str) -> Self {
        Self::from_bytes(stream.as_bytes())
    }

    /// Creates a reader over raw bytes.
    pub fn from_bytes(stream: &'a [u8]) -> Self {
        Self {
            stream,
            position: 0,
        }
    }

    /// Returns the current scan offset.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Locates the next frame without decoding its body.
    ///
    /// Returns `Ok(None)` once no further header exists.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::TruncatedBody`] when the declared body extends
    /// past the end of the stream.
    pub fn next_frame(&mut self) -> Result<Option<Frame>, StreamError> {
        let len = self.stream.len();
        if self.position >= len {
            return Ok(None);
        }

        let Some((start, header)) = self.scan(self.position)? else {
            trace!(offset = self.position, "no further header");
            self.position = len;
            return Ok(None);
        };

        let available = len - start;
        if header.size > available {
            self.position = len;
            return Err(StreamError::TruncatedBody {
                offset: start,
                declared: header.size,
                available,
            });
        }
        let body_end = start + header.size;

        // A zero-size body must not find its own header again.
        let attachment_end = match self.scan(body_end.max(start + 1))? {
            Some((next, _)) => next,
            None => len,
        };

        self.position = attachment_end;
        debug!(
            offset = start,
            version = %header,
            attachment = attachment_end - body_end,
            "framed event"
        );

        Ok(Some(Frame {
            header,
            body: start..body_end,
            attachment: body_end..attachment_end,
        }))
    }

    /// Reads and decodes the next event.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError`] if:
    /// - The declared body length exceeds the remaining stream
    /// - The body is not a valid JSON object
    pub fn read_event(&mut self) -> Result<Option<Event>, StreamError> {
        let Some(frame) = self.next_frame()? else {
            return Ok(None);
        };
        let ked = self.decode(&frame)?;
        Ok(Some(Event::new(ked, frame.attachment_len())))
    }

    fn decode(&mut self, frame: &Frame) -> Result<Ked, StreamError> {
        serde_json::from_slice(&self.stream[frame.body.clone()]).map_err(|source| {
            self.position = self.stream.len();
            StreamError::Decode {
                offset: frame.body.start,
                source,
            }
        })
    }

    fn scan(&mut self, from: usize) -> Result<Option<(usize, VersionString)>, StreamError> {
        find_header(self.stream, from).inspect_err(|_| self.position = self.stream.len())
    }
}

/// Parses a concatenated CESR stream into events.
///
/// Either every framed event decodes and the full list is returned, or the
/// first failure is returned and no events are.
///
/// # Example
///
/// ```rust
/// let events = cesr_stream::parse("")?;
/// assert!(events.is_empty());
/// # Ok::<(), cesr_stream::StreamError>(())
/// ```
pub fn parse(stream: &str) -> Result<Vec<Event>, StreamError> {
    let mut reader = StreamReader::new(stream);
    let mut events = Vec::new();
    while let Some(event) = reader.read_event()? {
        events.push(event);
    }
    debug!(events = events.len(), bytes = stream.len(), "parsed stream");
    Ok(events)
}
