//! Line framing that survives overlong and malformed lines.
//!
//! A decode error ends a `FramedRead` stream for good, so the length check
//! is reported as an item instead. The inner codec discards the rest of the
//! offending line and decoding resumes at the next one. Lines are split on
//! raw bytes; bytes that are not UTF-8 are replaced, never rejected.

use std::io;

use bytes::{Bytes, BytesMut};
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, Decoder};

const LINE_FEED: u8 = b'\n';
const CARRIAGE_RETURN: char = '\r';

/// One framed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    /// A line within the length limit, terminator removed.
    Complete(String),
    /// A line over the limit was dropped.
    Overlong,
}

/// Newline-delimited decoder with a length limit.
#[derive(Debug, Clone)]
pub struct BoundedLines {
    inner: AnyDelimiterCodec,
}

impl BoundedLines {
    /// Decoder rejecting lines longer than `max_length` bytes, terminator
    /// excluded.
    pub fn new(max_length: usize) -> Self {
        Self {
            inner: AnyDelimiterCodec::new_with_max_length(vec![LINE_FEED], Vec::new(), max_length),
        }
    }
}

fn to_line(chunk: &Bytes) -> Line {
    let text = String::from_utf8_lossy(chunk);
    let text = text.strip_suffix(CARRIAGE_RETURN).unwrap_or(&text);
    Line::Complete(text.to_owned())
}

fn lift(
    result: Result<Option<Bytes>, AnyDelimiterCodecError>,
) -> Result<Option<Line>, io::Error> {
    match result {
        Ok(chunk) => Ok(chunk.as_ref().map(to_line)),
        Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => Ok(Some(Line::Overlong)),
        Err(AnyDelimiterCodecError::Io(e)) => Err(e),
    }
}

impl Decoder for BoundedLines {
    type Item = Line;
    type Error = io::Error;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Line>, io::Error> {
        lift(self.inner.decode(src))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Line>, io::Error> {
        lift(self.inner.decode_eof(src))
    }
}
