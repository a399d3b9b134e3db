//! Streaming document writer.
//!
//! Serializes multiple independent values through one open sink without
//! closing it after each value, so a whole result set or vertex stream
//! travels over a single channel. Documents are newline-delimited and
//! always compact, whatever the codec's string-rendering mode.

use std::io::Write;

use super::{CodecError, ExchangeCodec};
use crate::value::TraversalValue;

/// Writes a stream of encoded values to an [`io::Write`](std::io::Write)
/// sink.
///
/// # Examples
///
/// ```rust
/// use pathloom::codec::{CodecWriter, ExchangeCodec};
/// use pathloom::value::TraversalValue;
///
/// let codec = ExchangeCodec::build().embed_type_tags(true).create();
/// let mut writer = CodecWriter::new(codec, Vec::new());
///
/// writer.write_value(&TraversalValue::Int(1)).unwrap();
/// writer.write_value(&TraversalValue::Int(2)).unwrap();
/// assert_eq!(writer.values_written(), 2);
///
/// let bytes = writer.into_inner();
/// assert_eq!(bytes.iter().filter(|b| **b == b'\n').count(), 2);
/// ```
pub struct CodecWriter<W: Write> {
    codec: ExchangeCodec,
    sink: W,
    written: usize,
}

impl<W: Write> CodecWriter<W> {
    /// Wrap `sink` with `codec`.
    pub fn new(codec: ExchangeCodec, sink: W) -> Self {
        Self {
            codec,
            sink,
            written: 0,
        }
    }

    /// Encode `value` and append it to the stream as one
    /// newline-terminated document.
    ///
    /// The sink stays open; call again for the next value.
    pub fn write_value(&mut self, value: &TraversalValue) -> Result<(), CodecError> {
        let doc = self.codec.encode(value)?;
        let line = serde_json::to_string(&doc)?;
        self.sink.write_all(line.as_bytes())?;
        self.sink.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Flush the underlying sink.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        self.sink.flush()?;
        Ok(())
    }

    /// Number of values written so far.
    #[must_use]
    pub fn values_written(&self) -> usize {
        self.written
    }

    /// Hand the sink back without closing it.
    #[must_use]
    pub fn into_inner(self) -> W {
        self.sink
    }
}
