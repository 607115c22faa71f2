//! Byte-to-line framing.
//!
//! Chunks are appended to one byte buffer and split on `\n` before any UTF-8
//! decoding happens. A newline byte never occurs inside a multi-byte UTF-8
//! sequence, so a character split across chunks is simply carried in the
//! buffer until its line completes.

use memchr::memchr;

use super::events::DecodeError;

/// Incremental line splitter for a single stream.
///
/// After every [`FrameDecoder::next_line`] that returns `None`, the buffer
/// holds at most one incomplete trailing line.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: Vec<u8>,
    /// Offset of the first byte not yet emitted as part of a line
    start: usize,
    lines_emitted: u64,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw chunk. Call [`FrameDecoder::next_line`] until it returns
    /// `None` to drain the complete lines it produced.
    pub fn push(&mut self, chunk: &[u8]) {
        if self.start > 0 {
            self.buffer.drain(..self.start);
            self.start = 0;
        }
        self.buffer.extend_from_slice(chunk);
    }

    /// Pop the next complete line, without its `\n` or trailing `\r`.
    pub fn next_line(&mut self) -> Option<Result<String, DecodeError>> {
        let rest = self.buffer.get(self.start..)?;
        let pos = memchr(b'\n', rest)?;
        let begin = self.start;
        let end = begin + pos;
        self.start = end + 1;
        self.lines_emitted += 1;
        Some(decode_line(
            self.buffer.get(begin..end).unwrap_or_default(),
            self.lines_emitted,
        ))
    }

    /// Flush the carried partial line at end of stream.
    ///
    /// Returns `None` when nothing but an empty remainder was buffered.
    pub fn finish(&mut self) -> Option<Result<String, DecodeError>> {
        let rest = self.buffer.get(self.start..).unwrap_or_default();
        if rest.is_empty() {
            self.clear();
            return None;
        }
        self.lines_emitted += 1;
        let line = decode_line(rest, self.lines_emitted);
        self.clear();
        Some(line)
    }

    /// Bytes of the incomplete trailing line currently carried.
    pub fn pending_len(&self) -> usize {
        self.buffer.len().saturating_sub(self.start)
    }

    pub fn lines_emitted(&self) -> u64 {
        self.lines_emitted
    }

    fn clear(&mut self) {
        self.buffer.clear();
        self.start = 0;
    }
}

fn decode_line(bytes: &[u8], line_number: u64) -> Result<String, DecodeError> {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| DecodeError {
            line_number,
            message: e.to_string(),
        })
}

/// Split a whole byte sequence into lines using an arbitrary chunking.
///
/// Convenience for callers that already hold the complete body.
pub fn decode_all<'a, I>(chunks: I) -> Result<Vec<String>, DecodeError>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    let mut decoder = FrameDecoder::new();
    let mut lines = Vec::new();
    for chunk in chunks {
        decoder.push(chunk);
        while let Some(line) = decoder.next_line() {
            lines.push(line?);
        }
    }
    if let Some(line) = decoder.finish() {
        lines.push(line?);
    }
    Ok(lines)
}
