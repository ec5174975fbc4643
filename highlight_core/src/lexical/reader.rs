//! Line-buffered input
//!
//! Reads one line at a time, or a bounded chunk of an overlong line, and
//! decodes it as UTF-8. A multi-byte character split by the chunk limit is
//! carried over to the next read; bytes that are not valid UTF-8 are
//! replaced with U+FFFD.

use crate::logging::codes;
use std::io::{self, BufRead, Read};

/// One decoded read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    /// A line boundary or the end of input was reached
    pub eol: bool,
}

pub struct LineReader<'a> {
    inner: &'a mut dyn BufRead,
    carry: Vec<u8>,
    chunk_limit: usize,
    exhausted: bool,
}

impl<'a> LineReader<'a> {
    pub fn new(inner: &'a mut dyn BufRead, chunk_limit: usize) -> Self {
        Self {
            inner,
            carry: Vec::new(),
            chunk_limit: chunk_limit.max(4),
            exhausted: false,
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Read the next line or chunk; an exhausted reader returns an empty
    /// chunk with `eol` set
    pub fn next_chunk(&mut self) -> io::Result<Chunk> {
        if self.exhausted {
            return Ok(Chunk {
                text: String::new(),
                eol: true,
            });
        }

        let mut bytes = std::mem::take(&mut self.carry);
        let limit = self.chunk_limit.saturating_sub(bytes.len()).max(1) as u64;
        let read = (&mut *self.inner).take(limit).read_until(b'\n', &mut bytes)?;

        let eol = if read == 0 {
            self.exhausted = true;
            true
        } else if bytes.last() == Some(&b'\n') {
            true
        } else if (read as u64) < limit {
            // Short read without a newline only happens at end of input
            self.exhausted = true;
            true
        } else {
            false
        };

        if !self.exhausted {
            let tail = incomplete_tail_len(&bytes);
            if tail > 0 {
                self.carry = bytes.split_off(bytes.len() - tail);
            }
        }

        Ok(Chunk {
            text: decode(bytes),
            eol,
        })
    }
}

fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            let valid_up_to = err.utf8_error().valid_up_to();
            crate::log_warning!(code = codes::input::INVALID_ENCODING,
                "Replaced invalid UTF-8 in input",
                "offset" => valid_up_to
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

/// Length of a trailing, truncated but otherwise valid UTF-8 sequence
fn incomplete_tail_len(bytes: &[u8]) -> usize {
    let start = bytes.len().saturating_sub(3);
    for (i, &byte) in bytes[start..].iter().enumerate().rev() {
        let pos = start + i;
        let width = match byte {
            0x00..=0x7F => return 0,
            0x80..=0xBF => continue,
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => return 0,
        };
        let available = bytes.len() - pos;
        return if available < width { available } else { 0 };
    }
    0
}
