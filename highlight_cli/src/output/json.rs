use super::Outputter;
use highlight_core::Token;
use std::io::{self, Write};

/// JSON lines, one object per token; the end token is not written
pub struct JsonOutput<'w> {
    writer: &'w mut dyn Write,
}

impl<'w> JsonOutput<'w> {
    pub fn new(writer: &'w mut dyn Write) -> Self {
        Self { writer }
    }
}

impl Outputter for JsonOutput<'_> {
    fn emit(&mut self, token: &Token) -> io::Result<()> {
        if token.is_end() {
            return Ok(());
        }
        serde_json::to_writer(&mut *self.writer, token)?;
        self.writer.write_all(b"\n")
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
