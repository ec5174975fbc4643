use super::Outputter;
use highlight_core::Token;
use std::io::{self, Write};

/// Writes token values and nothing else
pub struct TextOutput<'w> {
    writer: &'w mut dyn Write,
}

impl<'w> TextOutput<'w> {
    pub fn new(writer: &'w mut dyn Write) -> Self {
        Self { writer }
    }
}

impl Outputter for TextOutput<'_> {
    fn emit(&mut self, token: &Token) -> io::Result<()> {
        self.writer.write_all(token.value.as_bytes())
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
