use super::Outputter;
use highlight_core::Token;
use std::io::{self, Write};

/// One line per token: state, type and the quoted value
pub struct DebugOutput<'w> {
    writer: &'w mut dyn Write,
}

impl<'w> DebugOutput<'w> {
    pub fn new(writer: &'w mut dyn Write) -> Self {
        Self { writer }
    }
}

impl Outputter for DebugOutput<'_> {
    fn emit(&mut self, token: &Token) -> io::Result<()> {
        writeln!(
            self.writer,
            "{:>24}\t{:>12}\t{:?}",
            token.state, token.token_type, token.value
        )
    }

    fn finish(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
