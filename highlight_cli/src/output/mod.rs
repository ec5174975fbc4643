//! Token renderers
//!
//! Every renderer writes to a borrowed [`Write`] so the command can point it
//! at stdout while tests capture into a buffer.

mod debug;
mod json;
mod term;
mod text;

pub use debug::DebugOutput;
pub use json::JsonOutput;
pub use term::TermOutput;
pub use text::TextOutput;

use crate::cli::OutputKind;
use highlight_core::Token;
use std::io::{self, Write};

/// Sink for a rendered token stream
pub trait Outputter {
    fn emit(&mut self, token: &Token) -> io::Result<()>;

    fn finish(&mut self) -> io::Result<()>;
}

/// Renderer for `kind` writing into `writer`; `color` only affects the
/// terminal renderer
pub fn create_outputter<'w>(
    kind: OutputKind,
    writer: &'w mut dyn Write,
    color: bool,
) -> Box<dyn Outputter + 'w> {
    match kind {
        OutputKind::Term => Box::new(TermOutput::new(writer, color)),
        OutputKind::Text => Box::new(TextOutput::new(writer)),
        OutputKind::Debug => Box::new(DebugOutput::new(writer)),
        OutputKind::Json => Box::new(JsonOutput::new(writer)),
    }
}
