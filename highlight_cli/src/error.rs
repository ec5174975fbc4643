use highlight_core::logging::{codes, Code};
use highlight_core::LexerError;
use std::path::PathBuf;
use thiserror::Error;

/// Failures surfaced by the `highlight` command
#[derive(Debug, Error)]
pub enum CliError {
    #[error("no tokenizer specified - use `-t` or `-l` to pick one when reading from standard input")]
    NoTokenizer,

    #[error("couldn't find tokenizer for content type '{content_type}'")]
    UnresolvedContentType { content_type: String },

    #[error("couldn't find tokenizer for file '{filename}'")]
    UnresolvedFilename { filename: String },

    #[error("no lexer named '{name}' is registered")]
    UnknownLexer { name: String },

    #[error("failed to load lexer specification {path}: {source}")]
    SpecLoad {
        path: PathBuf,
        #[source]
        source: LexerError,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Engine(#[from] LexerError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn error_code(&self) -> Code {
        match self {
            Self::NoTokenizer | Self::UnknownLexer { .. } | Self::UnresolvedFilename { .. } => {
                codes::registry::TOKENIZER_NOT_FOUND
            }
            Self::UnresolvedContentType { .. } => codes::registry::CONTENT_TYPE_UNRESOLVED,
            Self::SpecLoad { source, .. } | Self::Engine(source) => source.error_code(),
            Self::Open { .. } | Self::Io(_) => codes::input::IO_ERROR,
        }
    }
}
