//! Command-line arguments

use anstream::stream::RawStream;
use anstream::{AutoStream, ColorChoice};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "highlight", version, about = "Syntax-highlight a file or standard input")]
pub struct Cli {
    /// File to highlight; standard input when omitted
    pub file: Option<PathBuf>,

    /// Content type to parse as, e.g. `application/json`
    #[arg(short = 't', long = "type")]
    pub content_type: Option<String>,

    /// Registered lexer name, e.g. `css`
    #[arg(short = 'l', long = "lexer")]
    pub lexer: Option<String>,

    /// How tokens are rendered
    #[arg(short = 'o', long = "output", value_enum, default_value_t = OutputKind::Term)]
    pub output: OutputKind,

    /// Which stage of the token pipeline to render
    #[arg(short = 'm', long = "mode", value_enum, default_value_t = Mode::Formatted)]
    pub mode: Mode,

    /// Extra lexer specification (TOML or JSON); may be repeated
    #[arg(long = "spec", value_name = "PATH")]
    pub specs: Vec<PathBuf>,

    /// When to colour terminal output
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,

    /// List registered lexers and exit
    #[arg(long)]
    pub list: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Colour when writing to a terminal and `NO_COLOR` is unset
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Whether escape codes should be written to `stream`
    pub fn enabled<S: RawStream>(self, stream: &S) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => AutoStream::choice(stream) != ColorChoice::Never,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputKind {
    /// Coloured terminal output
    Term,
    /// Token text only
    Text,
    /// State, type and value of every token
    Debug,
    /// One JSON object per token
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    /// Tokens straight from the state machine
    Raw,
    /// Tokens after the lexer's filters
    Filtered,
    /// Filtered tokens after the lexer's formatter
    Formatted,
}
