use crate::config::compile_time::engine::MAX_STACK_DEPTH;
use crate::logging::codes;

/// Errors raised while compiling a lexer specification or tokenizing input
#[derive(Debug, thiserror::Error)]
pub enum LexerError {
    #[error("Invalid regular expression in state '{state}' rule {index} ('{pattern}'): {message}")]
    InvalidRegex {
        state: String,
        index: usize,
        pattern: String,
        message: String,
    },

    #[error("Malformed filename pattern '{pattern}' for lexer '{lexer}': {message}")]
    InvalidFilenamePattern {
        lexer: String,
        pattern: String,
        message: String,
    },

    #[error("Invalid media type '{media_type}': {message}")]
    InvalidMediaType { media_type: String, message: String },

    #[error("State '{referenced_by}' refers to undefined state '{state}'")]
    UnknownState {
        state: String,
        referenced_by: String,
    },

    #[error("Lexer '{lexer}' has no 'root' state")]
    MissingRootState { lexer: String },

    #[error("Rule {index} in state '{state}' has neither a regexp nor an include")]
    EmptyRule { state: String, index: usize },

    #[error("States include each other without consuming input: {}", .path.join(" -> "))]
    IncludeCycle { path: Vec<String> },

    #[error("Invalid lexer specification: {message}")]
    InvalidSpec { message: String },

    #[error("Not enough subtypes for group {group} of rule '{pattern}' ({subtypes} declared)")]
    MisconfiguredRule {
        pattern: String,
        group: usize,
        subtypes: usize,
    },

    #[error("State stack exceeded {MAX_STACK_DEPTH} entries while pushing '{state}'")]
    StackOverflow { state: String },

    #[error("Input error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {message}")]
    Downstream { message: String },
}

impl LexerError {
    /// Wrap an error reported by an emit callback
    pub fn downstream(err: impl std::fmt::Display) -> Self {
        LexerError::Downstream {
            message: err.to_string(),
        }
    }

    pub fn error_code(&self) -> crate::logging::Code {
        match self {
            LexerError::InvalidRegex { .. } => codes::specification::INVALID_REGEX,
            LexerError::InvalidFilenamePattern { .. } => {
                codes::specification::INVALID_FILENAME_PATTERN
            }
            LexerError::InvalidMediaType { .. } => codes::specification::INVALID_MEDIA_TYPE,
            LexerError::UnknownState { .. } => codes::specification::UNKNOWN_STATE,
            LexerError::MissingRootState { .. } => codes::specification::MISSING_ROOT_STATE,
            LexerError::EmptyRule { .. } => codes::specification::EMPTY_RULE,
            LexerError::IncludeCycle { .. } => codes::specification::INCLUDE_CYCLE,
            LexerError::InvalidSpec { .. } => codes::specification::INVALID_SPEC,
            LexerError::MisconfiguredRule { .. } => codes::matching::MISCONFIGURED_RULE,
            LexerError::StackOverflow { .. } => codes::matching::STACK_OVERFLOW,
            LexerError::Io(_) => codes::input::IO_ERROR,
            LexerError::Downstream { .. } => codes::output::DOWNSTREAM_ERROR,
        }
    }

    /// Whether the error comes from the lexer specification rather than input
    pub fn is_specification_error(&self) -> bool {
        codes::get_category(self.error_code().as_str()) == "Specification"
    }

    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.error_code().as_str())
    }
}
