//! Error codes and classification
//!
//! Single source of truth for every code the tokenizer logs, together with
//! the behavioural metadata used to classify it.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// ERROR CLASSIFICATION TYPES
// ============================================================================

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Critical = 0,
    High = 1,
    Medium = 2,
    Low = 3,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
        }
    }
}

/// Complete metadata for a code
#[derive(Debug, Clone)]
pub struct ErrorMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub severity: Severity,
    pub recoverable: bool,
    pub requires_halt: bool,
    pub description: &'static str,
    pub recommended_action: &'static str,
}

impl ErrorMetadata {
    pub fn new(
        code: &'static str,
        category: &'static str,
        severity: Severity,
        recoverable: bool,
        requires_halt: bool,
        description: &'static str,
        recommended_action: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            severity,
            recoverable,
            requires_halt,
            description,
            recommended_action,
        }
    }
}

// ============================================================================
// ERROR CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Lexer specification (authoring) error codes
pub mod specification {
    use super::Code;

    pub const INVALID_REGEX: Code = Code::new("E010");
    pub const INVALID_FILENAME_PATTERN: Code = Code::new("E011");
    pub const INVALID_MEDIA_TYPE: Code = Code::new("E012");
    pub const UNKNOWN_STATE: Code = Code::new("E013");
    pub const MISSING_ROOT_STATE: Code = Code::new("E014");
    pub const EMPTY_RULE: Code = Code::new("E015");
    pub const INCLUDE_CYCLE: Code = Code::new("E016");
    pub const INVALID_SPEC: Code = Code::new("E017");
}

/// Match-time error codes
pub mod matching {
    use super::Code;

    pub const MISCONFIGURED_RULE: Code = Code::new("E020");
    pub const STACK_OVERFLOW: Code = Code::new("E021");

    /// Input no rule could match; emitted as an error token
    pub const UNRECOGNIZED_INPUT: Code = Code::new("W020");
}

/// Input stream codes
pub mod input {
    use super::Code;

    pub const IO_ERROR: Code = Code::new("E030");
    pub const INVALID_ENCODING: Code = Code::new("W030");
    pub const PENDING_LIMIT_REACHED: Code = Code::new("W031");
}

/// Emit callback and filter codes
pub mod output {
    use super::Code;

    pub const DOWNSTREAM_ERROR: Code = Code::new("E040");
}

/// Tokenizer registry codes
pub mod registry {
    use super::Code;

    pub const TOKENIZER_NOT_FOUND: Code = Code::new("E050");
    pub const CONTENT_TYPE_UNRESOLVED: Code = Code::new("E051");
    pub const TOKENIZER_REPLACED: Code = Code::new("W050");
}

// ============================================================================
// SUCCESS CODE CONSTANTS
// ============================================================================

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const LEXER_COMPILED: Code = Code::new("I010");
    pub const TOKENIZATION_COMPLETE: Code = Code::new("I020");
    pub const TOKENIZER_REGISTERED: Code = Code::new("I050");
}

// ============================================================================
// ERROR METADATA REGISTRY
// ============================================================================

static ERROR_REGISTRY: OnceLock<HashMap<&'static str, ErrorMetadata>> = OnceLock::new();

fn get_error_registry() -> &'static HashMap<&'static str, ErrorMetadata> {
    ERROR_REGISTRY.get_or_init(|| {
        let entries = [
            // System
            ErrorMetadata::new(
                "ERR001",
                "System",
                Severity::Critical,
                false,
                true,
                "Critical internal error",
                "File a bug report with the input that triggered it",
            ),
            ErrorMetadata::new(
                "ERR002",
                "System",
                Severity::Critical,
                false,
                true,
                "Logging or configuration failed to initialize",
                "Check HIGHLIGHT_* environment variables",
            ),
            // Specification
            ErrorMetadata::new(
                "E010",
                "Specification",
                Severity::High,
                false,
                true,
                "Rule regular expression failed to compile",
                "Fix the rule's regexp in the lexer specification",
            ),
            ErrorMetadata::new(
                "E011",
                "Specification",
                Severity::High,
                false,
                true,
                "Lexer declares a malformed filename glob",
                "Fix the filenames list in the lexer specification",
            ),
            ErrorMetadata::new(
                "E012",
                "Specification",
                Severity::Medium,
                true,
                false,
                "Media type could not be parsed",
                "Pass a media type of the form type/subtype",
            ),
            ErrorMetadata::new(
                "E013",
                "Specification",
                Severity::High,
                false,
                true,
                "Rule refers to a state that is not defined",
                "Define the state or correct the include/state reference",
            ),
            ErrorMetadata::new(
                "E014",
                "Specification",
                Severity::High,
                false,
                true,
                "Lexer has no root state",
                "Add a state named root",
            ),
            ErrorMetadata::new(
                "E015",
                "Specification",
                Severity::High,
                false,
                true,
                "Rule declares neither a regexp nor an include",
                "Give the rule a regexp or an include target",
            ),
            ErrorMetadata::new(
                "E016",
                "Specification",
                Severity::High,
                false,
                true,
                "States include each other without consuming input",
                "Break the include cycle",
            ),
            ErrorMetadata::new(
                "E017",
                "Specification",
                Severity::High,
                false,
                true,
                "Lexer specification document could not be parsed",
                "Check the TOML or JSON syntax of the specification",
            ),
            // Matching
            ErrorMetadata::new(
                "E020",
                "Matching",
                Severity::High,
                false,
                true,
                "Rule has more capture groups than declared subtypes",
                "Add subtypes or make the extra groups non-capturing",
            ),
            ErrorMetadata::new(
                "E021",
                "Matching",
                Severity::High,
                false,
                true,
                "State stack exceeded its maximum depth",
                "Check the grammar for unbounded pushes",
            ),
            ErrorMetadata::new(
                "W020",
                "Matching",
                Severity::Low,
                true,
                false,
                "Input not matched by any rule in the active state",
                "None; the text is emitted as an error token",
            ),
            // Input
            ErrorMetadata::new(
                "E030",
                "Input",
                Severity::High,
                false,
                true,
                "Reading from the input stream failed",
                "Check the input file or pipe",
            ),
            ErrorMetadata::new(
                "W030",
                "Input",
                Severity::Low,
                true,
                false,
                "Input contained invalid UTF-8",
                "Invalid sequences were replaced with U+FFFD",
            ),
            ErrorMetadata::new(
                "W031",
                "Input",
                Severity::Low,
                true,
                false,
                "Unterminated line exceeded the pending buffer limit",
                "The buffered text was matched as a complete line",
            ),
            // Output
            ErrorMetadata::new(
                "E040",
                "Output",
                Severity::High,
                false,
                true,
                "Emit callback reported an error",
                "Check the output destination",
            ),
            // Registry
            ErrorMetadata::new(
                "E050",
                "Registry",
                Severity::Medium,
                true,
                false,
                "No tokenizer is registered for the request",
                "Pass -t or -l, or use --list to see available tokenizers",
            ),
            ErrorMetadata::new(
                "E051",
                "Registry",
                Severity::Medium,
                true,
                false,
                "Content type did not resolve to a tokenizer",
                "Check the media type spelling",
            ),
            ErrorMetadata::new(
                "W050",
                "Registry",
                Severity::Low,
                true,
                false,
                "A tokenizer registration replaced an existing entry",
                "None",
            ),
            // Success
            ErrorMetadata::new(
                "I001",
                "System",
                Severity::Low,
                true,
                false,
                "Logging system initialized",
                "None",
            ),
            ErrorMetadata::new(
                "I010",
                "Specification",
                Severity::Low,
                true,
                false,
                "Lexer specification compiled",
                "None",
            ),
            ErrorMetadata::new(
                "I020",
                "Matching",
                Severity::Low,
                true,
                false,
                "Tokenization completed",
                "None",
            ),
            ErrorMetadata::new(
                "I050",
                "Registry",
                Severity::Low,
                true,
                false,
                "Tokenizer registered",
                "None",
            ),
        ];

        entries
            .into_iter()
            .map(|metadata| (metadata.code, metadata))
            .collect()
    })
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_error_metadata(code: &str) -> Option<&'static ErrorMetadata> {
    get_error_registry().get(code)
}

/// Get severity from code
pub fn get_severity(code: &str) -> Severity {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.severity)
        .unwrap_or(Severity::Medium)
}

/// Check if error is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Check if error requires immediate halt
pub fn requires_halt(code: &str) -> bool {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.requires_halt)
        .unwrap_or(false)
}

/// Get human-readable description for code
pub fn get_description(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown error")
}

/// Get recommended action for code
pub fn get_action(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.recommended_action)
        .unwrap_or("No specific action available")
}

/// Get category from code
pub fn get_category(code: &str) -> &'static str {
    get_error_registry()
        .get(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
