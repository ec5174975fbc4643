use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Semantic class of a token's text
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenType(Cow<'static, str>);

impl TokenType {
    /// The empty type, carried by the end token
    pub const NONE: TokenType = TokenType::from_static("");

    pub const ERROR: TokenType = TokenType::from_static("error");
    pub const COMMENT: TokenType = TokenType::from_static("comment");
    pub const NUMBER: TokenType = TokenType::from_static("number");
    pub const STRING: TokenType = TokenType::from_static("string");
    pub const TEXT: TokenType = TokenType::from_static("text");
    pub const ATTRIBUTE: TokenType = TokenType::from_static("attribute");
    pub const ASSIGNMENT: TokenType = TokenType::from_static("assignment");
    pub const OPERATOR: TokenType = TokenType::from_static("operator");
    pub const PUNCTUATION: TokenType = TokenType::from_static("punctuation");
    pub const LITERAL: TokenType = TokenType::from_static("literal");
    pub const TAG: TokenType = TokenType::from_static("tag");
    pub const ENTITY: TokenType = TokenType::from_static("entity");
    pub const WHITESPACE: TokenType = TokenType::from_static("whitespace");

    /// Every type in the shared vocabulary
    pub const STANDARD: [TokenType; 13] = [
        Self::ERROR,
        Self::COMMENT,
        Self::NUMBER,
        Self::STRING,
        Self::TEXT,
        Self::ATTRIBUTE,
        Self::ASSIGNMENT,
        Self::OPERATOR,
        Self::PUNCTUATION,
        Self::LITERAL,
        Self::TAG,
        Self::ENTITY,
        Self::WHITESPACE,
    ];

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_none(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this type belongs to the shared vocabulary
    pub fn is_standard(&self) -> bool {
        Self::STANDARD.iter().any(|standard| standard == self)
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&'static str> for TokenType {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

/// One unit of tokenizer output
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub value: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub state: String,
}

impl Token {
    /// Token with no state tag; the engine fills in the state on emission
    pub fn new(value: impl Into<String>, token_type: TokenType) -> Self {
        Self {
            value: value.into(),
            token_type,
            state: String::new(),
        }
    }

    pub fn with_state(mut self, state: impl Into<String>) -> Self {
        self.state = state.into();
        self
    }

    /// The end-of-stream sentinel
    pub fn end() -> Self {
        Self::default()
    }

    pub fn is_end(&self) -> bool {
        self.value.is_empty() && self.token_type.is_none() && self.state.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            return f.write_str("<end>");
        }
        write!(f, "{}({:?})", self.token_type, self.value)
    }
}
