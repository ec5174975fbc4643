//! Compiled rules
//!
//! A pattern rule turns one regular-expression match into tokens and names
//! the stack transitions to apply afterwards. An include rule refers to
//! another state by name; it is resolved by [`State`](super::State) against
//! the shared state map at match time.

use super::error::LexerError;
use crate::tokens::{Token, TokenType};
use regex::{Captures, Regex};
use std::fmt;

/// Reserved transition name that pops the stack
pub const POP: &str = "#pop";

/// One stack operation applied after a rule matches
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    Pop,
    Push(String),
}

impl Transition {
    /// Parse a space-separated transition list such as `"#pop #pop"`
    pub fn parse_list(spec: &str) -> Vec<Transition> {
        spec.split_whitespace()
            .map(|op| match op {
                POP => Transition::Pop,
                name => Transition::Push(name.to_string()),
            })
            .collect()
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Pop => f.write_str(POP),
            Transition::Push(state) => f.write_str(state),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Rule {
    Pattern(PatternRule),
    Include(IncludeRule),
}

#[derive(Debug, Clone)]
pub struct IncludeRule {
    pub(crate) target: String,
}

impl IncludeRule {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }
}

#[derive(Debug, Clone)]
pub struct PatternRule {
    regex: Regex,
    token_type: TokenType,
    subtypes: Vec<TokenType>,
    next: Vec<Transition>,
}

impl PatternRule {
    pub fn new(
        regex: Regex,
        token_type: TokenType,
        subtypes: Vec<TokenType>,
        next: Vec<Transition>,
    ) -> Self {
        Self {
            regex,
            token_type,
            subtypes,
            next,
        }
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn token_type(&self) -> &TokenType {
        &self.token_type
    }

    pub fn next(&self) -> &[Transition] {
        &self.next
    }

    /// First non-empty match anywhere in `subject`
    ///
    /// Zero-length matches never count: a rule that consumes nothing would
    /// stall the engine.
    pub fn find<'s>(&self, subject: &'s str) -> Option<Captures<'s>> {
        self.regex
            .captures_iter(subject)
            .find(|captures| captures.get(0).map_or(false, |m| !m.is_empty()))
    }

    /// Match anchored at the start of `subject`, returning the consumed
    /// length and the tokens built from the match
    pub fn match_at(&self, subject: &str) -> Result<Option<(usize, Vec<Token>)>, LexerError> {
        match self.find(subject) {
            Some(captures) if captures.get(0).map_or(false, |m| m.start() == 0) => {
                let consumed = captures.get(0).map_or(0, |m| m.end());
                Ok(Some((consumed, self.tokens(&captures)?)))
            }
            _ => Ok(None),
        }
    }

    /// Build the tokens for one match
    ///
    /// Without subtypes the whole match is one token of the base type. With
    /// subtypes every participating group becomes a token of its subtype and
    /// any text between or after the groups becomes a base-type token, so
    /// the token values always concatenate to the matched text.
    pub fn tokens(&self, captures: &Captures<'_>) -> Result<Vec<Token>, LexerError> {
        let Some(whole) = captures.get(0) else {
            return Ok(Vec::new());
        };

        if self.subtypes.is_empty() {
            return Ok(vec![Token::new(whole.as_str(), self.token_type.clone())]);
        }

        let text = whole.as_str();
        let base = whole.start();
        let mut tokens = Vec::with_capacity(captures.len());
        let mut cursor = whole.start();

        for (group, capture) in captures.iter().enumerate().skip(1) {
            // Groups that did not participate leave the cursor alone
            let Some(capture) = capture else {
                continue;
            };

            let subtype =
                self.subtypes
                    .get(group - 1)
                    .ok_or_else(|| LexerError::MisconfiguredRule {
                        pattern: self.pattern().to_string(),
                        group,
                        subtypes: self.subtypes.len(),
                    })?;

            if capture.start() >= cursor {
                if capture.start() > cursor {
                    tokens.push(Token::new(
                        &text[cursor - base..capture.start() - base],
                        self.token_type.clone(),
                    ));
                }
                tokens.push(Token::new(capture.as_str(), subtype.clone()));
                cursor = capture.end();
            } else if capture.end() > cursor {
                // Nested group: only the part past the enclosing group
                tokens.push(Token::new(
                    &text[cursor - base..capture.end() - base],
                    subtype.clone(),
                ));
                cursor = capture.end();
            }
        }

        if cursor < whole.end() {
            tokens.push(Token::new(&text[cursor - base..], self.token_type.clone()));
        }

        Ok(tokens)
    }
}
