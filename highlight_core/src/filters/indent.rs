use super::{Emit, Filter};
use crate::tokens::{Token, TokenType};

pub const DEFAULT_INDENT: &str = "  ";

/// Re-indents bracketed data such as JSON
///
/// Upstream whitespace is dropped and replaced with a newline and the
/// current indentation after `{`, `[` and `,`, and before `}` and `]`. A
/// single space follows a `:` assignment.
#[derive(Debug, Clone)]
pub struct IndentFormatter {
    indent: String,
}

impl IndentFormatter {
    pub fn new(indent: impl Into<String>) -> Self {
        Self {
            indent: indent.into(),
        }
    }
}

impl Default for IndentFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

struct IndentState {
    unit: String,
    depth: usize,
}

impl IndentState {
    fn whitespace(&self, value: &str, state: &str) -> Token {
        Token::new(value, TokenType::WHITESPACE).with_state(state)
    }

    fn newline(&self, state: &str) -> Vec<Token> {
        let mut tokens = vec![self.whitespace("\n", state)];
        if self.depth > 0 && !self.unit.is_empty() {
            tokens.push(self.whitespace(&self.unit.repeat(self.depth), state));
        }
        tokens
    }

    fn layout(&mut self, token: Token) -> Vec<Token> {
        if token.token_type == TokenType::WHITESPACE {
            return Vec::new();
        }

        if token.token_type == TokenType::ASSIGNMENT && token.value == ":" {
            let space = self.whitespace(" ", &token.state);
            return vec![token, space];
        }

        if token.token_type != TokenType::PUNCTUATION {
            return vec![token];
        }

        match token.value.as_str() {
            "," => {
                let mut out = vec![token];
                out.extend(self.newline(&out[0].state));
                out
            }
            "{" | "[" => {
                self.depth += 1;
                let mut out = vec![token];
                out.extend(self.newline(&out[0].state));
                out
            }
            "}" | "]" => {
                self.depth = self.depth.saturating_sub(1);
                let mut out = self.newline(&token.state);
                out.push(token);
                out
            }
            _ => vec![token],
        }
    }
}

impl Filter for IndentFormatter {
    fn name(&self) -> &str {
        "indent"
    }

    fn filter<'a>(&self, mut out: Emit<'a>) -> Emit<'a> {
        let mut state = IndentState {
            unit: self.indent.clone(),
            depth: 0,
        };

        Box::new(move |token: Token| {
            if token.is_end() {
                return out(token);
            }
            for laid_out in state.layout(token) {
                out(laid_out)?;
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::tests::{run, tok};
    use crate::filters::FilterChain;
    use std::sync::Arc;

    fn render(tokens: Vec<Token>) -> String {
        let chain = FilterChain::new(vec![Arc::new(IndentFormatter::default())]);
        run(&chain, tokens)
            .iter()
            .map(|t| t.value.as_str())
            .collect()
    }

    #[test]
    fn test_object_layout() {
        let out = render(vec![
            tok("{", TokenType::PUNCTUATION),
            tok(" ", TokenType::WHITESPACE),
            tok("\"", TokenType::PUNCTUATION),
            tok("a", TokenType::ATTRIBUTE),
            tok("\"", TokenType::PUNCTUATION),
            tok(":", TokenType::ASSIGNMENT),
            tok("1", TokenType::NUMBER),
            tok(",", TokenType::PUNCTUATION),
            tok("[", TokenType::PUNCTUATION),
            tok("true", TokenType::LITERAL),
            tok("]", TokenType::PUNCTUATION),
            tok("}", TokenType::PUNCTUATION),
        ]);
        assert_eq!(out, "{\n  \"a\": 1,\n  [\n    true\n  ]\n}");
    }

    #[test]
    fn test_depth_never_underflows() {
        let out = render(vec![
            tok("]", TokenType::PUNCTUATION),
            tok("}", TokenType::PUNCTUATION),
            tok("[", TokenType::PUNCTUATION),
        ]);
        assert_eq!(out, "\n]\n}[\n  ");
    }

    #[test]
    fn test_inserted_whitespace_carries_state() {
        let chain = FilterChain::new(vec![Arc::new(IndentFormatter::new("\t"))]);
        let out = run(&chain, vec![tok("{", TokenType::PUNCTUATION).with_state("object")]);
        assert_eq!(out.len(), 4);
        assert_eq!(out[1].value, "\n");
        assert_eq!(out[2].value, "\t");
        assert_eq!(out[2].state, "object");
        assert!(out[3].is_end());
    }
}
