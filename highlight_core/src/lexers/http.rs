use crate::filters::FilterSpec;
use crate::lexical::{LexerSpec, RuleSpec};
use crate::tokens::TokenType;

/// HTTP response head: status line and headers
///
/// Tokenizing stops at the blank line that ends the headers; the body is
/// left to whatever lexer suits its content type.
pub fn http() -> LexerSpec {
    LexerSpec::new("http")
        .with_states([
            (
                "root",
                vec![RuleSpec::groups(
                    r"^(HTTP)(/)([0-9\.]+)( )([0-9]+)( ?)(.*?)(\r?\n)$",
                    TokenType::TEXT,
                    vec![
                        TokenType::TAG,
                        TokenType::PUNCTUATION,
                        TokenType::TAG,
                        TokenType::WHITESPACE,
                        TokenType::NUMBER,
                        TokenType::WHITESPACE,
                        TokenType::STRING,
                        TokenType::WHITESPACE,
                    ],
                )
                .with_state("headers")],
            ),
            (
                "headers",
                vec![
                    RuleSpec::groups(
                        r"^([^:\r\n]+)(:)([ \t]*)",
                        TokenType::TEXT,
                        vec![
                            TokenType::ATTRIBUTE,
                            TokenType::ASSIGNMENT,
                            TokenType::WHITESPACE,
                        ],
                    )
                    .with_state("headerValue"),
                    RuleSpec::pattern(r"^\r?\n$", TokenType::WHITESPACE).with_state("#pop #pop"),
                ],
            ),
            (
                "headerValue",
                vec![
                    RuleSpec::pattern(r"\r?\n$", TokenType::WHITESPACE).with_state("#pop"),
                    RuleSpec::pattern(r"[^;\r\n]+", TokenType::TEXT),
                    RuleSpec::pattern(";", TokenType::PUNCTUATION),
                ],
            ),
        ])
        .with_filters(vec![FilterSpec::RemoveEmpties, FilterSpec::MergeAdjacent])
}
