use crate::filters::FilterSpec;
use crate::lexical::{LexerSpec, RuleSpec};
use crate::tokens::TokenType;

const QUOTED: &str = r#"(")((?:\\"|[^"])*?)(")"#;

/// JSON, with empty tokens removed and a two-space re-indenting formatter
pub fn json() -> LexerSpec {
    LexerSpec::new("json")
        .with_mime_types(["application/json"])
        .with_filenames(["*.json"])
        .with_states([
            ("root", vec![RuleSpec::include("value")]),
            (
                "whitespace",
                vec![RuleSpec::pattern(r"\s+", TokenType::WHITESPACE)],
            ),
            (
                "boolean",
                vec![RuleSpec::pattern("(true|false|null)", TokenType::LITERAL)],
            ),
            (
                "number",
                vec![
                    // -123.456e+78
                    RuleSpec::pattern(r"-?[0-9]+\.?[0-9]*[eE][\+\-]?[0-9]+", TokenType::NUMBER),
                    // -123.456
                    RuleSpec::pattern(r"-?[0-9]+\.[0-9]+", TokenType::NUMBER),
                    RuleSpec::pattern("-?[0-9]+", TokenType::NUMBER),
                ],
            ),
            (
                "string",
                vec![
                    RuleSpec::groups(
                        r#"(")(")"#,
                        TokenType::STRING,
                        vec![TokenType::PUNCTUATION, TokenType::PUNCTUATION],
                    ),
                    RuleSpec::groups(
                        QUOTED,
                        TokenType::STRING,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::STRING,
                            TokenType::PUNCTUATION,
                        ],
                    ),
                ],
            ),
            (
                "value",
                vec![
                    RuleSpec::include("whitespace"),
                    RuleSpec::include("boolean"),
                    RuleSpec::include("number"),
                    RuleSpec::include("string"),
                    RuleSpec::include("array"),
                    RuleSpec::include("object"),
                ],
            ),
            (
                "object",
                vec![RuleSpec::pattern(r"\{", TokenType::PUNCTUATION).with_state("objectKey")],
            ),
            (
                "objectKey",
                vec![
                    RuleSpec::include("whitespace"),
                    RuleSpec::groups(
                        format!(r"{}(\s*)(:)", QUOTED),
                        TokenType::TEXT,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::ATTRIBUTE,
                            TokenType::PUNCTUATION,
                            TokenType::WHITESPACE,
                            TokenType::ASSIGNMENT,
                        ],
                    )
                    .with_state("objectValue"),
                    RuleSpec::pattern(r"\}", TokenType::PUNCTUATION).with_state("#pop"),
                ],
            ),
            (
                "objectValue",
                vec![
                    RuleSpec::include("whitespace"),
                    RuleSpec::include("value"),
                    RuleSpec::pattern(",", TokenType::PUNCTUATION).with_state("#pop"),
                    RuleSpec::pattern(r"\}", TokenType::PUNCTUATION).with_state("#pop #pop"),
                ],
            ),
            (
                "array",
                vec![RuleSpec::pattern(r"\[", TokenType::PUNCTUATION).with_state("arrayValue")],
            ),
            (
                "arrayValue",
                vec![
                    RuleSpec::include("whitespace"),
                    RuleSpec::include("value"),
                    RuleSpec::pattern(",", TokenType::PUNCTUATION),
                    RuleSpec::pattern(r"\]", TokenType::PUNCTUATION).with_state("#pop"),
                ],
            ),
        ])
        .with_filters(vec![FilterSpec::RemoveEmpties])
        .with_formatter(FilterSpec::indent("  "))
}
