use crate::lexical::{LexerSpec, RuleSpec};
use crate::tokens::TokenType;

/// Rules shared by every block-level state
fn trivia() -> Vec<RuleSpec> {
    vec![
        RuleSpec::include("whitespace"),
        RuleSpec::include("singleLineComment"),
        RuleSpec::include("multiLineComment"),
    ]
}

fn with_trivia(rules: Vec<RuleSpec>) -> Vec<RuleSpec> {
    let mut all = trivia();
    all.extend(rules);
    all
}

/// Cascading style sheets
pub fn css() -> LexerSpec {
    LexerSpec::new("css")
        .with_mime_types(["text/css"])
        .with_filenames(["*.css"])
        .with_states([
            (
                "root",
                with_trivia(vec![
                    RuleSpec::include("selector"),
                    RuleSpec::include("declarationBlock"),
                ]),
            ),
            (
                "selector",
                vec![
                    RuleSpec::groups(
                        r"(\[)([^\]]+)(\])",
                        TokenType::TEXT,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::ATTRIBUTE,
                            TokenType::PUNCTUATION,
                        ],
                    ),
                    RuleSpec::groups(
                        r"(\.)([-a-zA-Z0-9]+)",
                        TokenType::TEXT,
                        vec![TokenType::PUNCTUATION, TokenType::ATTRIBUTE],
                    ),
                    RuleSpec::pattern("@[-a-zA-Z0-9]+", TokenType::LITERAL).with_state("media"),
                    RuleSpec::pattern(">", TokenType::PUNCTUATION),
                    RuleSpec::pattern(r"\+", TokenType::PUNCTUATION),
                    RuleSpec::pattern(":", TokenType::PUNCTUATION),
                    RuleSpec::pattern(",", TokenType::PUNCTUATION),
                    RuleSpec::pattern("[-a-zA-Z0-9]+", TokenType::ATTRIBUTE),
                    RuleSpec::pattern(r"\*", TokenType::ATTRIBUTE),
                ],
            ),
            (
                "media",
                {
                    let mut rules = vec![
                        RuleSpec::pattern(" and ", TokenType::OPERATOR),
                        RuleSpec::pattern(",", TokenType::PUNCTUATION),
                        RuleSpec::pattern("[-a-zA-Z0-9]+", TokenType::ATTRIBUTE),
                        RuleSpec::groups(
                            r"(\()(\s*)([-a-zA-Z0-9]+)(:)([^\)]+)(\s*)(\))",
                            TokenType::TEXT,
                            vec![
                                TokenType::PUNCTUATION,
                                TokenType::WHITESPACE,
                                TokenType::ATTRIBUTE,
                                TokenType::ASSIGNMENT,
                                TokenType::TEXT,
                                TokenType::WHITESPACE,
                                TokenType::PUNCTUATION,
                            ],
                        ),
                    ];
                    rules.extend(trivia());
                    rules.push(
                        RuleSpec::pattern(r"\{", TokenType::PUNCTUATION).with_state("mediaBlock"),
                    );
                    rules
                },
            ),
            (
                "mediaBlock",
                with_trivia(vec![
                    RuleSpec::include("selector"),
                    RuleSpec::include("declarationBlock"),
                    RuleSpec::pattern(r"\}", TokenType::PUNCTUATION).with_state("#pop #pop"),
                ]),
            ),
            (
                "ruleValue",
                vec![
                    RuleSpec::pattern(";", TokenType::PUNCTUATION).with_state("#pop"),
                    RuleSpec::pattern(".*", TokenType::TEXT),
                ],
            ),
            (
                "declarationBlock",
                vec![RuleSpec::pattern(r"\{", TokenType::PUNCTUATION).with_state("declaration")],
            ),
            (
                "declaration",
                with_trivia(vec![
                    RuleSpec::groups(
                        r"([a-zA-Z0-9_-]+)(\s*)(:)",
                        TokenType::TEXT,
                        vec![TokenType::TAG, TokenType::WHITESPACE, TokenType::ASSIGNMENT],
                    )
                    .with_state("declarationValue"),
                    RuleSpec::pattern(r"\}", TokenType::PUNCTUATION).with_state("#pop"),
                    RuleSpec::include("selector"),
                    RuleSpec::include("declarationBlock"),
                ]),
            ),
            (
                "declarationValue",
                vec![
                    RuleSpec::groups(
                        r#"(")([^"]*)(")"#,
                        TokenType::TEXT,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::TEXT,
                            TokenType::PUNCTUATION,
                        ],
                    ),
                    RuleSpec::groups(
                        r"(')([^']*)(')",
                        TokenType::TEXT,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::TEXT,
                            TokenType::PUNCTUATION,
                        ],
                    ),
                    RuleSpec::pattern("[^;]+", TokenType::TEXT),
                    RuleSpec::pattern(",", TokenType::PUNCTUATION),
                    RuleSpec::pattern(";", TokenType::PUNCTUATION).with_state("#pop"),
                ],
            ),
            (
                "whitespace",
                vec![RuleSpec::pattern(r"[ \r\n\f\t]+", TokenType::WHITESPACE)],
            ),
            (
                "singleLineComment",
                vec![RuleSpec::pattern("//.*", TokenType::COMMENT)],
            ),
            (
                "multiLineComment",
                vec![RuleSpec::pattern(r"/\*", TokenType::COMMENT)
                    .with_state("multiLineCommentContents")],
            ),
            (
                "multiLineCommentContents",
                vec![
                    RuleSpec::pattern(r"\*/", TokenType::COMMENT).with_state("#pop"),
                    RuleSpec::pattern(r"(.+?)(\*/)", TokenType::COMMENT).with_state("#pop"),
                    // Rest of the line, newline included
                    RuleSpec::pattern("(?s).+", TokenType::COMMENT),
                ],
            ),
        ])
}
