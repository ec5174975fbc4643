use crate::lexical::{LexerSpec, RuleSpec};
use crate::tokens::TokenType;

/// HTML and XHTML markup
pub fn html() -> LexerSpec {
    LexerSpec::new("html")
        .with_mime_types(["text/html", "application/xhtml+xml"])
        .with_filenames(["*.html", "*.htm", "*.xhtml"])
        .with_states([
            (
                "root",
                vec![
                    RuleSpec::pattern("[^<&]+", TokenType::TEXT),
                    RuleSpec::pattern(r"&\S+?;", TokenType::ENTITY),
                    RuleSpec::pattern("<!--", TokenType::COMMENT).with_state("comment"),
                    RuleSpec::groups(
                        "(<)(![^>]*)(>)",
                        TokenType::TEXT,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::ENTITY,
                            TokenType::PUNCTUATION,
                        ],
                    ),
                    RuleSpec::groups(
                        r"(</?)([\w-]*:?[\w-]+)(\s*)(>)",
                        TokenType::TEXT,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::ENTITY,
                            TokenType::TEXT,
                            TokenType::PUNCTUATION,
                        ],
                    ),
                    RuleSpec::groups(
                        r"(<)([\w-]*:?[\w-]+)(\s*)",
                        TokenType::TEXT,
                        vec![TokenType::PUNCTUATION, TokenType::ENTITY, TokenType::TEXT],
                    )
                    .with_state("tag"),
                ],
            ),
            (
                "comment",
                vec![
                    RuleSpec::pattern("-->", TokenType::COMMENT).with_state("#pop"),
                    RuleSpec::pattern("[^-]+", TokenType::COMMENT),
                    // A dash that does not close the comment
                    RuleSpec::pattern("-", TokenType::COMMENT),
                ],
            ),
            (
                "tag",
                vec![
                    RuleSpec::groups(
                        r"([\w-]+)(=)(\s*)",
                        TokenType::TEXT,
                        vec![TokenType::ATTRIBUTE, TokenType::OPERATOR, TokenType::TEXT],
                    )
                    .with_state("tagAttr"),
                    RuleSpec::pattern(r"[\w-]+\s*", TokenType::ATTRIBUTE),
                    RuleSpec::pattern(r"\s+", TokenType::ENTITY),
                    RuleSpec::groups(
                        r"(/?)(\s*)(>)",
                        TokenType::TEXT,
                        vec![
                            TokenType::PUNCTUATION,
                            TokenType::ENTITY,
                            TokenType::PUNCTUATION,
                        ],
                    )
                    .with_state("#pop"),
                ],
            ),
            (
                "tagAttr",
                vec![
                    RuleSpec::pattern(r#""[^"]*""#, TokenType::STRING).with_state("#pop"),
                    RuleSpec::pattern("'[^']*'", TokenType::STRING).with_state("#pop"),
                    RuleSpec::pattern(r"\w+", TokenType::STRING).with_state("#pop"),
                ],
            ),
        ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokens::Token;

    fn tokenize(input: &str) -> Vec<Token> {
        html().compile().unwrap().tokenize_string(input).unwrap()
    }

    #[test]
    fn test_element_with_attributes() {
        let tokens = tokenize(r#"<a href="/x" hidden>link &amp; more</a>"#);
        let pairs: Vec<_> = tokens
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| (t.value.as_str(), t.token_type.as_str()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("<", "punctuation"),
                ("a", "entity"),
                (" ", "text"),
                ("href", "attribute"),
                ("=", "operator"),
                ("\"/x\"", "string"),
                (" ", "entity"),
                ("hidden", "attribute"),
                (">", "punctuation"),
                ("link ", "text"),
                ("&amp;", "entity"),
                (" more", "text"),
                ("</", "punctuation"),
                ("a", "entity"),
                (">", "punctuation"),
            ]
        );
    }

    #[test]
    fn test_comments_and_doctype() {
        let tokens = tokenize("<!DOCTYPE html>\n<!-- a - b\n-->");
        assert_eq!(tokens[1].value, "!DOCTYPE html");
        assert_eq!(tokens[1].token_type, TokenType::ENTITY);

        let comment: String = tokens
            .iter()
            .filter(|t| t.token_type == TokenType::COMMENT)
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(comment, "<!-- a - b\n-->");
        assert!(tokens.iter().all(|t| t.token_type != TokenType::ERROR));
    }

    #[test]
    fn test_self_closing_tag() {
        let tokens = tokenize("<br/>");
        let values: Vec<_> = tokens
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| t.value.as_str())
            .collect();
        assert_eq!(values, vec!["<", "br", "/", ">"]);
        assert_eq!(tokens.last().unwrap().state, "tag");
    }
}
