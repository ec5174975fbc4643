//! Compiled lexers and the streaming tokenize loop

use super::error::LexerError;
use super::reader::LineReader;
use super::stack::Stack;
use super::state::{MatchOutcome, StateMap};
use crate::config::compile_time::engine::{MAX_LINE_CHUNK, MAX_PENDING_SUBJECT};
use crate::config::runtime::EnginePreferences;
use crate::filters::{Emit, Filter, FilterChain};
use crate::logging::codes;
use crate::tokens::{Token, TokenType};
use glob::{MatchOptions, Pattern};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Glob semantics for filename patterns: `*` never crosses `/`
const FILENAME_MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Counters for one tokenize call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizeStats {
    pub chunks: usize,
    pub tokens: usize,
    pub error_tokens: usize,
    pub max_depth: usize,
}

/// A compiled, immutable lexer
///
/// Every call to [`tokenize`](Lexer::tokenize), [`highlight`](Lexer::highlight)
/// or [`format`](Lexer::format) starts from a fresh `["root"]` stack and
/// fresh filter state, so one lexer can serve many calls, including
/// concurrent ones.
#[derive(Debug, Clone)]
pub struct Lexer {
    name: String,
    states: Arc<StateMap>,
    filters: FilterChain,
    formatter: Option<Arc<dyn Filter>>,
    filenames: Vec<String>,
    filename_patterns: Vec<Pattern>,
    media_types: Vec<String>,
    preferences: EnginePreferences,
    line_chunk: usize,
    pending_limit: usize,
}

impl Lexer {
    pub(crate) fn new(
        name: String,
        states: StateMap,
        filters: FilterChain,
        formatter: Option<Arc<dyn Filter>>,
        filenames: Vec<String>,
        filename_patterns: Vec<Pattern>,
        media_types: Vec<String>,
    ) -> Self {
        Self {
            name,
            states: Arc::new(states),
            filters,
            formatter,
            filenames,
            filename_patterns,
            media_types,
            preferences: EnginePreferences::quiet(),
            line_chunk: MAX_LINE_CHUNK,
            pending_limit: MAX_PENDING_SUBJECT,
        }
    }

    pub fn with_preferences(mut self, preferences: EnginePreferences) -> Self {
        self.preferences = preferences;
        self
    }

    /// Override the read size and the pending-line limit, which default to
    /// the compile-time `max_line_chunk` and `max_pending_subject`
    pub fn with_line_limits(mut self, line_chunk: usize, pending_limit: usize) -> Self {
        self.line_chunk = line_chunk;
        self.pending_limit = pending_limit.max(line_chunk);
        self
    }

    pub fn preferences(&self) -> &EnginePreferences {
        &self.preferences
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn states(&self) -> &StateMap {
        &self.states
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn formatter(&self) -> Option<&Arc<dyn Filter>> {
        self.formatter.as_ref()
    }

    /// Filename glob patterns, e.g. `*.json`
    pub fn filenames(&self) -> &[String] {
        &self.filenames
    }

    /// Media types, e.g. `application/json`
    pub fn media_types(&self) -> &[String] {
        &self.media_types
    }

    /// Emit the raw token stream of `input`, ending with the end token
    pub fn tokenize(
        &self,
        input: &mut dyn BufRead,
        emit: &mut dyn FnMut(Token) -> Result<(), LexerError>,
    ) -> Result<(), LexerError> {
        self.run(input, Box::new(move |token: Token| emit(token)))
    }

    /// Like [`tokenize`](Lexer::tokenize), passing tokens through the
    /// lexer's filters
    pub fn highlight(
        &self,
        input: &mut dyn BufRead,
        emit: &mut dyn FnMut(Token) -> Result<(), LexerError>,
    ) -> Result<(), LexerError> {
        let out: Emit<'_> = Box::new(move |token: Token| emit(token));
        self.run(input, self.filters.wrap(out))
    }

    /// Like [`highlight`](Lexer::highlight), then through the formatter
    pub fn format(
        &self,
        input: &mut dyn BufRead,
        emit: &mut dyn FnMut(Token) -> Result<(), LexerError>,
    ) -> Result<(), LexerError> {
        let out: Emit<'_> = Box::new(move |token: Token| emit(token));
        let out = match &self.formatter {
            Some(formatter) => formatter.filter(out),
            None => out,
        };
        self.run(input, self.filters.wrap(out))
    }

    /// Raw tokens of a string, without the end token
    pub fn tokenize_string(&self, input: &str) -> Result<Vec<Token>, LexerError> {
        let mut tokens = Vec::new();
        self.tokenize(&mut input.as_bytes(), &mut |token: Token| {
            if !token.is_end() {
                tokens.push(token);
            }
            Ok(())
        })?;
        Ok(tokens)
    }

    /// Whether the base name of `filename` matches one of the patterns
    pub fn accepts_filename(&self, filename: &str) -> Result<bool, LexerError> {
        let base = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(filename);

        Ok(self
            .filename_patterns
            .iter()
            .any(|pattern| pattern.matches_with(base, FILENAME_MATCH_OPTIONS)))
    }

    /// Whether `media_type` names one of the lexer's media types;
    /// parameters such as `charset` are ignored
    pub fn accepts_media_type(&self, media_type: &str) -> Result<bool, LexerError> {
        let essence = media_type_essence(media_type)?;
        Ok(self
            .media_types
            .iter()
            .any(|accepted| accepted.eq_ignore_ascii_case(&essence)))
    }

    /// Drive the engine, then emit the end token exactly once
    fn run(&self, input: &mut dyn BufRead, mut emit: Emit<'_>) -> Result<(), LexerError> {
        let mut stats = TokenizeStats::default();
        let driven = self.drive(input, &mut emit, &mut stats);
        let finished = emit(Token::end());

        // The first error wins
        driven.and(finished)?;

        if self.preferences.log_statistics {
            crate::log_success!(codes::success::TOKENIZATION_COMPLETE, "Tokenization complete",
                "lexer" => &self.name,
                "chunks" => stats.chunks,
                "tokens" => stats.tokens,
                "error_tokens" => stats.error_tokens,
                "max_depth" => stats.max_depth
            );
        }
        Ok(())
    }

    fn drive(
        &self,
        input: &mut dyn BufRead,
        emit: &mut Emit<'_>,
        stats: &mut TokenizeStats,
    ) -> Result<(), LexerError> {
        let mut reader = LineReader::new(input, self.line_chunk);
        let mut stack = Stack::new().with_tracing(self.preferences.trace_transitions);
        let mut subject = String::new();
        stats.max_depth = stack.len();

        loop {
            let chunk = reader.next_chunk()?;
            stats.chunks += 1;
            subject.push_str(&chunk.text);

            let mut eol = chunk.eol;
            if !eol && subject.len() >= self.pending_limit {
                crate::log_warning!(code = codes::input::PENDING_LIMIT_REACHED,
                    "Line exceeds pending limit, matching it as a complete line",
                    "lexer" => &self.name,
                    "bytes" => subject.len()
                );
                eol = true;
            }

            if subject.is_empty() {
                if reader.is_exhausted() {
                    return Ok(());
                }
                continue;
            }

            let mut cursor = 0;
            while cursor < subject.len() {
                let Some(active) = stack.peek() else {
                    return Ok(());
                };
                let (state_name, state) =
                    self.states
                        .get_key_value(active)
                        .ok_or_else(|| LexerError::UnknownState {
                            state: active.to_string(),
                            referenced_by: self.name.clone(),
                        })?;

                let remainder = &subject[cursor..];
                match state.match_at(&self.states, remainder)? {
                    MatchOutcome::Matched {
                        consumed,
                        rule,
                        tokens,
                    } => {
                        for token in tokens {
                            emit_tagged(token, state_name, emit, stats)?;
                        }
                        stack.apply(rule.next())?;
                        stats.max_depth = stats.max_depth.max(stack.len());
                        cursor += consumed;

                        if stack.is_empty() {
                            return Ok(());
                        }
                    }
                    MatchOutcome::Skip(offset) => {
                        let unmatched = Token::new(&remainder[..offset], TokenType::ERROR);
                        emit_tagged(unmatched, state_name, emit, stats)?;
                        cursor += offset;
                    }
                    MatchOutcome::NoMatch if !eol => {
                        // Wait for the rest of the line
                        stack.reset();
                        break;
                    }
                    MatchOutcome::NoMatch => {
                        let unmatched = Token::new(remainder, TokenType::ERROR);
                        emit_tagged(unmatched, state_name, emit, stats)?;
                        cursor = subject.len();
                    }
                }
            }

            subject.drain(..cursor);
            if subject.is_empty() && reader.is_exhausted() {
                return Ok(());
            }
        }
    }
}

fn emit_tagged(
    mut token: Token,
    state: &str,
    emit: &mut Emit<'_>,
    stats: &mut TokenizeStats,
) -> Result<(), LexerError> {
    if token.state.is_empty() {
        token.state = state.to_string();
    }
    if token.token_type == TokenType::ERROR {
        stats.error_tokens += 1;
    }
    stats.tokens += 1;
    emit(token)
}

/// Lower-cased `type/subtype` of a media type, without parameters
pub fn media_type_essence(media_type: &str) -> Result<String, LexerError> {
    let parsed: mime::Mime =
        media_type
            .trim()
            .parse()
            .map_err(|err: mime::FromStrError| LexerError::InvalidMediaType {
                media_type: media_type.to_string(),
                message: err.to_string(),
            })?;
    Ok(parsed.essence_str().to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterSpec;
    use crate::lexical::spec::{LexerSpec, RuleSpec};
    use assert_matches::assert_matches;
    use std::io::{self, Cursor, Read};

    fn lexer(states: Vec<(&str, Vec<RuleSpec>)>) -> Lexer {
        LexerSpec::new("test")
            .with_states(states)
            .compile()
            .unwrap()
    }

    fn pairs(tokens: &[Token]) -> Vec<(&str, &str, &str)> {
        tokens
            .iter()
            .map(|t| (t.value.as_str(), t.token_type.as_str(), t.state.as_str()))
            .collect()
    }

    fn collect_all(
        lexer: &Lexer,
        input: &mut dyn BufRead,
    ) -> (Vec<Token>, Result<(), LexerError>) {
        let mut tokens = Vec::new();
        let result = lexer.tokenize(input, &mut |token: Token| {
            tokens.push(token);
            Ok(())
        });
        (tokens, result)
    }

    #[test]
    fn test_single_literal() {
        let lexer = lexer(vec![(
            "root",
            vec![RuleSpec::pattern("true|false|null", TokenType::LITERAL)],
        )]);
        let (tokens, result) = collect_all(&lexer, &mut "true".as_bytes());

        result.unwrap();
        assert_eq!(pairs(&tokens), vec![("true", "literal", "root"), ("", "", "")]);
    }

    #[test]
    fn test_unmatched_input_becomes_error_token() {
        let lexer = lexer(vec![("root", vec![RuleSpec::pattern("a", TokenType::TEXT)])]);
        let tokens = lexer.tokenize_string("zzz").unwrap();
        assert_eq!(pairs(&tokens), vec![("zzz", "error", "root")]);
    }

    #[test]
    fn test_skipped_prefix_becomes_error_token() {
        let lexer = lexer(vec![("root", vec![RuleSpec::pattern("a+", TokenType::TEXT)])]);
        let tokens = lexer.tokenize_string("zzaa").unwrap();
        assert_eq!(
            pairs(&tokens),
            vec![("zz", "error", "root"), ("aa", "text", "root")]
        );
    }

    #[test]
    fn test_include_retags_tokens() {
        let lexer = lexer(vec![
            ("root", vec![RuleSpec::include("inner")]),
            ("inner", vec![RuleSpec::pattern("a", TokenType::TEXT)]),
        ]);
        let tokens = lexer.tokenize_string("a").unwrap();
        assert_eq!(pairs(&tokens), vec![("a", "text", "inner")]);
    }

    #[test]
    fn test_transitions_and_stack_empty_termination() {
        let lexer = lexer(vec![
            (
                "root",
                vec![RuleSpec::pattern(r"\(", TokenType::PUNCTUATION).with_state("inner")],
            ),
            (
                "inner",
                vec![
                    RuleSpec::pattern(r"\w+", TokenType::TEXT),
                    RuleSpec::pattern(r"\)", TokenType::PUNCTUATION).with_state("#pop #pop"),
                ],
            ),
        ]);
        let (tokens, result) = collect_all(&lexer, &mut "(ab)ignored".as_bytes());

        result.unwrap();
        assert_eq!(
            pairs(&tokens),
            vec![
                ("(", "punctuation", "root"),
                ("ab", "text", "inner"),
                (")", "punctuation", "inner"),
                ("", "", ""),
            ]
        );
    }

    #[test]
    fn test_matches_span_lines_through_state() {
        let lexer = lexer(vec![
            (
                "root",
                vec![
                    RuleSpec::pattern(r"/\*", TokenType::COMMENT).with_state("comment"),
                    RuleSpec::pattern(r"\s+", TokenType::WHITESPACE),
                    RuleSpec::pattern(r"\w+", TokenType::TEXT),
                ],
            ),
            (
                "comment",
                vec![
                    RuleSpec::pattern(r"\*/", TokenType::COMMENT).with_state("#pop"),
                    RuleSpec::pattern(r"[^*]+", TokenType::COMMENT),
                ],
            ),
        ]);
        let tokens = lexer.tokenize_string("a /* b\nc */ d\n").unwrap();
        let joined: String = tokens.iter().map(|t| t.value.as_str()).collect();

        assert_eq!(joined, "a /* b\nc */ d\n");
        assert_eq!(tokens[2].state, "root");
        assert_eq!(tokens[3].state, "comment");
        assert_eq!(tokens.last().unwrap().token_type, TokenType::WHITESPACE);
    }

    #[test]
    fn test_empty_input_emits_only_end_token() {
        let lexer = lexer(vec![("root", vec![RuleSpec::pattern("a", TokenType::TEXT)])]);
        let (tokens, result) = collect_all(&lexer, &mut "".as_bytes());
        result.unwrap();
        assert_eq!(tokens, vec![Token::end()]);
    }

    #[test]
    fn test_end_token_once_on_callback_error() {
        let lexer = lexer(vec![("root", vec![RuleSpec::pattern(".", TokenType::TEXT)])]);
        let mut seen = Vec::new();
        let result = lexer.tokenize(&mut "abc".as_bytes(), &mut |token: Token| {
            let is_end = token.is_end();
            seen.push(token);
            if is_end {
                Ok(())
            } else {
                Err(LexerError::downstream("closed"))
            }
        });

        assert_matches!(result, Err(LexerError::Downstream { .. }));
        assert_eq!(seen.len(), 2);
        assert!(seen[1].is_end());
    }

    #[test]
    fn test_end_token_once_on_rule_error() {
        let lexer = lexer(vec![(
            "root",
            vec![RuleSpec::groups(r"(a)(b)", TokenType::TEXT, vec![TokenType::TAG])],
        )]);
        let (tokens, result) = collect_all(&lexer, &mut "ab".as_bytes());

        assert_matches!(result, Err(LexerError::MisconfiguredRule { .. }));
        assert_eq!(tokens, vec![Token::end()]);
    }

    struct FailingReader {
        served: bool,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.served {
                return Err(io::Error::new(io::ErrorKind::Other, "disk on fire"));
            }
            self.served = true;
            let line = b"a\n";
            buf[..line.len()].copy_from_slice(line);
            Ok(line.len())
        }
    }

    #[test]
    fn test_end_token_once_on_reader_error() {
        let lexer = lexer(vec![(
            "root",
            vec![RuleSpec::pattern(r"a\n", TokenType::TEXT)],
        )]);
        let mut input = io::BufReader::new(FailingReader { served: false });
        let (tokens, result) = collect_all(&lexer, &mut input);

        assert_matches!(result, Err(LexerError::Io(_)));
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].value, "a\n");
        assert_eq!(tokens.iter().filter(|t| t.is_end()).count(), 1);
        assert!(tokens[1].is_end());
    }

    #[test]
    fn test_partial_line_waits_for_more_input() {
        let lexer = lexer(vec![(
            "root",
            vec![RuleSpec::pattern(r"[a-z]+\n", TokenType::TEXT)],
        )]);
        // Chunked reads: the rule only matches once the newline arrives
        let long = format!("{}\n", "x".repeat(MAX_LINE_CHUNK + 10));
        let tokens = lexer.tokenize_string(&long).unwrap();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].value, long);
    }

    #[test]
    fn test_partial_line_without_match_restarts_from_root() {
        let lexer = lexer(vec![
            (
                "root",
                vec![
                    RuleSpec::pattern(r"\(", TokenType::PUNCTUATION).with_state("group"),
                    RuleSpec::pattern("[0-9]+", TokenType::NUMBER),
                ],
            ),
            (
                "group",
                vec![RuleSpec::pattern(r"[0-9]+\)", TokenType::STRING).with_state("#pop")],
            ),
        ]);

        // The group cannot close within the first read, so the rest of the
        // line is lexed from root
        let digits = "1".repeat(MAX_LINE_CHUNK + 10);
        let tokens = lexer.tokenize_string(&format!("({})\n", digits)).unwrap();
        assert_eq!(
            pairs(&tokens),
            vec![
                ("(", "punctuation", "root"),
                (digits.as_str(), "number", "root"),
                (")\n", "error", "root"),
            ]
        );

        let tokens = lexer.tokenize_string("(12)\n").unwrap();
        assert_eq!(
            pairs(&tokens),
            vec![
                ("(", "punctuation", "root"),
                ("12)", "string", "group"),
                ("\n", "error", "root"),
            ]
        );
    }

    #[test]
    fn test_pending_limit_forces_line_end() {
        let lexer = lexer(vec![(
            "root",
            vec![RuleSpec::pattern(r"[a-z]+\n", TokenType::TEXT)],
        )]);
        let input = format!("{}\n", "a".repeat(40));

        let tokens = lexer.tokenize_string(&input).unwrap();
        assert_eq!(pairs(&tokens), vec![(input.as_str(), "text", "root")]);

        let limited = lexer.with_line_limits(8, 16);
        let forced = "a".repeat(16);
        let tail = format!("{}\n", "a".repeat(8));
        let tokens = limited.tokenize_string(&input).unwrap();
        assert_eq!(
            pairs(&tokens),
            vec![
                (forced.as_str(), "error", "root"),
                (forced.as_str(), "error", "root"),
                (tail.as_str(), "text", "root"),
            ]
        );
    }

    #[test]
    fn test_compiled_lexer_ignores_environment_preferences() {
        let lexer = lexer(vec![("root", vec![RuleSpec::pattern("a", TokenType::TEXT)])]);
        assert_eq!(lexer.preferences(), &EnginePreferences::quiet());

        let tracing = EnginePreferences {
            log_statistics: true,
            trace_transitions: true,
        };
        let lexer = lexer.with_preferences(tracing.clone());
        assert_eq!(lexer.preferences(), &tracing);
        assert_eq!(pairs(&lexer.tokenize_string("a").unwrap()), vec![("a", "text", "root")]);
    }

    #[test]
    fn test_highlight_and_format_apply_filters() {
        let lexer = LexerSpec::new("test")
            .with_states(vec![(
                "root",
                vec![
                    RuleSpec::pattern(r"\s+", TokenType::WHITESPACE),
                    RuleSpec::pattern(r"[{}]", TokenType::PUNCTUATION),
                    RuleSpec::pattern(r"\w", TokenType::TEXT),
                ],
            )])
            .with_filters(vec![FilterSpec::MergeAdjacent])
            .with_formatter(FilterSpec::indent("  "))
            .compile()
            .unwrap();

        let mut raw = Vec::new();
        lexer
            .tokenize(&mut "{ab }".as_bytes(), &mut |t: Token| {
                raw.push(t.value);
                Ok(())
            })
            .unwrap();
        assert_eq!(raw, vec!["{", "a", "b", " ", "}", ""]);

        let mut highlighted = Vec::new();
        lexer
            .highlight(&mut "{ab }".as_bytes(), &mut |t: Token| {
                highlighted.push(t.value);
                Ok(())
            })
            .unwrap();
        assert_eq!(highlighted, vec!["{", "ab", " ", "}", ""]);

        let mut formatted = String::new();
        lexer
            .format(&mut "{ab }".as_bytes(), &mut |t: Token| {
                formatted.push_str(&t.value);
                Ok(())
            })
            .unwrap();
        assert_eq!(formatted, "{\n  ab\n}");
    }

    #[test]
    fn test_stack_overflow_is_reported() {
        let lexer = lexer(vec![(
            "root",
            vec![RuleSpec::pattern("a", TokenType::TEXT).with_state("root")],
        )]);
        let input = "a".repeat(crate::config::compile_time::engine::MAX_STACK_DEPTH + 1);
        let (tokens, result) = collect_all(&lexer, &mut Cursor::new(input));

        assert_matches!(result, Err(LexerError::StackOverflow { .. }));
        assert!(tokens.last().unwrap().is_end());
    }

    #[test]
    fn test_accepts_filename() {
        let lexer = LexerSpec::new("json")
            .with_states(vec![("root", vec![RuleSpec::pattern("x", TokenType::TEXT)])])
            .with_filenames(vec!["*.json", "Pipfile.lock"])
            .compile()
            .unwrap();

        assert!(lexer.accepts_filename("data.json").unwrap());
        assert!(lexer.accepts_filename("/tmp/nested/data.json").unwrap());
        assert!(lexer.accepts_filename(".hidden.json").unwrap());
        assert!(lexer.accepts_filename("Pipfile.lock").unwrap());
        assert!(!lexer.accepts_filename("data.jsonl").unwrap());
        assert!(!lexer.accepts_filename("data.JSON").unwrap());
    }

    #[test]
    fn test_accepts_media_type() {
        let lexer = LexerSpec::new("json")
            .with_states(vec![("root", vec![RuleSpec::pattern("x", TokenType::TEXT)])])
            .with_mime_types(vec!["application/json"])
            .compile()
            .unwrap();

        assert!(lexer.accepts_media_type("application/json").unwrap());
        assert!(lexer
            .accepts_media_type("Application/JSON; charset=utf-8")
            .unwrap());
        assert!(!lexer.accepts_media_type("text/html").unwrap());
        assert_matches!(
            lexer.accepts_media_type("not a media type"),
            Err(LexerError::InvalidMediaType { .. })
        );
    }
}
