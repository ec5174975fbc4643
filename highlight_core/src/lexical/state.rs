//! States and leftmost-earliest arbitration between their rules

use super::error::LexerError;
use super::rule::{PatternRule, Rule};
use crate::tokens::Token;
use regex::Captures;
use std::collections::HashMap;

/// Ordered rules; declaration order breaks ties
#[derive(Debug, Clone, Default)]
pub struct State {
    rules: Vec<Rule>,
}

/// Result of matching a state against the head of a subject
#[derive(Debug)]
pub enum MatchOutcome<'r> {
    /// A rule matched at offset 0
    Matched {
        consumed: usize,
        rule: &'r PatternRule,
        tokens: Vec<Token>,
    },
    /// The nearest rule match starts this many bytes in
    Skip(usize),
    NoMatch,
}

/// Winning rule of a find, with the state that declared it when it was
/// reached through an include
struct Candidate<'r, 's> {
    offset: usize,
    rule: &'r PatternRule,
    origin: Option<&'r str>,
    captures: Captures<'s>,
}

impl State {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Earliest offset at which any rule of this state matches
    pub fn find(&self, states: &StateMap, subject: &str) -> Option<usize> {
        self.find_candidate(states, subject).map(|c| c.offset)
    }

    fn find_candidate<'r, 's>(
        &'r self,
        states: &'r StateMap,
        subject: &'s str,
    ) -> Option<Candidate<'r, 's>> {
        let mut best: Option<Candidate<'r, 's>> = None;

        for rule in &self.rules {
            let candidate = match rule {
                Rule::Pattern(pattern) => pattern.find(subject).map(|captures| Candidate {
                    offset: captures.get(0).map_or(0, |m| m.start()),
                    rule: pattern,
                    origin: None,
                    captures,
                }),
                Rule::Include(include) => states
                    .get_key_value(include.target())
                    .and_then(|(name, target)| {
                        target.find_candidate(states, subject).map(|mut candidate| {
                            // Innermost include keeps its name
                            candidate.origin.get_or_insert(name.as_str());
                            candidate
                        })
                    }),
            };

            if let Some(candidate) = candidate {
                if best.as_ref().map_or(true, |b| candidate.offset < b.offset) {
                    let at_start = candidate.offset == 0;
                    best = Some(candidate);
                    if at_start {
                        break;
                    }
                }
            }
        }

        best
    }

    /// Match the head of `subject` against the rules of this state
    ///
    /// Tokens produced through an include carry the included state's name;
    /// tokens from the state's own rules are left untagged for the caller.
    pub fn match_at<'r>(
        &'r self,
        states: &'r StateMap,
        subject: &str,
    ) -> Result<MatchOutcome<'r>, LexerError> {
        let Some(candidate) = self.find_candidate(states, subject) else {
            return Ok(MatchOutcome::NoMatch);
        };

        if candidate.offset > 0 {
            return Ok(MatchOutcome::Skip(candidate.offset));
        }

        let consumed = candidate.captures.get(0).map_or(0, |m| m.end());
        let mut tokens = candidate.rule.tokens(&candidate.captures)?;
        if let Some(origin) = candidate.origin {
            for token in &mut tokens {
                token.state = origin.to_string();
            }
        }

        Ok(MatchOutcome::Matched {
            consumed,
            rule: candidate.rule,
            tokens,
        })
    }
}

/// Named states of one compiled lexer
#[derive(Debug, Clone, Default)]
pub struct StateMap {
    states: HashMap<String, State>,
}

impl StateMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, state: State) {
        self.states.insert(name.into(), state);
    }

    pub fn get(&self, name: &str) -> Option<&State> {
        self.states.get(name)
    }

    pub(crate) fn get_key_value(&self, name: &str) -> Option<(&String, &State)> {
        self.states.get_key_value(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.states.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.states.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexical::rule::{IncludeRule, Transition};
    use crate::tokens::TokenType;
    use assert_matches::assert_matches;
    use regex::Regex;

    fn pattern(re: &str, token_type: TokenType) -> Rule {
        Rule::Pattern(PatternRule::new(
            Regex::new(re).unwrap(),
            token_type,
            vec![],
            vec![],
        ))
    }

    fn include(target: &str) -> Rule {
        Rule::Include(IncludeRule::new(target))
    }

    #[test]
    fn test_leftmost_match_wins_over_declaration_order() {
        let state = State::new(vec![
            pattern("b", TokenType::TAG),
            pattern("a", TokenType::TEXT),
        ]);
        let states = StateMap::new();

        assert_eq!(state.find(&states, "xab"), Some(1));
        assert_matches!(state.match_at(&states, "xab"), Ok(MatchOutcome::Skip(1)));

        let outcome = state.match_at(&states, "ab").unwrap();
        assert_matches!(outcome, MatchOutcome::Matched { consumed: 1, ref tokens, .. }
            if tokens[0].token_type == TokenType::TEXT);
    }

    #[test]
    fn test_ties_go_to_first_declared_rule() {
        let state = State::new(vec![
            pattern("ab", TokenType::TAG),
            pattern("abc", TokenType::TEXT),
        ]);
        let states = StateMap::new();

        let outcome = state.match_at(&states, "abc").unwrap();
        assert_matches!(outcome, MatchOutcome::Matched { consumed: 2, ref tokens, .. }
            if tokens[0].token_type == TokenType::TAG);
    }

    #[test]
    fn test_no_match() {
        let state = State::new(vec![pattern("a", TokenType::TEXT)]);
        assert_matches!(
            state.match_at(&StateMap::new(), "zzz"),
            Ok(MatchOutcome::NoMatch)
        );
    }

    #[test]
    fn test_include_tags_tokens_with_included_state() {
        let mut states = StateMap::new();
        states.insert("inner", State::new(vec![pattern("a", TokenType::TEXT)]));
        let outer = State::new(vec![include("inner")]);

        let outcome = outer.match_at(&states, "a").unwrap();
        let MatchOutcome::Matched { tokens, .. } = outcome else {
            panic!("expected a match");
        };
        assert_eq!(tokens[0].state, "inner");
    }

    #[test]
    fn test_nested_include_keeps_innermost_state() {
        let mut states = StateMap::new();
        states.insert("leaf", State::new(vec![pattern("a", TokenType::TEXT)]));
        states.insert("middle", State::new(vec![include("leaf")]));
        let outer = State::new(vec![include("middle")]);

        let MatchOutcome::Matched { tokens, .. } = outer.match_at(&states, "a").unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(tokens[0].state, "leaf");
    }

    #[test]
    fn test_include_competes_on_offset() {
        let mut states = StateMap::new();
        states.insert("inner", State::new(vec![pattern("b", TokenType::TAG)]));
        let outer = State::new(vec![include("inner"), pattern("a", TokenType::TEXT)]);

        let MatchOutcome::Matched { tokens, rule, .. } = outer.match_at(&states, "ab").unwrap()
        else {
            panic!("expected a match");
        };
        assert_eq!(tokens[0].token_type, TokenType::TEXT);
        assert!(tokens[0].state.is_empty());
        assert!(rule.next().is_empty());
    }

    #[test]
    fn test_matched_rule_exposes_transitions() {
        let state = State::new(vec![Rule::Pattern(PatternRule::new(
            Regex::new(r"\{").unwrap(),
            TokenType::PUNCTUATION,
            vec![],
            Transition::parse_list("object"),
        ))]);

        let states = StateMap::new();
        let MatchOutcome::Matched { rule, .. } = state.match_at(&states, "{}").unwrap() else {
            panic!("expected a match");
        };
        assert_eq!(rule.next(), &[Transition::Push("object".to_string())]);
    }
}
