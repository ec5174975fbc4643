//! Declarative lexer specifications
//!
//! A [`LexerSpec`] is plain data: it can be written in Rust, or loaded from
//! TOML or JSON. [`LexerSpec::compile`] validates it and produces a
//! [`Lexer`].
//!
//! ```toml
//! name = "ini"
//! filenames = ["*.ini"]
//!
//! [[states.root]]
//! regexp = '(\w+)(\s*)(=)'
//! type = "text"
//! subtypes = ["attribute", "whitespace", "assignment"]
//! state = "value"
//!
//! [[states.value]]
//! regexp = '[^\n]*\n?'
//! type = "string"
//! state = "#pop"
//! ```

use super::error::LexerError;
use super::lexer::{media_type_essence, Lexer};
use super::rule::{IncludeRule, PatternRule, Rule, Transition};
use super::stack::ROOT_STATE;
use super::state::{State, StateMap};
use crate::filters::{FilterChain, FilterSpec};
use crate::logging::codes;
use crate::tokens::TokenType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// One rule as written in a specification
///
/// Exactly one of `regexp` and `include` must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub regexp: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub subtypes: Vec<TokenType>,

    /// Space-separated transitions, e.g. `"#pop objectValue"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub include: Option<String>,
}

impl RuleSpec {
    /// Whole match as one token
    pub fn pattern(regexp: impl Into<String>, token_type: TokenType) -> Self {
        Self {
            regexp: Some(regexp.into()),
            token_type: Some(token_type),
            ..Self::default()
        }
    }

    /// One token per capture group; unmatched text takes `token_type`
    pub fn groups(
        regexp: impl Into<String>,
        token_type: TokenType,
        subtypes: Vec<TokenType>,
    ) -> Self {
        Self {
            regexp: Some(regexp.into()),
            token_type: Some(token_type),
            subtypes,
            ..Self::default()
        }
    }

    pub fn include(state: impl Into<String>) -> Self {
        Self {
            include: Some(state.into()),
            ..Self::default()
        }
    }

    pub fn with_state(mut self, transitions: impl Into<String>) -> Self {
        self.state = Some(transitions.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LexerSpec {
    pub name: String,
    pub mime_types: Vec<String>,
    pub filenames: Vec<String>,
    pub states: BTreeMap<String, Vec<RuleSpec>>,
    pub filters: Vec<FilterSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<FilterSpec>,
}

impl LexerSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_mime_types<S: Into<String>>(mut self, types: impl IntoIterator<Item = S>) -> Self {
        self.mime_types.extend(types.into_iter().map(Into::into));
        self
    }

    pub fn with_filenames<S: Into<String>>(
        mut self,
        patterns: impl IntoIterator<Item = S>,
    ) -> Self {
        self.filenames.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn with_states<S: Into<String>>(
        mut self,
        states: impl IntoIterator<Item = (S, Vec<RuleSpec>)>,
    ) -> Self {
        self.states
            .extend(states.into_iter().map(|(name, rules)| (name.into(), rules)));
        self
    }

    pub fn with_filters(mut self, filters: Vec<FilterSpec>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_formatter(mut self, formatter: FilterSpec) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn from_toml_str(source: &str) -> Result<Self, LexerError> {
        toml::from_str(source).map_err(|e| LexerError::InvalidSpec {
            message: e.to_string(),
        })
    }

    pub fn from_json_str(source: &str) -> Result<Self, LexerError> {
        serde_json::from_str(source).map_err(|e| LexerError::InvalidSpec {
            message: e.to_string(),
        })
    }

    /// Load a `.toml` or `.json` specification file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LexerError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Self::from_toml_str(&source),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&source),
            _ => Err(LexerError::InvalidSpec {
                message: format!(
                    "cannot tell the format of '{}': expected a .toml or .json file",
                    path.display()
                ),
            }),
        }
    }

    /// Validate the specification and build the lexer
    pub fn compile(&self) -> Result<Lexer, LexerError> {
        if !self.states.contains_key(ROOT_STATE) {
            return Err(LexerError::MissingRootState {
                lexer: self.name.clone(),
            });
        }

        let mut states = StateMap::new();
        for (name, rules) in &self.states {
            let compiled = rules
                .iter()
                .enumerate()
                .map(|(index, rule)| self.compile_rule(name, index, rule))
                .collect::<Result<Vec<_>, _>>()?;
            states.insert(name.clone(), State::new(compiled));
        }

        self.check_include_cycles()?;

        let filename_patterns = self
            .filenames
            .iter()
            .map(|pattern| {
                glob::Pattern::new(pattern).map_err(|e| LexerError::InvalidFilenamePattern {
                    lexer: self.name.clone(),
                    pattern: pattern.clone(),
                    message: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let media_types = self
            .mime_types
            .iter()
            .map(|media_type| media_type_essence(media_type))
            .collect::<Result<Vec<_>, _>>()?;

        let filters = FilterChain::new(self.filters.iter().map(FilterSpec::build).collect());
        let formatter = self.formatter.as_ref().map(FilterSpec::build);

        crate::log_success!(codes::success::LEXER_COMPILED, "Lexer compiled",
            "lexer" => &self.name,
            "states" => states.len(),
            "filters" => filters.len()
        );

        Ok(Lexer::new(
            self.name.clone(),
            states,
            filters,
            formatter,
            self.filenames.clone(),
            filename_patterns,
            media_types,
        ))
    }

    fn compile_rule(&self, state: &str, index: usize, rule: &RuleSpec) -> Result<Rule, LexerError> {
        match (&rule.regexp, &rule.include) {
            (None, None) => Err(LexerError::EmptyRule {
                state: state.to_string(),
                index,
            }),
            (Some(_), Some(_)) => Err(LexerError::InvalidSpec {
                message: format!(
                    "rule {} in state '{}' has both a regexp and an include",
                    index, state
                ),
            }),
            (None, Some(target)) => {
                if rule.state.is_some() {
                    return Err(LexerError::InvalidSpec {
                        message: format!(
                            "include rule {} in state '{}' cannot change state",
                            index, state
                        ),
                    });
                }
                self.require_state(target, state)?;
                Ok(Rule::Include(IncludeRule::new(target.clone())))
            }
            (Some(regexp), None) => {
                let regex = Regex::new(regexp).map_err(|e| LexerError::InvalidRegex {
                    state: state.to_string(),
                    index,
                    pattern: regexp.clone(),
                    message: e.to_string(),
                })?;

                let next = Transition::parse_list(rule.state.as_deref().unwrap_or_default());
                for transition in &next {
                    if let Transition::Push(target) = transition {
                        self.require_state(target, state)?;
                    }
                }

                Ok(Rule::Pattern(PatternRule::new(
                    regex,
                    rule.token_type.clone().unwrap_or(TokenType::NONE),
                    rule.subtypes.clone(),
                    next,
                )))
            }
        }
    }

    fn require_state(&self, target: &str, referenced_by: &str) -> Result<(), LexerError> {
        if self.states.contains_key(target) {
            Ok(())
        } else {
            Err(LexerError::UnknownState {
                state: target.to_string(),
                referenced_by: referenced_by.to_string(),
            })
        }
    }

    /// Includes that loop back on themselves would never consume input
    fn check_include_cycles(&self) -> Result<(), LexerError> {
        let mut finished = HashSet::new();
        for name in self.states.keys() {
            let mut path = Vec::new();
            self.visit_includes(name, &mut path, &mut finished)?;
        }
        Ok(())
    }

    fn visit_includes<'s>(
        &'s self,
        name: &'s str,
        path: &mut Vec<&'s str>,
        finished: &mut HashSet<&'s str>,
    ) -> Result<(), LexerError> {
        if finished.contains(name) {
            return Ok(());
        }

        if let Some(start) = path.iter().position(|visited| *visited == name) {
            let mut cycle: Vec<String> = path[start..].iter().map(|s| s.to_string()).collect();
            cycle.push(name.to_string());
            return Err(LexerError::IncludeCycle { path: cycle });
        }

        path.push(name);
        for rule in self.states.get(name).into_iter().flatten() {
            if let Some(target) = rule.include.as_deref() {
                self.visit_includes(target, path, finished)?;
            }
        }
        path.pop();

        finished.insert(name);
        Ok(())
    }
}
