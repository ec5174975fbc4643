//! Tokenizer registry
//!
//! Hosts build a [`TokenizerRegistry`], register the tokenizers they want
//! and look them up by name, filename or media type. Lookups walk the
//! registry in name order, so the first match is deterministic.

use crate::config::runtime::EnginePreferences;
use crate::lexical::{Lexer, LexerError};
use crate::logging::codes;
use crate::tokens::Token;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::io::BufRead;
use std::sync::Arc;

/// Emit callback handed to a tokenizer
pub type EmitFn<'a> = &'a mut dyn FnMut(Token) -> Result<(), LexerError>;

/// Something that turns input into a token stream
pub trait Tokenizer: Send + Sync {
    fn name(&self) -> &str;

    /// Raw tokens, ending with the end token
    fn tokenize(&self, input: &mut dyn BufRead, emit: EmitFn<'_>) -> Result<(), LexerError>;

    /// Tokens passed through the tokenizer's filters
    fn highlight(&self, input: &mut dyn BufRead, emit: EmitFn<'_>) -> Result<(), LexerError>;

    /// Filtered tokens passed through the tokenizer's formatter
    fn format(&self, input: &mut dyn BufRead, emit: EmitFn<'_>) -> Result<(), LexerError>;

    fn accepts_filename(&self, filename: &str) -> Result<bool, LexerError>;

    fn accepts_media_type(&self, media_type: &str) -> Result<bool, LexerError>;

    fn filenames(&self) -> &[String];

    fn media_types(&self) -> &[String];
}

impl Tokenizer for Lexer {
    fn name(&self) -> &str {
        Lexer::name(self)
    }

    fn tokenize(&self, input: &mut dyn BufRead, emit: EmitFn<'_>) -> Result<(), LexerError> {
        Lexer::tokenize(self, input, emit)
    }

    fn highlight(&self, input: &mut dyn BufRead, emit: EmitFn<'_>) -> Result<(), LexerError> {
        Lexer::highlight(self, input, emit)
    }

    fn format(&self, input: &mut dyn BufRead, emit: EmitFn<'_>) -> Result<(), LexerError> {
        Lexer::format(self, input, emit)
    }

    fn accepts_filename(&self, filename: &str) -> Result<bool, LexerError> {
        Lexer::accepts_filename(self, filename)
    }

    fn accepts_media_type(&self, media_type: &str) -> Result<bool, LexerError> {
        Lexer::accepts_media_type(self, media_type)
    }

    fn filenames(&self) -> &[String] {
        Lexer::filenames(self)
    }

    fn media_types(&self) -> &[String] {
        Lexer::media_types(self)
    }
}

#[derive(Debug, Clone)]
pub struct RegistryMetadata {
    pub total_registrations: usize,
    pub replacements: usize,
    pub creation_time: DateTime<Utc>,
    pub last_registration: Option<DateTime<Utc>>,
}

pub struct TokenizerRegistry {
    tokenizers: BTreeMap<String, Arc<dyn Tokenizer>>,
    metadata: RegistryMetadata,
    preferences: EnginePreferences,
}

impl TokenizerRegistry {
    pub fn new() -> Self {
        Self {
            tokenizers: BTreeMap::new(),
            metadata: RegistryMetadata {
                total_registrations: 0,
                replacements: 0,
                creation_time: Utc::now(),
                last_registration: None,
            },
            preferences: EnginePreferences::quiet(),
        }
    }

    /// Preferences applied to every lexer compiled by [`register_spec`](Self::register_spec)
    pub fn with_preferences(mut self, preferences: EnginePreferences) -> Self {
        self.preferences = preferences;
        self
    }

    pub fn preferences(&self) -> &EnginePreferences {
        &self.preferences
    }

    /// Register `tokenizer` under `name`, returning the tokenizer it replaced
    pub fn register(
        &mut self,
        name: impl Into<String>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Option<Arc<dyn Tokenizer>> {
        let name = name.into();
        let previous = self.tokenizers.insert(name.clone(), tokenizer);

        self.metadata.total_registrations += 1;
        self.metadata.last_registration = Some(Utc::now());

        if previous.is_some() {
            self.metadata.replacements += 1;
            crate::log_warning!(code = codes::registry::TOKENIZER_REPLACED,
                "Replaced registered tokenizer",
                "name" => &name
            );
        } else {
            crate::log_success!(codes::success::TOKENIZER_REGISTERED, "Registered tokenizer",
                "name" => &name
            );
        }

        previous
    }

    /// Compile `spec` and register the lexer under its own name
    pub fn register_spec(
        &mut self,
        spec: &crate::lexical::LexerSpec,
    ) -> Result<Option<Arc<dyn Tokenizer>>, LexerError> {
        let lexer = spec.compile()?.with_preferences(self.preferences.clone());
        Ok(self.register(spec.name.clone(), Arc::new(lexer)))
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tokenizer>> {
        self.tokenizers.get(name).cloned()
    }

    /// First tokenizer, in name order, whose patterns match `filename`
    pub fn lookup_by_filename(
        &self,
        filename: &str,
    ) -> Result<Option<Arc<dyn Tokenizer>>, LexerError> {
        for tokenizer in self.tokenizers.values() {
            if tokenizer.accepts_filename(filename)? {
                return Ok(Some(tokenizer.clone()));
            }
        }
        Ok(None)
    }

    /// First tokenizer, in name order, that accepts `media_type`
    pub fn lookup_by_media_type(
        &self,
        media_type: &str,
    ) -> Result<Option<Arc<dyn Tokenizer>>, LexerError> {
        for tokenizer in self.tokenizers.values() {
            if tokenizer.accepts_media_type(media_type)? {
                return Ok(Some(tokenizer.clone()));
            }
        }
        Ok(None)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tokenizers.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.tokenizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokenizers.is_empty()
    }

    pub fn metadata(&self) -> &RegistryMetadata {
        &self.metadata
    }
}

impl Default for TokenizerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
