//! Token model for the tokenizer engine
//!
//! A [`Token`] carries the matched text, its [`TokenType`] and the name of
//! the state that produced it.
//!
//! ## Token types
//!
//! [`TokenType`] is an open tag: lexer specifications may use any string.
//! The associated constants name the vocabulary shared by the built-in
//! lexers and understood by the renderers:
//!
//! | constant        | meaning                                   |
//! |-----------------|-------------------------------------------|
//! | `TEXT`          | plain text                                |
//! | `WHITESPACE`    | layout                                    |
//! | `COMMENT`       | comments                                  |
//! | `NUMBER`        | numeric literals                          |
//! | `STRING`        | string contents                           |
//! | `LITERAL`       | keywords-as-values (`true`, `@media`)     |
//! | `ATTRIBUTE`     | keys, property and attribute names        |
//! | `ASSIGNMENT`    | key/value separators                      |
//! | `OPERATOR`      | operators                                 |
//! | `PUNCTUATION`   | brackets, quotes and separators           |
//! | `TAG`           | markup tags and protocol names            |
//! | `ENTITY`        | markup entities and element names         |
//! | `ERROR`         | input no rule could match                 |
//!
//! ## End token
//!
//! `Token::default()` is the end-of-stream sentinel. Every tokenize call
//! emits it exactly once, as its last token.

pub mod token;

pub use token::{Token, TokenType};
