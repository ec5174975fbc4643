//! Declarative regex state-machine tokenizer for syntax highlighting
//!
//! ```no_run
//! use highlight_core::{lexers, TokenizerRegistry};
//!
//! let mut registry = TokenizerRegistry::new();
//! lexers::register_builtin(&mut registry).unwrap();
//!
//! let json = registry.get("json").unwrap();
//! json.highlight(&mut r#"{"key": true}"#.as_bytes(), &mut |token| {
//!     println!("{:>12} {:?}", token.token_type, token.value);
//!     Ok(())
//! })
//! .unwrap();
//! ```

// Internal modules
pub mod config;
#[macro_use]
pub mod logging;
pub mod filters;
pub mod lexers;
pub mod lexical;
pub mod registry;
pub mod tokens;

// Re-export key types for library consumers
pub use filters::{Filter, FilterChain, FilterSpec};
pub use lexical::{Lexer, LexerError, LexerSpec, RuleSpec};
pub use registry::{Tokenizer, TokenizerRegistry};
pub use tokens::{Token, TokenType};
