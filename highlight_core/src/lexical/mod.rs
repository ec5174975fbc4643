//! Regex state-machine tokenizer
//!
//! A [`LexerSpec`] names a set of states, each an ordered list of rules.
//! Compiling it yields a [`Lexer`] that reads input a line at a time and,
//! at every position, lets the rules of the state on top of the stack
//! compete: the match that starts earliest wins, and declaration order
//! breaks ties. Text no rule can explain is emitted as `error` tokens.

pub mod error;
pub mod lexer;
pub mod reader;
pub mod rule;
pub mod spec;
pub mod stack;
pub mod state;

pub use error::LexerError;
pub use lexer::{media_type_essence, Lexer, TokenizeStats};
pub use rule::{IncludeRule, PatternRule, Rule, Transition, POP};
pub use spec::{LexerSpec, RuleSpec};
pub use stack::{Stack, ROOT_STATE};
pub use state::{MatchOutcome, State, StateMap};
