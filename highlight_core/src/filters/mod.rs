//! Token filters
//!
//! A filter wraps a downstream emit callback and returns the callback its
//! upstream should call. Filters may drop, merge, split or add tokens. The
//! end token always travels through every filter last, so stateful filters
//! use it to flush.
//!
//! A [`FilterChain`] applies its filters in list order: the first filter
//! sees the engine's tokens first and the last one feeds the caller.

pub mod indent;
pub mod merge;

use crate::lexical::LexerError;
use crate::tokens::Token;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

pub use indent::IndentFormatter;
pub use merge::MergeAdjacent;

/// Emit callback threaded through a filter chain
pub type Emit<'a> = Box<dyn FnMut(Token) -> Result<(), LexerError> + 'a>;

pub trait Filter: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Wrap `out`, returning the callback that feeds this filter
    ///
    /// Each call starts with fresh filter state.
    fn filter<'a>(&self, out: Emit<'a>) -> Emit<'a>;
}

/// Forwards every token unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Filter for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn filter<'a>(&self, out: Emit<'a>) -> Emit<'a> {
        out
    }
}

/// Drops tokens whose value is empty; the end token is always forwarded
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoveEmpties;

impl Filter for RemoveEmpties {
    fn name(&self) -> &str {
        "remove-empties"
    }

    fn filter<'a>(&self, mut out: Emit<'a>) -> Emit<'a> {
        Box::new(move |token: Token| {
            if token.is_empty() && !token.is_end() {
                return Ok(());
            }
            out(token)
        })
    }
}

/// Ordered list of filters
#[derive(Debug, Clone, Default)]
pub struct FilterChain {
    filters: Vec<Arc<dyn Filter>>,
}

impl FilterChain {
    pub fn new(filters: Vec<Arc<dyn Filter>>) -> Self {
        Self { filters }
    }

    pub fn push(&mut self, filter: Arc<dyn Filter>) {
        self.filters.push(filter);
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Compose the chain over a terminal callback
    pub fn wrap<'a>(&self, out: Emit<'a>) -> Emit<'a> {
        self.filters
            .iter()
            .rev()
            .fold(out, |downstream, filter| filter.filter(downstream))
    }
}

/// Declarative filter configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FilterSpec {
    Passthrough,
    RemoveEmpties,
    MergeAdjacent,
    Indent {
        #[serde(default = "default_indent")]
        indent: String,
    },
}

fn default_indent() -> String {
    indent::DEFAULT_INDENT.to_string()
}

impl FilterSpec {
    pub fn indent(indent: impl Into<String>) -> Self {
        FilterSpec::Indent {
            indent: indent.into(),
        }
    }

    pub fn build(&self) -> Arc<dyn Filter> {
        match self {
            FilterSpec::Passthrough => Arc::new(Passthrough),
            FilterSpec::RemoveEmpties => Arc::new(RemoveEmpties),
            FilterSpec::MergeAdjacent => Arc::new(MergeAdjacent),
            FilterSpec::Indent { indent } => Arc::new(IndentFormatter::new(indent.clone())),
        }
    }
}
