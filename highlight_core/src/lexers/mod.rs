//! Built-in lexer specifications
//!
//! Each function returns plain [`LexerSpec`] data; nothing is registered
//! until the host calls [`register_builtin`].

mod css;
mod html;
mod http;
mod json;

pub use css::css;
pub use html::html;
pub use http::http;
pub use json::json;

use crate::lexical::{LexerError, LexerSpec};
use crate::registry::TokenizerRegistry;

/// Every built-in specification
pub fn builtin() -> Vec<LexerSpec> {
    vec![css(), html(), http(), json()]
}

/// Compile every built-in lexer into `registry`
pub fn register_builtin(registry: &mut TokenizerRegistry) -> Result<(), LexerError> {
    for spec in builtin() {
        registry.register_spec(&spec)?;
    }
    Ok(())
}
