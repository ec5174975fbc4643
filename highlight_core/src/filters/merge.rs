use super::{Emit, Filter};
use crate::tokens::Token;

/// Joins consecutive tokens of the same type into one token
///
/// The merged token keeps the state of the first token in the run. Empty
/// tokens take part in merging like any other token, so the output never
/// has two neighbours of the same type.
#[derive(Debug, Clone, Copy, Default)]
pub struct MergeAdjacent;

impl Filter for MergeAdjacent {
    fn name(&self) -> &str {
        "merge-adjacent"
    }

    fn filter<'a>(&self, mut out: Emit<'a>) -> Emit<'a> {
        let mut pending: Option<Token> = None;

        Box::new(move |token: Token| {
            if token.is_end() {
                if let Some(run) = pending.take() {
                    out(run)?;
                }
                return out(token);
            }

            if let Some(run) = pending.as_mut() {
                if run.token_type == token.token_type {
                    run.value.push_str(&token.value);
                    return Ok(());
                }
            }

            match pending.replace(token) {
                Some(run) => out(run),
                None => Ok(()),
            }
        })
    }
}
