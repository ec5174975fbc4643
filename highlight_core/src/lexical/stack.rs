//! State stack
//!
//! Every tokenize call starts with `["root"]`. Rule transitions pop and
//! push state names; the depth is bounded by the compile-time
//! `max_stack_depth` and an empty stack ends tokenization.

use super::error::LexerError;
use super::rule::Transition;
use crate::config::compile_time::engine::MAX_STACK_DEPTH;

/// Name of the state every tokenize call starts in
pub const ROOT_STATE: &str = "root";

/// Stack of active state names; the last entry is the active state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stack {
    states: Vec<String>,
    max_depth: usize,
    trace: bool,
}

impl Stack {
    pub fn new() -> Self {
        Self::with_max_depth(MAX_STACK_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            states: vec![ROOT_STATE.to_string()],
            max_depth,
            trace: false,
        }
    }

    /// Log every push and pop at debug level
    pub fn with_tracing(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    pub fn push(&mut self, state: &str) -> Result<(), LexerError> {
        if self.states.len() >= self.max_depth {
            return Err(LexerError::StackOverflow {
                state: state.to_string(),
            });
        }
        if self.trace {
            crate::log_debug!("Push state", "state" => state, "depth" => self.states.len() + 1);
        }
        self.states.push(state.to_string());
        Ok(())
    }

    /// Pop the active state; popping an empty stack does nothing
    pub fn pop(&mut self) -> Option<String> {
        let popped = self.states.pop();
        if self.trace {
            if let Some(state) = &popped {
                crate::log_debug!("Pop state", "state" => state, "depth" => self.states.len());
            }
        }
        popped
    }

    pub fn peek(&self) -> Option<&str> {
        self.states.last().map(String::as_str)
    }

    /// Back to a lone root state
    pub fn reset(&mut self) {
        self.states.clear();
        self.states.push(ROOT_STATE.to_string());
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Apply transitions left to right
    pub fn apply(&mut self, transitions: &[Transition]) -> Result<(), LexerError> {
        for transition in transitions {
            match transition {
                Transition::Pop => {
                    self.pop();
                }
                Transition::Push(state) => self.push(state)?,
            }
        }
        Ok(())
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}
