//! Statement completions.
//!
//! Statements report how they finished so enclosing loops, switches and
//! function bodies can consume `break`, `continue` and `return` without
//! unwinding through errors. Expressions never produce a completion.

use crate::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Finished normally, carrying the statement's value
    Normal(Value),
    Break,
    Continue,
    Return(Value),
}

impl Completion {
    pub fn empty() -> Self {
        Completion::Normal(Value::Undefined)
    }

    pub fn is_normal(&self) -> bool {
        matches!(self, Completion::Normal(_))
    }

    /// The value carried by a normal or return completion
    pub fn value(&self) -> Value {
        match self {
            Completion::Normal(value) | Completion::Return(value) => value.clone(),
            Completion::Break | Completion::Continue => Value::Undefined,
        }
    }
}
