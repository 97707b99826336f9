//! Scenario tests for the interpreter
//!
//! Each module drives [`crate::ScriptSession`] or [`crate::run`] with small
//! scripts and checks the results through their JSON form.

pub mod test_builtins;
pub mod test_expressions;
pub mod test_functions;
pub mod test_scoping;
