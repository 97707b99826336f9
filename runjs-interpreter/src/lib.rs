//! runjs interpreter
//!
//! A tree-walking evaluator for the script dialect parsed by `runjs-parser`.
//! A program runs against a root environment holding `this`, the global API
//! and the host binding `$runjs`; whatever the script leaves in `$runjs` is
//! the result handed back to the host.
//!
//! ```no_run
//! use runjs_interpreter::run_source;
//!
//! let host = run_source("$runjs.answer = [1, 2, 3].map(n => n * 2);").unwrap();
//! assert_eq!(host.get("answer").unwrap().to_js_string(), "2,4,6");
//! ```

#![allow(clippy::needless_range_loop)]
#![allow(clippy::single_match)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::result_large_err)]

mod builtins;
pub mod completion;
pub mod environment;
pub mod error;
pub mod evaluator;
mod expressions;
mod functions;
pub mod globals;
pub mod operators;
pub mod patterns;
pub mod stack;
mod statements;
pub mod test_harness;
pub mod value;

#[cfg(test)]
#[path = "tests/mod.rs"]
pub mod tests;

pub use completion::Completion;
pub use environment::{EnvId, EnvironmentKind, Environments, Mutability, RealmId};
pub use error::{ErrorKind, Result, RuntimeError};
pub use evaluator::{Interpreter, DEFAULT_MAX_CALL_DEPTH};
pub use globals::GlobalApi;
pub use patterns::BindingMode;
pub use test_harness::{ScriptSession, TestHarnessError};
pub use value::{Callable, FunctionObject, Object, Value, MAX_ARRAY_LENGTH, MAX_STRING_LENGTH};

pub use runjs_parser::{ParseError, ParseOptions, Program};

/// Name of the root binding shared with the host
pub const HOST_BINDING: &str = "$runjs";

/// Parser entry point used by [`run`]
pub type ParseFn = fn(&str, &ParseOptions) -> std::result::Result<Program, ParseError>;

/// Everything [`run`] needs besides the source text
#[derive(Clone)]
pub struct RunOptions {
    /// Object bound to `$runjs`; a fresh empty object when `None`
    pub host_bindings: Option<Value>,
    pub globals: GlobalApi,
    pub parse: ParseOptions,
    pub parser: ParseFn,
    pub max_call_depth: usize,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            host_bindings: None,
            globals: GlobalApi::standard(),
            parse: ParseOptions::default(),
            parser: runjs_parser::parse_program_with_options,
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
        }
    }
}

impl std::fmt::Debug for RunOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunOptions")
            .field("host_bindings", &self.host_bindings)
            .field("globals", &self.globals.len())
            .field("parse", &self.parse)
            .field("max_call_depth", &self.max_call_depth)
            .finish_non_exhaustive()
    }
}

/// Run `source` and return the final value of `$runjs`.
///
/// Uncaught script errors come back as `Err`, with thrown values preserved
/// in [`RuntimeError::Thrown`]. Parse failures are [`RuntimeError::Parse`].
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn run(source: &str, options: RunOptions) -> Result<Value> {
    let RunOptions {
        host_bindings,
        globals,
        parse,
        parser,
        max_call_depth,
    } = options;

    let mut interpreter = Interpreter::with_max_call_depth(max_call_depth);
    let host = host_bindings.unwrap_or_else(|| Value::object(Object::new()));
    install_root_bindings(&mut interpreter, &globals, host)?;

    let program = parser(source, &parse)?;
    tracing::debug!(statements = program.body.len(), "parsed program");

    interpreter.execute_program(&program)?;
    let root = interpreter.root();
    interpreter.environments().read(root, HOST_BINDING)
}

/// [`run`] with [`RunOptions::default`]
pub fn run_source(source: &str) -> Result<Value> {
    run(source, RunOptions::default())
}

/// Bind `this`, the globals and `$runjs` in the root record
pub(crate) fn install_root_bindings(
    interpreter: &mut Interpreter,
    globals: &GlobalApi,
    host: Value,
) -> Result<()> {
    let root = interpreter.root();
    let environments = interpreter.environments_mut();

    environments.declare_const(root, "this", Value::Undefined)?;
    for (name, value) in globals.iter() {
        environments.declare_let(root, name, value.clone())?;
    }
    environments.declare_const(root, HOST_BINDING, host)
}
