//! Script session for exercising the interpreter
//!
//! A session keeps one interpreter alive across evaluations, so bindings made
//! by one snippet are visible to the next (REPL-like behaviour). Each
//! snippet is parsed with top-level `return` allowed and its completion value
//! is returned. The assert helpers compare results through their JSON form.

use crate::{
    install_root_bindings, GlobalApi, Interpreter, ParseOptions, RunOptions, RuntimeError, Value,
    HOST_BINDING,
};
use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur during test harness operations
#[derive(Debug, Error, Diagnostic)]
pub enum TestHarnessError {
    #[error("Runtime error: {source}")]
    Runtime {
        #[from]
        source: RuntimeError,
    },

    #[error("Assertion failed for `{code}`: expected {expected}, but got {actual}")]
    AssertionFailed {
        code: String,
        expected: String,
        actual: String,
    },

    #[error("Expected `{code}` to fail, but it evaluated to {value}")]
    UnexpectedSuccess { code: String, value: String },
}

pub struct ScriptSession {
    interpreter: Interpreter,
    parse: ParseOptions,
    parser: crate::ParseFn,
}

impl ScriptSession {
    /// Session with the standard globals and an empty `$runjs`
    pub fn new() -> Result<Self, TestHarnessError> {
        Self::with_options(RunOptions::default())
    }

    pub fn with_globals(globals: GlobalApi) -> Result<Self, TestHarnessError> {
        Self::with_options(RunOptions {
            globals,
            ..RunOptions::default()
        })
    }

    pub fn with_options(options: RunOptions) -> Result<Self, TestHarnessError> {
        let mut interpreter = Interpreter::with_max_call_depth(options.max_call_depth);
        let host = options
            .host_bindings
            .unwrap_or_else(|| Value::object(crate::Object::new()));
        install_root_bindings(&mut interpreter, &options.globals, host)?;

        Ok(Self {
            interpreter,
            parse: ParseOptions {
                allow_return_outside_function: true,
                ..options.parse
            },
            parser: options.parser,
        })
    }

    /// Evaluate `code` in the session's root record
    pub fn evaluate(&mut self, code: &str) -> Result<Value, TestHarnessError> {
        let program = (self.parser)(code, &self.parse).map_err(RuntimeError::from)?;
        Ok(self.interpreter.execute_program(&program)?)
    }

    /// Current value of `$runjs`
    pub fn host(&self) -> Value {
        let root = self.interpreter.root();
        self.interpreter
            .environments()
            .read(root, HOST_BINDING)
            .unwrap_or_default()
    }

    pub fn interpreter(&mut self) -> &mut Interpreter {
        &mut self.interpreter
    }

    pub fn assert_evaluates_to_number(
        &mut self,
        code: &str,
        expected: f64,
    ) -> Result<(), TestHarnessError> {
        let value = self.evaluate(code)?;
        match value {
            Value::Number(actual)
                if actual == expected || (actual.is_nan() && expected.is_nan()) =>
            {
                Ok(())
            }
            other => Err(mismatch(code, format!("{expected}"), &other)),
        }
    }

    pub fn assert_evaluates_to_string(
        &mut self,
        code: &str,
        expected: &str,
    ) -> Result<(), TestHarnessError> {
        let value = self.evaluate(code)?;
        match value.as_str() {
            Some(actual) if actual == expected => Ok(()),
            _ => Err(mismatch(code, format!("{expected:?}"), &value)),
        }
    }

    pub fn assert_evaluates_to_boolean(
        &mut self,
        code: &str,
        expected: bool,
    ) -> Result<(), TestHarnessError> {
        let value = self.evaluate(code)?;
        match value {
            Value::Boolean(actual) if actual == expected => Ok(()),
            other => Err(mismatch(code, expected.to_string(), &other)),
        }
    }

    pub fn assert_evaluates_to_undefined(&mut self, code: &str) -> Result<(), TestHarnessError> {
        let value = self.evaluate(code)?;
        match value {
            Value::Undefined => Ok(()),
            other => Err(mismatch(code, "undefined".to_string(), &other)),
        }
    }

    /// Compare the completion value's JSON form with `expected`
    pub fn assert_evaluates_to_json(
        &mut self,
        code: &str,
        expected: serde_json::Value,
    ) -> Result<(), TestHarnessError> {
        let value = self.evaluate(code)?;
        let actual = value.to_json()?;
        if actual == expected {
            Ok(())
        } else {
            Err(TestHarnessError::AssertionFailed {
                code: code.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// Run `code`, then compare the JSON form of `$runjs` with `expected`
    pub fn assert_host_json(
        &mut self,
        code: &str,
        expected: serde_json::Value,
    ) -> Result<(), TestHarnessError> {
        self.evaluate(code)?;
        let actual = self.host().to_json()?;
        if actual == expected {
            Ok(())
        } else {
            Err(TestHarnessError::AssertionFailed {
                code: code.to_string(),
                expected: expected.to_string(),
                actual: actual.to_string(),
            })
        }
    }

    /// Expect `code` to fail and return the error
    pub fn evaluate_error(&mut self, code: &str) -> Result<RuntimeError, TestHarnessError> {
        match self.evaluate(code) {
            Ok(value) => Err(TestHarnessError::UnexpectedSuccess {
                code: code.to_string(),
                value: value.inspect(),
            }),
            Err(TestHarnessError::Runtime { source }) => Ok(source),
            Err(other) => Err(other),
        }
    }

    /// Expect `code` to fail with an error whose message is `expected`,
    /// as `Error.prototype.toString` would render it (`TypeError: ...`)
    pub fn assert_fails_with(
        &mut self,
        code: &str,
        expected: &str,
    ) -> Result<(), TestHarnessError> {
        let error = self.evaluate_error(code)?;
        let actual = match error.thrown_value() {
            Some(value) => value.describe(),
            None => format!("{}: {}", error.kind().name(), error.message()),
        };
        if actual == expected {
            Ok(())
        } else {
            Err(TestHarnessError::AssertionFailed {
                code: code.to_string(),
                expected: expected.to_string(),
                actual,
            })
        }
    }
}

fn mismatch(code: &str, expected: String, actual: &Value) -> TestHarnessError {
    TestHarnessError::AssertionFailed {
        code: code.to_string(),
        expected,
        actual: actual.inspect(),
    }
}
