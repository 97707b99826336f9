//! Runtime error types for the runjs interpreter.
//!
//! Every failure unwinds through [`Result`]. Scripts can intercept the
//! catchable kinds with `try`/`catch`; see [`RuntimeError::is_catchable`].

use crate::value::Value;
use miette::{Diagnostic, SourceSpan};
use runjs_parser::{ParseError, Span};
use thiserror::Error;

/// Runtime errors that can occur during evaluation
#[derive(Error, Diagnostic, Debug)]
pub enum RuntimeError {
    #[error("ReferenceError: {name} is not defined")]
    #[diagnostic(
        code(runjs::runtime::reference_error),
        help("Declare the variable with var, let or const before using it")
    )]
    ReferenceError {
        name: String,
        #[label("undefined variable")]
        span: Option<SourceSpan>,
    },

    #[error("SyntaxError: Identifier '{name}' has already been declared")]
    #[diagnostic(
        code(runjs::runtime::duplicate_declaration),
        help("let and const bindings can only be declared once per scope")
    )]
    DuplicateDeclaration {
        name: String,
        #[label("redeclared here")]
        span: Option<SourceSpan>,
    },

    #[error("TypeError: Assignment to constant variable.")]
    #[diagnostic(code(runjs::runtime::assignment_to_constant))]
    AssignmentToConstant {
        name: String,
        #[label("assigned here")]
        span: Option<SourceSpan>,
    },

    #[error("TypeError: {message}")]
    #[diagnostic(code(runjs::runtime::type_error))]
    TypeError {
        message: String,
        #[label("type error")]
        span: Option<SourceSpan>,
    },

    #[error("RangeError: {message}")]
    #[diagnostic(code(runjs::runtime::range_error))]
    RangeError {
        message: String,
        #[label("here")]
        span: Option<SourceSpan>,
    },

    #[error("Unsupported node: {node}")]
    #[diagnostic(
        code(runjs::runtime::unsupported_node),
        help("The syntax tree contains a construct the evaluator cannot execute")
    )]
    UnsupportedNode {
        node: String,
        #[label("unsupported")]
        span: Option<SourceSpan>,
    },

    #[error("Uncaught {}", .value.describe())]
    #[diagnostic(code(runjs::runtime::uncaught))]
    Thrown {
        value: Value,
        #[label("thrown here")]
        span: Option<SourceSpan>,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

/// The script-visible category of a [`RuntimeError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ReferenceError,
    SyntaxError,
    TypeError,
    RangeError,
    Thrown,
    Internal,
}

impl ErrorKind {
    /// Name of the global constructor used for error objects of this kind
    pub fn name(self) -> &'static str {
        match self {
            ErrorKind::ReferenceError => "ReferenceError",
            ErrorKind::SyntaxError => "SyntaxError",
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::Thrown | ErrorKind::Internal => "Error",
        }
    }
}

impl RuntimeError {
    pub fn reference_error(name: impl Into<String>) -> Self {
        RuntimeError::ReferenceError {
            name: name.into(),
            span: None,
        }
    }

    pub fn duplicate_declaration(name: impl Into<String>) -> Self {
        RuntimeError::DuplicateDeclaration {
            name: name.into(),
            span: None,
        }
    }

    pub fn assignment_to_constant(name: impl Into<String>) -> Self {
        RuntimeError::AssignmentToConstant {
            name: name.into(),
            span: None,
        }
    }

    pub fn type_error(message: impl Into<String>) -> Self {
        RuntimeError::TypeError {
            message: message.into(),
            span: None,
        }
    }

    pub fn type_error_with_span(message: impl Into<String>, span: Span) -> Self {
        RuntimeError::TypeError {
            message: message.into(),
            span: Some(to_source_span(span)),
        }
    }

    pub fn range_error(message: impl Into<String>) -> Self {
        RuntimeError::RangeError {
            message: message.into(),
            span: None,
        }
    }

    pub fn unsupported_node(node: impl Into<String>, span: Span) -> Self {
        RuntimeError::UnsupportedNode {
            node: node.into(),
            span: Some(to_source_span(span)),
        }
    }

    pub fn thrown(value: Value) -> Self {
        RuntimeError::Thrown { value, span: None }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            RuntimeError::ReferenceError { .. } => ErrorKind::ReferenceError,
            RuntimeError::DuplicateDeclaration { .. } => ErrorKind::SyntaxError,
            RuntimeError::AssignmentToConstant { .. } | RuntimeError::TypeError { .. } => {
                ErrorKind::TypeError
            }
            RuntimeError::RangeError { .. } => ErrorKind::RangeError,
            RuntimeError::Thrown { .. } => ErrorKind::Thrown,
            RuntimeError::UnsupportedNode { .. } | RuntimeError::Parse(_) => ErrorKind::Internal,
        }
    }

    /// Whether a script `catch` clause may intercept this error
    pub fn is_catchable(&self) -> bool {
        self.kind() != ErrorKind::Internal
    }

    /// The message an error object created from this error carries
    pub fn message(&self) -> String {
        match self {
            RuntimeError::ReferenceError { name, .. } => format!("{name} is not defined"),
            RuntimeError::DuplicateDeclaration { name, .. } => {
                format!("Identifier '{name}' has already been declared")
            }
            RuntimeError::AssignmentToConstant { .. } => "Assignment to constant variable.".into(),
            RuntimeError::TypeError { message, .. } | RuntimeError::RangeError { message, .. } => {
                message.clone()
            }
            RuntimeError::UnsupportedNode { node, .. } => format!("Unsupported node: {node}"),
            RuntimeError::Thrown { value, .. } => value.describe(),
            RuntimeError::Parse(error) => error.to_string(),
        }
    }

    /// The thrown value, for errors raised by a script `throw`
    pub fn thrown_value(&self) -> Option<&Value> {
        match self {
            RuntimeError::Thrown { value, .. } => Some(value),
            _ => None,
        }
    }

    /// Attach a source location unless one is already recorded.
    pub fn at(mut self, location: Span) -> Self {
        match &mut self {
            RuntimeError::ReferenceError { span, .. }
            | RuntimeError::DuplicateDeclaration { span, .. }
            | RuntimeError::AssignmentToConstant { span, .. }
            | RuntimeError::TypeError { span, .. }
            | RuntimeError::RangeError { span, .. }
            | RuntimeError::UnsupportedNode { span, .. }
            | RuntimeError::Thrown { span, .. } => {
                if span.is_none() {
                    *span = Some(to_source_span(location));
                }
            }
            RuntimeError::Parse(_) => {}
        }
        self
    }

    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            RuntimeError::ReferenceError { span, .. }
            | RuntimeError::DuplicateDeclaration { span, .. }
            | RuntimeError::AssignmentToConstant { span, .. }
            | RuntimeError::TypeError { span, .. }
            | RuntimeError::RangeError { span, .. }
            | RuntimeError::UnsupportedNode { span, .. }
            | RuntimeError::Thrown { span, .. } => *span,
            RuntimeError::Parse(error) => Some(to_source_span(error.span())),
        }
    }
}

fn to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.end.saturating_sub(span.start))
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
