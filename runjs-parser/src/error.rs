// runjs Parser Error Handling
// Source-aware parse errors with miette integration

use crate::ast::Span;
use crate::parser::Rule;
use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Main parse error type with miette integration
#[derive(Error, Diagnostic, Debug)]
pub enum ParseError {
    #[error("Syntax error: {message}")]
    #[diagnostic(
        code(runjs::parse::syntax_error),
        help("Check the syntax near the highlighted location")
    )]
    PestError {
        #[source_code]
        src: String,
        #[label("error occurred here")]
        span: SourceSpan,
        message: String,
    },

    #[error("Unexpected token")]
    #[diagnostic(code(runjs::parse::unexpected_token), help("Expected {expected}"))]
    UnexpectedToken {
        #[source_code]
        src: String,
        #[label("found this")]
        span: SourceSpan,
        expected: String,
    },

    #[error("Invalid number literal `{found}`")]
    #[diagnostic(
        code(runjs::parse::invalid_number),
        help("Number literals are decimal (1, 1.5, 2e10) or hexadecimal (0xFF)")
    )]
    InvalidNumber {
        #[source_code]
        src: String,
        #[label("invalid number")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid string escape sequence `{found}`")]
    #[diagnostic(
        code(runjs::parse::invalid_string_escape),
        help(
            "Valid escape sequences: \\n, \\t, \\r, \\b, \\f, \\v, \\0, \\xHH, \\uXXXX, \\u{{X..}}"
        )
    )]
    InvalidStringEscape {
        #[source_code]
        src: String,
        #[label("invalid escape sequence")]
        span: SourceSpan,
        found: String,
    },

    #[error("Invalid assignment target")]
    #[diagnostic(
        code(runjs::parse::invalid_assignment_target),
        help("Only identifiers, member expressions and destructuring patterns can be assigned to")
    )]
    InvalidAssignmentTarget {
        #[source_code]
        src: String,
        #[label("cannot assign to this")]
        span: SourceSpan,
    },

    #[error("Rest element must be last")]
    #[diagnostic(
        code(runjs::parse::invalid_rest_element),
        help("Move the `...rest` element to the end of the list")
    )]
    InvalidRestElement {
        #[source_code]
        src: String,
        #[label("rest element here")]
        span: SourceSpan,
    },

    #[error("Missing catch or finally after try")]
    #[diagnostic(
        code(runjs::parse::missing_catch_or_finally),
        help("A `try` block needs a `catch` clause, a `finally` clause, or both")
    )]
    MissingCatchOrFinally {
        #[source_code]
        src: String,
        #[label("this try statement")]
        span: SourceSpan,
    },

    #[error("Missing initializer in const declaration")]
    #[diagnostic(
        code(runjs::parse::missing_const_initializer),
        help("Give the constant a value: `const name = value`")
    )]
    MissingConstInitializer {
        #[source_code]
        src: String,
        #[label("declared here")]
        span: SourceSpan,
    },

    #[error("Illegal return statement")]
    #[diagnostic(
        code(runjs::parse::return_outside_function),
        help("`return` is only allowed inside a function body")
    )]
    ReturnOutsideFunction {
        #[source_code]
        src: String,
        #[label("return outside of a function")]
        span: SourceSpan,
    },
}

impl ParseError {
    /// Create a parse error from a Pest parsing error
    pub fn from_pest_error(error: pest::error::Error<Rule>, src: String) -> Self {
        let span = match error.location {
            pest::error::InputLocation::Pos(pos) => SourceSpan::new(pos.into(), 0),
            pest::error::InputLocation::Span((start, end)) => {
                SourceSpan::new(start.into(), end - start)
            }
        };

        let (line, column) = match error.line_col {
            pest::error::LineColLocation::Pos(position) => position,
            pest::error::LineColLocation::Span(start, _) => start,
        };

        let expectation = match &error.variant {
            pest::error::ErrorVariant::ParsingError { positives, .. } if !positives.is_empty() => {
                let mut expected: Vec<&'static str> = positives
                    .iter()
                    .map(rule_to_user_friendly_description)
                    .collect();
                expected.sort_unstable();
                expected.dedup();
                format!("expected {}", expected.join(", "))
            }
            _ => error.variant.message().into_owned(),
        };
        let message = format!("{expectation} at line {line}, column {column}");

        ParseError::PestError { src, span, message }
    }

    pub fn unexpected_token(span: Span, expected: impl Into<String>) -> Self {
        ParseError::UnexpectedToken {
            src: String::new(),
            span: span_to_source_span(span),
            expected: expected.into(),
        }
    }

    pub fn invalid_number(span: Span, found: impl Into<String>) -> Self {
        ParseError::InvalidNumber {
            src: String::new(),
            span: span_to_source_span(span),
            found: found.into(),
        }
    }

    pub fn invalid_string_escape(span: Span, found: impl Into<String>) -> Self {
        ParseError::InvalidStringEscape {
            src: String::new(),
            span: span_to_source_span(span),
            found: found.into(),
        }
    }

    pub fn invalid_assignment_target(span: Span) -> Self {
        ParseError::InvalidAssignmentTarget {
            src: String::new(),
            span: span_to_source_span(span),
        }
    }

    pub fn invalid_rest_element(span: Span) -> Self {
        ParseError::InvalidRestElement {
            src: String::new(),
            span: span_to_source_span(span),
        }
    }

    pub fn missing_catch_or_finally(span: Span) -> Self {
        ParseError::MissingCatchOrFinally {
            src: String::new(),
            span: span_to_source_span(span),
        }
    }

    pub fn missing_const_initializer(span: Span) -> Self {
        ParseError::MissingConstInitializer {
            src: String::new(),
            span: span_to_source_span(span),
        }
    }

    pub fn return_outside_function(span: Span) -> Self {
        ParseError::ReturnOutsideFunction {
            src: String::new(),
            span: span_to_source_span(span),
        }
    }

    /// Attach the program text so miette can render the labelled snippet.
    ///
    /// Builders construct errors without the source to keep their signatures
    /// small; the entry points call this once before returning.
    pub fn with_source_code(mut self, input: &str) -> Self {
        match &mut self {
            ParseError::PestError { src, .. }
            | ParseError::UnexpectedToken { src, .. }
            | ParseError::InvalidNumber { src, .. }
            | ParseError::InvalidStringEscape { src, .. }
            | ParseError::InvalidAssignmentTarget { src, .. }
            | ParseError::InvalidRestElement { src, .. }
            | ParseError::MissingCatchOrFinally { src, .. }
            | ParseError::MissingConstInitializer { src, .. }
            | ParseError::ReturnOutsideFunction { src, .. } => {
                if src.is_empty() {
                    *src = input.to_string();
                }
            }
        }
        self
    }

    /// Location of the error in the source text
    pub fn span(&self) -> Span {
        let span = match self {
            ParseError::PestError { span, .. }
            | ParseError::UnexpectedToken { span, .. }
            | ParseError::InvalidNumber { span, .. }
            | ParseError::InvalidStringEscape { span, .. }
            | ParseError::InvalidAssignmentTarget { span, .. }
            | ParseError::InvalidRestElement { span, .. }
            | ParseError::MissingCatchOrFinally { span, .. }
            | ParseError::MissingConstInitializer { span, .. }
            | ParseError::ReturnOutsideFunction { span, .. } => span,
        };
        Span::new(span.offset(), span.offset() + span.len())
    }
}

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

fn span_to_source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start.into(), span.end.saturating_sub(span.start))
}

/// Convert a parser rule to a user-friendly description
fn rule_to_user_friendly_description(rule: &Rule) -> &'static str {
    match rule {
        Rule::EOI => "end of input",
        Rule::identifier | Rule::property_name => "an identifier",
        Rule::number | Rule::hex_number | Rule::decimal_number => "a number",
        Rule::string => "a string",
        Rule::template => "a template literal",
        Rule::expression
        | Rule::assignment_expression
        | Rule::conditional_expression
        | Rule::binary_expression
        | Rule::unary_expression
        | Rule::update_expression
        | Rule::left_hand_side => "an expression",
        Rule::assignment_operator => "an assignment operator",
        Rule::unary_operator => "a unary operator",
        Rule::arguments => "an argument list",
        Rule::array_literal => "an array literal",
        Rule::object_literal => "an object literal",
        Rule::property_key => "a property name",
        Rule::formal_parameters => "a parameter list",
        Rule::function_body | Rule::block_statement => "a block",
        Rule::binding_element | Rule::array_binding | Rule::object_binding => "a binding pattern",
        Rule::variable_declarator => "a variable declarator",
        Rule::catch_clause => "a catch clause",
        Rule::finally_clause => "a finally clause",
        Rule::switch_case => "a case clause",
        Rule::kw_while => "`while`",
        Rule::kw_of => "`of`",
        Rule::kw_in => "`in`",
        Rule::variable_statement
        | Rule::function_declaration
        | Rule::if_statement
        | Rule::for_statement
        | Rule::for_each_statement
        | Rule::while_statement
        | Rule::do_while_statement
        | Rule::return_statement
        | Rule::throw_statement
        | Rule::try_statement
        | Rule::switch_statement
        | Rule::expression_statement => "a statement",
        _ => "a token",
    }
}
