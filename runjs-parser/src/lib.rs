// runjs Parser Library
// Pest-based parser for the ES5/ES6 subset executed by runjs-interpreter

pub mod ast;
pub mod error;
pub mod parser;

pub use ast::*;
pub use error::*;
pub use parser::{JsParser, ParseOptions};

// Re-export parser rule for manual testing
pub use parser::Rule;

// Main parsing functions
pub fn parse_program(input: &str) -> Result<Program, ParseError> {
    JsParser::parse_program(input)
}

pub fn parse_program_with_options(
    input: &str,
    options: &ParseOptions,
) -> Result<Program, ParseError> {
    JsParser::parse_program_with_options(input, options)
}

pub fn parse_expression(input: &str) -> Result<Expression, ParseError> {
    JsParser::parse_expression(input)
}

// Version and metadata
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
