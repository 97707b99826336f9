// runjs Parser
// Pest-driven parser that turns source text into the typed AST

mod collections;
mod expressions;
mod functions;
mod literals;
mod patterns;
mod statements;

use pest::Parser;
use pest_derive::Parser;

use crate::ast::*;
use crate::error::*;

#[derive(Parser)]
#[grammar = "grammar.pest"]
pub struct JsParser;

/// Options forwarded from the host to the parser
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Recorded on the resulting `Program` for diagnostics
    pub source_file: Option<String>,
    /// Accept `return` at the top level of a program
    pub allow_return_outside_function: bool,
}

impl JsParser {
    /// Parse a complete program with default options
    pub fn parse_program(input: &str) -> ParseResult<Program> {
        Self::parse_program_with_options(input, &ParseOptions::default())
    }

    /// Parse a complete program
    pub fn parse_program_with_options(input: &str, options: &ParseOptions) -> ParseResult<Program> {
        Self::build_program(input, options).map_err(|error| error.with_source_code(input))
    }

    /// Parse a single expression (used by tests and host tooling)
    pub fn parse_expression(input: &str) -> ParseResult<Expression> {
        let statement = Self::parse_program(input)?
            .body
            .into_iter()
            .next()
            .ok_or_else(|| {
                ParseError::unexpected_token(Span::new(0, input.len()), "an expression")
                    .with_source_code(input)
            })?;

        match statement.kind {
            StatementKind::Expression(expression) => Ok(expression),
            _ => Err(ParseError::unexpected_token(statement.span, "an expression")
                .with_source_code(input)),
        }
    }

    fn build_program(input: &str, options: &ParseOptions) -> ParseResult<Program> {
        let mut pairs = JsParser::parse(Rule::program, input)
            .map_err(|error| ParseError::from_pest_error(error, input.to_string()))?;
        let program_pair = pairs.next().unwrap();
        let span = Self::span_from_pair(&program_pair);

        let body = program_pair
            .into_inner()
            .filter(|pair| pair.as_rule() != Rule::EOI)
            .map(Self::parse_statement)
            .collect::<ParseResult<Vec<_>>>()?;

        if !options.allow_return_outside_function {
            reject_top_level_return(&body)?;
        }

        Ok(Program {
            body,
            source_file: options.source_file.clone(),
            span,
        })
    }

    pub(crate) fn span_from_pair(pair: &pest::iterators::Pair<Rule>) -> Span {
        let span = pair.as_span();
        Span::new(span.start(), span.end())
    }

    pub(crate) fn span_from_range(start: usize, end: usize) -> Span {
        Span::new(start, end)
    }
}

/// `return` is only legal inside function bodies. Functions are never
/// entered here, so any `return` reached is at program level.
fn reject_top_level_return(statements: &[Statement]) -> ParseResult<()> {
    for statement in statements {
        match &statement.kind {
            StatementKind::Return(_) => {
                return Err(ParseError::return_outside_function(statement.span));
            }
            StatementKind::Block(block) => reject_top_level_return(&block.body)?,
            StatementKind::If(if_statement) => {
                reject_top_level_return(std::slice::from_ref(&*if_statement.consequent))?;
                if let Some(alternate) = &if_statement.alternate {
                    reject_top_level_return(std::slice::from_ref(&**alternate))?;
                }
            }
            StatementKind::For(for_statement) => {
                reject_top_level_return(std::slice::from_ref(&*for_statement.body))?
            }
            StatementKind::ForIn(each) | StatementKind::ForOf(each) => {
                reject_top_level_return(std::slice::from_ref(&*each.body))?
            }
            StatementKind::While(while_statement) | StatementKind::DoWhile(while_statement) => {
                reject_top_level_return(std::slice::from_ref(&*while_statement.body))?
            }
            StatementKind::Try(try_statement) => {
                reject_top_level_return(&try_statement.block.body)?;
                if let Some(handler) = &try_statement.handler {
                    reject_top_level_return(&handler.body.body)?;
                }
                if let Some(finalizer) = &try_statement.finalizer {
                    reject_top_level_return(&finalizer.body)?;
                }
            }
            StatementKind::Switch(switch) => {
                for case in &switch.cases {
                    reject_top_level_return(&case.consequent)?;
                }
            }
            StatementKind::Expression(_)
            | StatementKind::VariableDeclaration(_)
            | StatementKind::FunctionDeclaration(_)
            | StatementKind::Empty
            | StatementKind::Break
            | StatementKind::Continue
            | StatementKind::Throw(_) => {}
        }
    }
    Ok(())
}
