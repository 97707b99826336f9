// Function parsing module
// Declarations, function expressions, arrow functions and parameter lists

use std::rc::Rc;

use super::{JsParser, Rule};
use crate::ast::*;
use crate::error::*;

impl JsParser {
    /// Parse `function name(params) { body }`
    pub(super) fn parse_function_declaration(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Rc<Function>> {
        Self::parse_function(pair, FunctionKind::Declaration)
    }

    /// Parse `function name?(params) { body }` in expression position
    pub(super) fn parse_function_expression(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Rc<Function>> {
        Self::parse_function(pair, FunctionKind::Expression)
    }

    fn parse_function(
        pair: pest::iterators::Pair<Rule>,
        kind: FunctionKind,
    ) -> ParseResult<Rc<Function>> {
        let span = Self::span_from_pair(&pair);
        let mut id = None;
        let mut params = Vec::new();
        let mut body = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                // Skip "function" keyword (already consumed by grammar)
                Rule::kw_function => {}
                Rule::identifier => id = Some(Self::parse_identifier(inner)),
                Rule::formal_parameters => params = Self::parse_formal_parameters(inner)?,
                Rule::function_body => body = Some(Self::parse_block(inner)?),
                rule => unreachable!("Unexpected function part: {:?}", rule),
            }
        }

        Ok(Rc::new(Function {
            kind,
            id,
            params,
            body: FunctionBody::Block(body.unwrap()),
            span,
        }))
    }

    /// Parse `params => body`
    pub(super) fn parse_arrow_function(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Rc<Function>> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();

        let parameters = inner.next().unwrap().into_inner().next().unwrap();
        let params = match parameters.as_rule() {
            Rule::identifier => {
                let identifier = Self::parse_identifier(parameters);
                vec![Pattern {
                    span: identifier.span,
                    kind: PatternKind::Identifier(identifier),
                }]
            }
            _ => Self::parse_formal_parameters(parameters)?,
        };

        let body_pair = inner.next().unwrap().into_inner().next().unwrap();
        let body = match body_pair.as_rule() {
            Rule::function_body => FunctionBody::Block(Self::parse_block(body_pair)?),
            _ => FunctionBody::Expression(Box::new(Self::parse_expression_from_pair(body_pair)?)),
        };

        Ok(Rc::new(Function {
            kind: FunctionKind::Arrow,
            id: None,
            params,
            body,
            span,
        }))
    }

    /// Parse a parenthesised parameter list; a rest parameter must come last
    pub(crate) fn parse_formal_parameters(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Vec<Pattern>> {
        let params = pair
            .into_inner()
            .map(Self::parse_binding_element)
            .collect::<ParseResult<Vec<_>>>()?;

        Self::ensure_rest_is_last(params.iter())?;
        Ok(params)
    }
}
