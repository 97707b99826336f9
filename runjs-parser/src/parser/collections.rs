// Collection literal parsing
// Array literals with holes and spread, object literals with shorthand, methods and spread

use std::rc::Rc;

use super::{JsParser, Rule};
use crate::ast::*;
use crate::error::*;

impl JsParser {
    /// Parse an array literal; a trailing comma does not add a hole
    pub(super) fn parse_array_literal(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Vec<ArrayElement>> {
        let mut elements = pair
            .into_inner()
            .map(|slot| match slot.into_inner().next() {
                None => Ok(ArrayElement::Hole),
                Some(inner) if inner.as_rule() == Rule::spread_element => {
                    Ok(ArrayElement::Spread(Self::parse_spread_element(inner)?))
                }
                Some(inner) => Ok(ArrayElement::Expression(
                    Self::parse_expression_from_pair(inner)?,
                )),
            })
            .collect::<ParseResult<Vec<_>>>()?;

        if let Some(ArrayElement::Hole) = elements.last() {
            elements.pop();
        }

        Ok(elements)
    }

    /// Parse an object literal
    pub(super) fn parse_object_literal(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Vec<ObjectMember>> {
        pair.into_inner().map(Self::parse_object_member).collect()
    }

    fn parse_object_member(pair: pest::iterators::Pair<Rule>) -> ParseResult<ObjectMember> {
        let span = Self::span_from_pair(&pair);

        match pair.as_rule() {
            Rule::spread_element => Ok(ObjectMember::Spread(Self::parse_spread_element(pair)?)),
            Rule::property_assignment => {
                let mut inner = pair.into_inner();
                let key = Self::parse_property_key(inner.next().unwrap())?;
                let value = Self::parse_expression_from_pair(inner.next().unwrap())?;
                Ok(ObjectMember::Property { key, value })
            }
            Rule::method_definition => {
                let mut inner = pair.into_inner();
                let key = Self::parse_property_key(inner.next().unwrap())?;
                let params = Self::parse_formal_parameters(inner.next().unwrap())?;
                let body = Self::parse_block(inner.next().unwrap())?;

                let function = Function {
                    kind: FunctionKind::Expression,
                    id: None,
                    params,
                    body: FunctionBody::Block(body),
                    span,
                };
                Ok(ObjectMember::Property {
                    key,
                    value: Expression {
                        kind: ExpressionKind::Function(Rc::new(function)),
                        span,
                    },
                })
            }
            Rule::shorthand_property => {
                let identifier = Self::parse_identifier(pair.into_inner().next().unwrap());
                Ok(ObjectMember::Property {
                    key: PropertyKey::Static(identifier.name.clone()),
                    value: Expression {
                        kind: ExpressionKind::Identifier(identifier),
                        span,
                    },
                })
            }
            _ => Err(ParseError::unexpected_token(span, "an object member")),
        }
    }

    /// Parse a property key: identifier, string, number or `[computed]`
    pub(crate) fn parse_property_key(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<PropertyKey> {
        let inner = pair.into_inner().next().unwrap();

        match inner.as_rule() {
            Rule::computed_key => {
                let expression =
                    Self::parse_expression_from_pair(inner.into_inner().next().unwrap())?;
                Ok(PropertyKey::Computed(Box::new(expression)))
            }
            Rule::string => Ok(PropertyKey::Static(Self::parse_string(inner)?)),
            Rule::number => Ok(PropertyKey::Number(Self::parse_number(inner)?)),
            _ => Ok(PropertyKey::Static(inner.as_str().to_string())),
        }
    }
}
