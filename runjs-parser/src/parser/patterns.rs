// Pattern parsing module
// Binding patterns for declarations and parameters, plus reinterpretation of
// expressions as assignment targets

use super::{JsParser, Rule};
use crate::ast::*;
use crate::error::*;

impl JsParser {
    /// Parse an identifier, array binding or object binding
    pub(crate) fn parse_binding_target(pair: pest::iterators::Pair<Rule>) -> ParseResult<Pattern> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::identifier => PatternKind::Identifier(Self::parse_identifier(pair)),
            Rule::array_binding => {
                let mut elements = pair
                    .into_inner()
                    .map(|slot| {
                        slot.into_inner()
                            .next()
                            .map(Self::parse_binding_element)
                            .transpose()
                    })
                    .collect::<ParseResult<Vec<_>>>()?;

                if let Some(None) = elements.last() {
                    elements.pop();
                }
                Self::ensure_rest_is_last(elements.iter().flatten())?;

                PatternKind::Array(ArrayPattern { elements })
            }
            Rule::object_binding => Self::parse_object_binding(pair)?,
            _ => return Err(ParseError::unexpected_token(span, "a binding pattern")),
        };

        Ok(Pattern { kind, span })
    }

    /// Parse a binding element with optional default, or a rest element
    pub(crate) fn parse_binding_element(pair: pest::iterators::Pair<Rule>) -> ParseResult<Pattern> {
        let span = Self::span_from_pair(&pair);

        match pair.as_rule() {
            Rule::binding_element => {
                let mut inner = pair.into_inner();
                let target = Self::parse_binding_target(inner.next().unwrap())?;
                match inner.next() {
                    Some(default) => Ok(Pattern {
                        kind: PatternKind::Assignment(AssignmentPattern {
                            target: Box::new(target),
                            default: Box::new(Self::parse_expression_from_pair(default)?),
                        }),
                        span,
                    }),
                    None => Ok(target),
                }
            }
            Rule::rest_element => {
                let target = Self::parse_binding_target(pair.into_inner().next().unwrap())?;
                Ok(Pattern {
                    kind: PatternKind::Rest(Box::new(target)),
                    span,
                })
            }
            _ => Self::parse_binding_target(pair),
        }
    }

    fn parse_object_binding(pair: pest::iterators::Pair<Rule>) -> ParseResult<PatternKind> {
        let mut properties = Vec::new();
        let mut rest = None;

        for member in pair.into_inner() {
            let member_span = Self::span_from_pair(&member);
            if rest.is_some() {
                return Err(ParseError::invalid_rest_element(member_span));
            }

            match member.as_rule() {
                Rule::rest_element => {
                    let target = Self::parse_binding_target(member.into_inner().next().unwrap())?;
                    if !matches!(target.kind, PatternKind::Identifier(_)) {
                        return Err(ParseError::invalid_rest_element(member_span));
                    }
                    rest = Some(Box::new(target));
                }
                Rule::object_binding_property => {
                    let mut inner = member.into_inner();
                    let key = Self::parse_property_key(inner.next().unwrap())?;
                    let value = Self::parse_binding_element(inner.next().unwrap())?;
                    properties.push(ObjectPatternProperty { key, value });
                }
                _ => {
                    // Shorthand `{ name }` or `{ name = default }`
                    let value = Self::parse_binding_element(member)?;
                    let name = match &value.kind {
                        PatternKind::Identifier(identifier) => identifier.name.clone(),
                        PatternKind::Assignment(assignment) => match &assignment.target.kind {
                            PatternKind::Identifier(identifier) => identifier.name.clone(),
                            _ => {
                                return Err(ParseError::unexpected_token(
                                    member_span,
                                    "a property name",
                                ))
                            }
                        },
                        _ => {
                            return Err(ParseError::unexpected_token(
                                member_span,
                                "a property name",
                            ))
                        }
                    };
                    properties.push(ObjectPatternProperty {
                        key: PropertyKey::Static(name),
                        value,
                    });
                }
            }
        }

        Ok(PatternKind::Object(ObjectPattern { properties, rest }))
    }

    pub(crate) fn ensure_rest_is_last<'a>(
        patterns: impl Iterator<Item = &'a Pattern>,
    ) -> ParseResult<()> {
        let patterns: Vec<&Pattern> = patterns.collect();
        let count = patterns.len();

        for (index, pattern) in patterns.into_iter().enumerate() {
            if matches!(pattern.kind, PatternKind::Rest(_)) && index + 1 != count {
                return Err(ParseError::invalid_rest_element(pattern.span));
            }
        }
        Ok(())
    }

    /// Reinterpret an already-parsed expression as the target of `=`,
    /// `for-in`/`for-of`, or a nested destructuring element
    pub(crate) fn expression_to_pattern(expression: Expression) -> ParseResult<Pattern> {
        let span = expression.span;

        let kind = match expression.kind {
            ExpressionKind::Identifier(identifier) => PatternKind::Identifier(identifier),
            ExpressionKind::Member(member) => PatternKind::Member(member),
            ExpressionKind::Array(elements) => {
                let count = elements.len();
                let mut patterns = Vec::with_capacity(count);

                for (index, element) in elements.into_iter().enumerate() {
                    patterns.push(match element {
                        ArrayElement::Hole => None,
                        ArrayElement::Expression(expression) => {
                            Some(Self::expression_to_pattern(expression)?)
                        }
                        ArrayElement::Spread(expression) => {
                            let rest_span = expression.span;
                            if index + 1 != count {
                                return Err(ParseError::invalid_rest_element(rest_span));
                            }
                            Some(Pattern {
                                kind: PatternKind::Rest(Box::new(
                                    Self::expression_to_pattern(expression)?,
                                )),
                                span: rest_span,
                            })
                        }
                    });
                }

                PatternKind::Array(ArrayPattern { elements: patterns })
            }
            ExpressionKind::Object(members) => {
                let count = members.len();
                let mut properties = Vec::new();
                let mut rest = None;

                for (index, member) in members.into_iter().enumerate() {
                    match member {
                        ObjectMember::Property { key, value } => {
                            properties.push(ObjectPatternProperty {
                                key,
                                value: Self::expression_to_pattern(value)?,
                            });
                        }
                        ObjectMember::Spread(expression) => {
                            if index + 1 != count {
                                return Err(ParseError::invalid_rest_element(expression.span));
                            }
                            rest = Some(Box::new(Self::simple_assignment_target(expression)?));
                        }
                    }
                }

                PatternKind::Object(ObjectPattern { properties, rest })
            }
            ExpressionKind::Assignment(AssignmentOperation {
                target,
                operator: AssignmentOperator::Assign,
                value,
            }) => PatternKind::Assignment(AssignmentPattern {
                target: Box::new(target),
                default: value,
            }),
            _ => return Err(ParseError::invalid_assignment_target(span)),
        };

        Ok(Pattern { kind, span })
    }

    /// Targets of compound assignment: identifiers and member expressions only
    pub(crate) fn simple_assignment_target(expression: Expression) -> ParseResult<Pattern> {
        let span = expression.span;
        match expression.kind {
            ExpressionKind::Identifier(identifier) => Ok(Pattern {
                kind: PatternKind::Identifier(identifier),
                span,
            }),
            ExpressionKind::Member(member) => Ok(Pattern {
                kind: PatternKind::Member(member),
                span,
            }),
            _ => Err(ParseError::invalid_assignment_target(span)),
        }
    }
}
