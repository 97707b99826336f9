// Expression parsing module
// Handles operator precedence, assignment, unary/update operators, member access and calls

use pest::pratt_parser::{Assoc, Op, PrattParser};

use super::{JsParser, Rule};
use crate::ast::*;
use crate::error::*;

impl JsParser {
    /// Binary operator precedence parser
    /// Precedence levels from lowest to highest
    pub(crate) fn pratt_parser() -> PrattParser<Rule> {
        PrattParser::new()
            // Level 1: Nullish coalescing (lowest precedence)
            .op(Op::infix(Rule::op_nullish, Assoc::Left))
            // Level 2: Logical OR
            .op(Op::infix(Rule::op_logical_or, Assoc::Left))
            // Level 3: Logical AND
            .op(Op::infix(Rule::op_logical_and, Assoc::Left))
            // Level 4: Bitwise OR
            .op(Op::infix(Rule::op_bitwise_or, Assoc::Left))
            // Level 5: Bitwise XOR
            .op(Op::infix(Rule::op_bitwise_xor, Assoc::Left))
            // Level 6: Bitwise AND
            .op(Op::infix(Rule::op_bitwise_and, Assoc::Left))
            // Level 7: Equality
            .op(Op::infix(Rule::op_equal, Assoc::Left)
                | Op::infix(Rule::op_not_equal, Assoc::Left)
                | Op::infix(Rule::op_strict_equal, Assoc::Left)
                | Op::infix(Rule::op_strict_not_equal, Assoc::Left))
            // Level 8: Relational
            .op(Op::infix(Rule::op_less, Assoc::Left)
                | Op::infix(Rule::op_less_equal, Assoc::Left)
                | Op::infix(Rule::op_greater, Assoc::Left)
                | Op::infix(Rule::op_greater_equal, Assoc::Left)
                | Op::infix(Rule::kw_instanceof, Assoc::Left)
                | Op::infix(Rule::kw_in, Assoc::Left))
            // Level 9: Shift
            .op(Op::infix(Rule::op_shift_left, Assoc::Left)
                | Op::infix(Rule::op_shift_right, Assoc::Left)
                | Op::infix(Rule::op_unsigned_shift_right, Assoc::Left))
            // Level 10: Additive
            .op(Op::infix(Rule::op_add, Assoc::Left) | Op::infix(Rule::op_subtract, Assoc::Left))
            // Level 11: Multiplicative
            .op(Op::infix(Rule::op_multiply, Assoc::Left)
                | Op::infix(Rule::op_divide, Assoc::Left)
                | Op::infix(Rule::op_modulo, Assoc::Left))
            // Level 12: Exponentiation (highest precedence, right associative)
            .op(Op::infix(Rule::op_exponent, Assoc::Right))
    }

    /// Parse a flat `binary_expression` using precedence climbing
    pub(crate) fn parse_expression_with_precedence(
        pairs: pest::iterators::Pairs<Rule>,
    ) -> ParseResult<Expression> {
        let parser = Self::pratt_parser();

        parser
            .map_primary(Self::parse_expression_from_pair)
            .map_infix(
                |left: ParseResult<Expression>,
                 op: pest::iterators::Pair<Rule>,
                 right: ParseResult<Expression>| {
                    let left = left?;
                    let right = right?;
                    let span = Self::span_from_range(left.span.start, right.span.end);

                    let logical = match op.as_rule() {
                        Rule::op_logical_and => Some(LogicalOperator::And),
                        Rule::op_logical_or => Some(LogicalOperator::Or),
                        Rule::op_nullish => Some(LogicalOperator::NullishCoalescing),
                        _ => None,
                    };
                    if let Some(operator) = logical {
                        return Ok(Expression {
                            kind: ExpressionKind::Logical(LogicalOperation {
                                left: Box::new(left),
                                operator,
                                right: Box::new(right),
                            }),
                            span,
                        });
                    }

                    let operator = match op.as_rule() {
                        // Equality operators
                        Rule::op_equal => BinaryOperator::Equal,
                        Rule::op_not_equal => BinaryOperator::NotEqual,
                        Rule::op_strict_equal => BinaryOperator::StrictEqual,
                        Rule::op_strict_not_equal => BinaryOperator::StrictNotEqual,
                        // Relational operators
                        Rule::op_less => BinaryOperator::Less,
                        Rule::op_less_equal => BinaryOperator::LessEqual,
                        Rule::op_greater => BinaryOperator::Greater,
                        Rule::op_greater_equal => BinaryOperator::GreaterEqual,
                        Rule::kw_instanceof => BinaryOperator::InstanceOf,
                        Rule::kw_in => BinaryOperator::In,
                        // Bitwise operators
                        Rule::op_bitwise_and => BinaryOperator::BitwiseAnd,
                        Rule::op_bitwise_or => BinaryOperator::BitwiseOr,
                        Rule::op_bitwise_xor => BinaryOperator::BitwiseXor,
                        Rule::op_shift_left => BinaryOperator::ShiftLeft,
                        Rule::op_shift_right => BinaryOperator::ShiftRight,
                        Rule::op_unsigned_shift_right => BinaryOperator::UnsignedShiftRight,
                        // Arithmetic operators
                        Rule::op_add => BinaryOperator::Add,
                        Rule::op_subtract => BinaryOperator::Subtract,
                        Rule::op_multiply => BinaryOperator::Multiply,
                        Rule::op_divide => BinaryOperator::Divide,
                        Rule::op_modulo => BinaryOperator::Modulo,
                        Rule::op_exponent => BinaryOperator::Exponent,
                        _ => unreachable!("Unexpected binary operator: {:?}", op.as_rule()),
                    };

                    Ok(Expression {
                        kind: ExpressionKind::Binary(BinaryOperation {
                            left: Box::new(left),
                            operator,
                            right: Box::new(right),
                        }),
                        span,
                    })
                },
            )
            .parse(pairs)
    }

    /// Parse an expression from any expression-level Pest pair
    pub(crate) fn parse_expression_from_pair(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::expression => {
                let mut expressions = pair
                    .into_inner()
                    .map(Self::parse_expression_from_pair)
                    .collect::<ParseResult<Vec<_>>>()?;
                if expressions.len() == 1 {
                    return Ok(expressions.pop().unwrap());
                }
                ExpressionKind::Sequence(expressions)
            }
            Rule::assignment_expression => return Self::parse_assignment_expression(pair),
            Rule::conditional_expression => {
                let mut inner = pair.into_inner();
                let test = Self::parse_expression_from_pair(inner.next().unwrap())?;
                let Some(consequent) = inner.next() else {
                    return Ok(test);
                };
                let consequent = Self::parse_expression_from_pair(consequent)?;
                let alternate = Self::parse_expression_from_pair(inner.next().unwrap())?;
                ExpressionKind::Conditional(ConditionalExpression {
                    test: Box::new(test),
                    consequent: Box::new(consequent),
                    alternate: Box::new(alternate),
                })
            }
            Rule::binary_expression => {
                return Self::parse_expression_with_precedence(pair.into_inner());
            }
            Rule::unary_expression => return Self::parse_unary_expression(pair),
            Rule::update_expression => return Self::parse_update_expression(pair),
            Rule::left_hand_side => return Self::parse_left_hand_side(pair),
            Rule::new_expression => return Self::parse_new_expression(pair),
            Rule::parenthesized => {
                let inner = pair.into_inner().next().unwrap();
                return Self::parse_expression_from_pair(inner);
            }
            Rule::this_expression => ExpressionKind::This,
            Rule::null_literal => ExpressionKind::Null,
            Rule::identifier => ExpressionKind::Identifier(Self::parse_identifier(pair)),
            Rule::boolean => ExpressionKind::Boolean(Self::parse_boolean(pair)),
            Rule::number => ExpressionKind::Number(Self::parse_number(pair)?),
            Rule::string => ExpressionKind::String(Self::parse_string(pair)?),
            Rule::template => ExpressionKind::Template(Self::parse_template(pair)?),
            Rule::array_literal => ExpressionKind::Array(Self::parse_array_literal(pair)?),
            Rule::object_literal => ExpressionKind::Object(Self::parse_object_literal(pair)?),
            Rule::function_expression => {
                ExpressionKind::Function(Self::parse_function_expression(pair)?)
            }
            Rule::arrow_function => ExpressionKind::Function(Self::parse_arrow_function(pair)?),
            _ => {
                return Err(ParseError::unexpected_token(span, "an expression"));
            }
        };

        Ok(Expression { kind, span })
    }

    pub(crate) fn parse_identifier(pair: pest::iterators::Pair<Rule>) -> Identifier {
        Identifier {
            name: pair.as_str().to_string(),
            span: Self::span_from_pair(&pair),
        }
    }

    fn parse_assignment_expression(pair: pest::iterators::Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        let left = Self::parse_expression_from_pair(inner.next().unwrap())?;

        let Some(operator_pair) = inner.next() else {
            return Ok(left);
        };

        let operator = match operator_pair.into_inner().next().unwrap().as_rule() {
            Rule::op_assign => AssignmentOperator::Assign,
            Rule::op_assign_add => AssignmentOperator::Add,
            Rule::op_assign_subtract => AssignmentOperator::Subtract,
            Rule::op_assign_multiply => AssignmentOperator::Multiply,
            Rule::op_assign_divide => AssignmentOperator::Divide,
            Rule::op_assign_modulo => AssignmentOperator::Modulo,
            Rule::op_assign_exponent => AssignmentOperator::Exponent,
            Rule::op_assign_shift_left => AssignmentOperator::ShiftLeft,
            Rule::op_assign_shift_right => AssignmentOperator::ShiftRight,
            Rule::op_assign_unsigned_shift_right => AssignmentOperator::UnsignedShiftRight,
            Rule::op_assign_bitwise_and => AssignmentOperator::BitwiseAnd,
            Rule::op_assign_bitwise_or => AssignmentOperator::BitwiseOr,
            Rule::op_assign_bitwise_xor => AssignmentOperator::BitwiseXor,
            Rule::op_assign_logical_and => AssignmentOperator::LogicalAnd,
            Rule::op_assign_logical_or => AssignmentOperator::LogicalOr,
            Rule::op_assign_nullish => AssignmentOperator::Nullish,
            rule => unreachable!("Unexpected assignment operator: {:?}", rule),
        };

        // Only plain `=` may destructure
        let target = if operator == AssignmentOperator::Assign {
            Self::expression_to_pattern(left)?
        } else {
            Self::simple_assignment_target(left)?
        };
        let value = Self::parse_expression_from_pair(inner.next().unwrap())?;

        Ok(Expression {
            kind: ExpressionKind::Assignment(AssignmentOperation {
                target,
                operator,
                value: Box::new(value),
            }),
            span,
        })
    }

    fn parse_unary_expression(pair: pest::iterators::Pair<Rule>) -> ParseResult<Expression> {
        let mut operators = Vec::new();
        let mut operand = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::unary_operator => operators.push(inner),
                _ => operand = Some(Self::parse_expression_from_pair(inner)?),
            }
        }

        let mut expression = operand.unwrap();

        // Innermost operator binds first
        for operator_pair in operators.into_iter().rev() {
            let start = operator_pair.as_span().start();
            let span = Self::span_from_range(start, expression.span.end);
            let operator_rule = operator_pair.into_inner().next().unwrap().as_rule();

            let kind = match operator_rule {
                Rule::op_increment | Rule::op_decrement => {
                    let operator = if operator_rule == Rule::op_increment {
                        UpdateOperator::Increment
                    } else {
                        UpdateOperator::Decrement
                    };
                    Self::ensure_update_target(&expression)?;
                    ExpressionKind::Update(UpdateOperation {
                        operator,
                        prefix: true,
                        argument: Box::new(expression),
                    })
                }
                _ => {
                    let operator = match operator_rule {
                        Rule::op_not => UnaryOperator::Not,
                        Rule::op_bitwise_not => UnaryOperator::BitwiseNot,
                        Rule::op_plus => UnaryOperator::Plus,
                        Rule::op_minus => UnaryOperator::Minus,
                        Rule::kw_typeof => UnaryOperator::TypeOf,
                        Rule::kw_void => UnaryOperator::Void,
                        Rule::kw_delete => UnaryOperator::Delete,
                        rule => unreachable!("Unexpected unary operator: {:?}", rule),
                    };
                    ExpressionKind::Unary(UnaryOperation {
                        operator,
                        argument: Box::new(expression),
                    })
                }
            };

            expression = Expression { kind, span };
        }

        Ok(expression)
    }

    fn parse_update_expression(pair: pest::iterators::Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        let argument = Self::parse_expression_from_pair(inner.next().unwrap())?;

        let Some(postfix) = inner.next() else {
            return Ok(argument);
        };

        let operator = match postfix.into_inner().next().unwrap().as_rule() {
            Rule::op_increment => UpdateOperator::Increment,
            _ => UpdateOperator::Decrement,
        };
        Self::ensure_update_target(&argument)?;

        Ok(Expression {
            kind: ExpressionKind::Update(UpdateOperation {
                operator,
                prefix: false,
                argument: Box::new(argument),
            }),
            span,
        })
    }

    fn ensure_update_target(expression: &Expression) -> ParseResult<()> {
        match expression.kind {
            ExpressionKind::Identifier(_) | ExpressionKind::Member(_) => Ok(()),
            _ => Err(ParseError::invalid_assignment_target(expression.span)),
        }
    }

    /// Parse a primary expression followed by member accesses and calls
    pub(crate) fn parse_left_hand_side(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Expression> {
        let mut inner = pair.into_inner();
        let base = Self::parse_expression_from_pair(inner.next().unwrap())?;
        Self::apply_suffixes(base, inner)
    }

    fn parse_new_expression(pair: pest::iterators::Pair<Rule>) -> ParseResult<Expression> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        inner.next(); // new

        let mut callee = Self::parse_expression_from_pair(inner.next().unwrap())?;
        let mut arguments = Vec::new();

        for suffix in inner {
            match suffix.as_rule() {
                Rule::arguments => arguments = Self::parse_arguments(suffix)?,
                _ => callee = Self::apply_suffix(callee, suffix)?,
            }
        }

        Ok(Expression {
            kind: ExpressionKind::New(CallExpression {
                callee: Box::new(callee),
                arguments,
            }),
            span,
        })
    }

    fn apply_suffixes(
        mut expression: Expression,
        suffixes: pest::iterators::Pairs<Rule>,
    ) -> ParseResult<Expression> {
        for suffix in suffixes {
            expression = Self::apply_suffix(expression, suffix)?;
        }
        Ok(expression)
    }

    fn apply_suffix(
        object: Expression,
        suffix: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Expression> {
        let span = Self::span_from_range(object.span.start, suffix.as_span().end());

        let kind = match suffix.as_rule() {
            Rule::static_member => {
                let name = suffix.into_inner().next().unwrap();
                ExpressionKind::Member(MemberExpression {
                    object: Box::new(object),
                    property: MemberProperty::Static(Self::parse_identifier(name)),
                })
            }
            Rule::computed_member => {
                let property =
                    Self::parse_expression_from_pair(suffix.into_inner().next().unwrap())?;
                ExpressionKind::Member(MemberExpression {
                    object: Box::new(object),
                    property: MemberProperty::Computed(Box::new(property)),
                })
            }
            Rule::arguments => ExpressionKind::Call(CallExpression {
                callee: Box::new(object),
                arguments: Self::parse_arguments(suffix)?,
            }),
            rule => unreachable!("Unexpected member suffix: {:?}", rule),
        };

        Ok(Expression { kind, span })
    }

    fn parse_arguments(pair: pest::iterators::Pair<Rule>) -> ParseResult<Vec<Argument>> {
        pair.into_inner()
            .map(|argument| match argument.as_rule() {
                Rule::spread_element => Ok(Argument::Spread(Self::parse_spread_element(argument)?)),
                _ => Ok(Argument::Expression(Self::parse_expression_from_pair(argument)?)),
            })
            .collect()
    }

    pub(crate) fn parse_spread_element(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<Expression> {
        Self::parse_expression_from_pair(pair.into_inner().next().unwrap())
    }
}
