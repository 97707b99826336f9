// Statement parsing module
// Declarations, control flow, loops, exceptions and switch

use super::{JsParser, Rule};
use crate::ast::*;
use crate::error::*;

impl JsParser {
    /// Parse any statement rule into a `Statement`
    pub(crate) fn parse_statement(pair: pest::iterators::Pair<Rule>) -> ParseResult<Statement> {
        let span = Self::span_from_pair(&pair);

        let kind = match pair.as_rule() {
            Rule::block_statement => StatementKind::Block(Self::parse_block(pair)?),
            Rule::empty_statement => StatementKind::Empty,
            Rule::variable_statement => {
                let declaration = pair.into_inner().next().unwrap();
                StatementKind::VariableDeclaration(Self::parse_variable_declaration(declaration)?)
            }
            Rule::function_declaration => {
                StatementKind::FunctionDeclaration(Self::parse_function_declaration(pair)?)
            }
            Rule::if_statement => StatementKind::If(Self::parse_if_statement(pair)?),
            Rule::for_statement => StatementKind::For(Self::parse_for_statement(pair)?),
            Rule::for_each_statement => Self::parse_for_each_statement(pair)?,
            Rule::while_statement => {
                let mut inner = pair.into_inner();
                inner.next(); // while
                let test = Self::parse_expression_from_pair(inner.next().unwrap())?;
                let body = Self::parse_statement(inner.next().unwrap())?;
                StatementKind::While(WhileStatement {
                    test,
                    body: Box::new(body),
                })
            }
            Rule::do_while_statement => {
                let mut inner = pair.into_inner();
                inner.next(); // do
                let body = Self::parse_statement(inner.next().unwrap())?;
                inner.next(); // while
                let test = Self::parse_expression_from_pair(inner.next().unwrap())?;
                StatementKind::DoWhile(WhileStatement {
                    test,
                    body: Box::new(body),
                })
            }
            Rule::break_statement => StatementKind::Break,
            Rule::continue_statement => StatementKind::Continue,
            Rule::return_statement => {
                let argument = pair
                    .into_inner()
                    .find(|inner| inner.as_rule() == Rule::expression)
                    .map(Self::parse_expression_from_pair)
                    .transpose()?;
                StatementKind::Return(argument)
            }
            Rule::throw_statement => {
                let argument = pair
                    .into_inner()
                    .find(|inner| inner.as_rule() == Rule::expression)
                    .unwrap();
                StatementKind::Throw(Self::parse_expression_from_pair(argument)?)
            }
            Rule::try_statement => StatementKind::Try(Self::parse_try_statement(pair, span)?),
            Rule::switch_statement => StatementKind::Switch(Self::parse_switch_statement(pair)?),
            Rule::expression_statement => {
                let expression = pair.into_inner().next().unwrap();
                StatementKind::Expression(Self::parse_expression_from_pair(expression)?)
            }
            _ => {
                return Err(ParseError::unexpected_token(span, "a statement"));
            }
        };

        Ok(Statement { kind, span })
    }

    /// Parse a `{ ... }` block (also used for function bodies)
    pub(crate) fn parse_block(pair: pest::iterators::Pair<Rule>) -> ParseResult<BlockStatement> {
        let span = Self::span_from_pair(&pair);
        let body = pair
            .into_inner()
            .map(Self::parse_statement)
            .collect::<ParseResult<Vec<_>>>()?;

        Ok(BlockStatement { body, span })
    }

    fn parse_declaration_kind(pair: pest::iterators::Pair<Rule>) -> DeclarationKind {
        match pair.into_inner().next().unwrap().as_rule() {
            Rule::kw_let => DeclarationKind::Let,
            Rule::kw_const => DeclarationKind::Const,
            _ => DeclarationKind::Var,
        }
    }

    pub(crate) fn parse_variable_declaration(
        pair: pest::iterators::Pair<Rule>,
    ) -> ParseResult<VariableDeclaration> {
        let span = Self::span_from_pair(&pair);
        let mut inner = pair.into_inner();
        let kind = Self::parse_declaration_kind(inner.next().unwrap());

        let mut declarations = Vec::new();
        for declarator in inner {
            let declarator_span = Self::span_from_pair(&declarator);
            let mut parts = declarator.into_inner();
            let id = Self::parse_binding_target(parts.next().unwrap())?;
            let init = parts.next().map(Self::parse_expression_from_pair).transpose()?;

            if kind == DeclarationKind::Const && init.is_none() {
                return Err(ParseError::missing_const_initializer(declarator_span));
            }

            declarations.push(VariableDeclarator {
                id,
                init,
                span: declarator_span,
            });
        }

        Ok(VariableDeclaration {
            kind,
            declarations,
            span,
        })
    }

    fn parse_if_statement(pair: pest::iterators::Pair<Rule>) -> ParseResult<IfStatement> {
        let mut inner = pair.into_inner();
        inner.next(); // if
        let test = Self::parse_expression_from_pair(inner.next().unwrap())?;
        let consequent = Self::parse_statement(inner.next().unwrap())?;

        let alternate = match inner.next() {
            Some(_else) => Some(Box::new(Self::parse_statement(inner.next().unwrap())?)),
            None => None,
        };

        Ok(IfStatement {
            test,
            consequent: Box::new(consequent),
            alternate,
        })
    }

    fn parse_for_statement(pair: pest::iterators::Pair<Rule>) -> ParseResult<ForStatement> {
        let mut init = None;
        let mut test = None;
        let mut update = None;
        let mut body = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::kw_for => {}
                Rule::for_init => {
                    let clause = inner.into_inner().next().unwrap();
                    init = Some(match clause.as_rule() {
                        Rule::variable_declaration => {
                            ForInit::Declaration(Self::parse_variable_declaration(clause)?)
                        }
                        _ => ForInit::Expression(Self::parse_expression_from_pair(clause)?),
                    });
                }
                Rule::for_test => {
                    let expression = inner.into_inner().next().unwrap();
                    test = Some(Self::parse_expression_from_pair(expression)?);
                }
                Rule::for_update => {
                    let expression = inner.into_inner().next().unwrap();
                    update = Some(Self::parse_expression_from_pair(expression)?);
                }
                _ => body = Some(Self::parse_statement(inner)?),
            }
        }

        Ok(ForStatement {
            init,
            test,
            update,
            body: Box::new(body.unwrap()),
        })
    }

    fn parse_for_each_statement(pair: pest::iterators::Pair<Rule>) -> ParseResult<StatementKind> {
        let mut inner = pair.into_inner();
        inner.next(); // for

        let left_pair = inner.next().unwrap().into_inner().next().unwrap();
        let left = match left_pair.as_rule() {
            Rule::for_declaration => {
                let mut parts = left_pair.into_inner();
                let kind = Self::parse_declaration_kind(parts.next().unwrap());
                let pattern = Self::parse_binding_target(parts.next().unwrap())?;
                ForEachTarget::Declaration { kind, pattern }
            }
            _ => {
                let target = Self::parse_left_hand_side(left_pair)?;
                ForEachTarget::Pattern(Self::expression_to_pattern(target)?)
            }
        };

        let is_of = inner.next().unwrap().as_rule() == Rule::kw_of;
        let right = Self::parse_expression_from_pair(inner.next().unwrap())?;
        let body = Box::new(Self::parse_statement(inner.next().unwrap())?);

        let statement = ForEachStatement { left, right, body };
        Ok(if is_of {
            StatementKind::ForOf(statement)
        } else {
            StatementKind::ForIn(statement)
        })
    }

    fn parse_try_statement(
        pair: pest::iterators::Pair<Rule>,
        span: Span,
    ) -> ParseResult<TryStatement> {
        let mut block = None;
        let mut handler = None;
        let mut finalizer = None;

        for inner in pair.into_inner() {
            match inner.as_rule() {
                Rule::block_statement => block = Some(Self::parse_block(inner)?),
                Rule::catch_clause => {
                    let clause_span = Self::span_from_pair(&inner);
                    let mut param = None;
                    let mut body = None;
                    for part in inner.into_inner() {
                        match part.as_rule() {
                            Rule::kw_catch => {}
                            Rule::block_statement => body = Some(Self::parse_block(part)?),
                            _ => param = Some(Self::parse_binding_target(part)?),
                        }
                    }
                    handler = Some(CatchClause {
                        param,
                        body: body.unwrap(),
                        span: clause_span,
                    });
                }
                Rule::finally_clause => {
                    let body = inner.into_inner().nth(1).unwrap();
                    finalizer = Some(Self::parse_block(body)?);
                }
                _ => {}
            }
        }

        if handler.is_none() && finalizer.is_none() {
            return Err(ParseError::missing_catch_or_finally(span));
        }

        Ok(TryStatement {
            block: block.unwrap(),
            handler,
            finalizer,
        })
    }

    fn parse_switch_statement(pair: pest::iterators::Pair<Rule>) -> ParseResult<SwitchStatement> {
        let mut inner = pair.into_inner();
        inner.next(); // switch
        let discriminant = Self::parse_expression_from_pair(inner.next().unwrap())?;

        let mut cases = Vec::new();
        for case_pair in inner {
            let span = Self::span_from_pair(&case_pair);
            let mut parts = case_pair.into_inner();
            let test = match parts.next().unwrap().as_rule() {
                Rule::kw_case => Some(Self::parse_expression_from_pair(parts.next().unwrap())?),
                _ => None,
            };
            let consequent = parts
                .map(Self::parse_statement)
                .collect::<ParseResult<Vec<_>>>()?;

            cases.push(SwitchCase {
                test,
                consequent,
                span,
            });
        }

        Ok(SwitchStatement {
            discriminant,
            cases,
        })
    }
}
