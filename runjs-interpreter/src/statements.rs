//! Statement execution.
//!
//! Every statement reports a [`Completion`]. Loops consume `Break` and
//! `Continue`, `switch` consumes `Break`, and `Return` travels up to the
//! function-call boundary.

use crate::completion::Completion;
use crate::environment::{EnvId, EnvironmentKind};
use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use crate::patterns::BindingMode;
use crate::stack::ensure_sufficient_stack;
use crate::value::{ArrayRef, Value};
use runjs_parser::{
    BlockStatement, CatchClause, DeclarationKind, ForEachStatement, ForEachTarget, ForInit,
    ForStatement, PatternKind, Statement, StatementKind, SwitchStatement, TryStatement,
    VariableDeclaration, WhileStatement,
};

/// What a loop does once its body has completed
enum LoopStep {
    Next,
    Exit,
    Propagate(Completion),
}

impl From<Completion> for LoopStep {
    fn from(completion: Completion) -> Self {
        match completion {
            Completion::Normal(_) | Completion::Continue => LoopStep::Next,
            Completion::Break => LoopStep::Exit,
            Completion::Return(value) => LoopStep::Propagate(Completion::Return(value)),
        }
    }
}

/// Values visited by `for-in`/`for-of`. Arrays are read live, so elements
/// pushed by the body are visited too.
enum LoopItems {
    Live { elements: ArrayRef, index: usize },
    Fixed(std::vec::IntoIter<Value>),
}

impl Iterator for LoopItems {
    type Item = Value;

    fn next(&mut self) -> Option<Value> {
        match self {
            LoopItems::Live { elements, index } => {
                let item = elements.borrow().get(*index).cloned();
                *index += 1;
                item
            }
            LoopItems::Fixed(items) => items.next(),
        }
    }
}

impl Interpreter {
    /// Hoist the function declarations of `statements`, then run them in order.
    pub(crate) fn execute_statements(
        &mut self,
        statements: &[Statement],
        env: EnvId,
    ) -> Result<Completion> {
        self.hoist_functions(statements, env)?;
        self.execute_sequence(statements, env)
    }

    fn hoist_functions(&mut self, statements: &[Statement], env: EnvId) -> Result<()> {
        for statement in statements {
            if let StatementKind::FunctionDeclaration(function) = &statement.kind {
                if let Some(name) = function.name() {
                    let closure = self.create_closure(function, env, None);
                    self.environments
                        .declare_function(env, name, closure)
                        .map_err(|error| error.at(statement.span))?;
                }
            }
        }
        Ok(())
    }

    fn execute_sequence(&mut self, statements: &[Statement], env: EnvId) -> Result<Completion> {
        let mut last = Value::Undefined;
        for statement in statements {
            match self.execute_statement(statement, env)? {
                Completion::Normal(value) => {
                    if !matches!(
                        statement.kind,
                        StatementKind::VariableDeclaration(_)
                            | StatementKind::FunctionDeclaration(_)
                            | StatementKind::Empty
                    ) {
                        last = value;
                    }
                }
                other => return Ok(other),
            }
        }
        Ok(Completion::Normal(last))
    }

    pub(crate) fn execute_statement(
        &mut self,
        statement: &Statement,
        env: EnvId,
    ) -> Result<Completion> {
        ensure_sufficient_stack(|| self.execute_statement_kind(statement, env))
            .map_err(|error| error.at(statement.span))
    }

    fn execute_statement_kind(&mut self, statement: &Statement, env: EnvId) -> Result<Completion> {
        match &statement.kind {
            StatementKind::Expression(expression) => {
                Ok(Completion::Normal(self.evaluate_expression(expression, env)?))
            }
            StatementKind::VariableDeclaration(declaration) => {
                self.execute_declaration(declaration, env)?;
                Ok(Completion::empty())
            }
            // Bound when the enclosing statement list was entered
            StatementKind::FunctionDeclaration(_) => Ok(Completion::empty()),
            StatementKind::Block(block) => self.execute_block(block, env),
            StatementKind::Empty => Ok(Completion::empty()),
            StatementKind::If(statement) => {
                if self.evaluate_expression(&statement.test, env)?.is_truthy() {
                    self.execute_statement(&statement.consequent, env)
                } else if let Some(alternate) = &statement.alternate {
                    self.execute_statement(alternate, env)
                } else {
                    Ok(Completion::empty())
                }
            }
            StatementKind::For(statement) => self.execute_for(statement, env),
            StatementKind::ForIn(statement) => self.execute_for_each(statement, env, false),
            StatementKind::ForOf(statement) => self.execute_for_each(statement, env, true),
            StatementKind::While(statement) => self.execute_while(statement, env),
            StatementKind::DoWhile(statement) => self.execute_do_while(statement, env),
            StatementKind::Break => Ok(Completion::Break),
            StatementKind::Continue => Ok(Completion::Continue),
            StatementKind::Return(argument) => {
                let value = match argument {
                    Some(expression) => self.evaluate_expression(expression, env)?,
                    None => Value::Undefined,
                };
                Ok(Completion::Return(value))
            }
            StatementKind::Throw(expression) => {
                let value = self.evaluate_expression(expression, env)?;
                Err(RuntimeError::thrown(value).at(expression.span))
            }
            StatementKind::Try(statement) => self.execute_try(statement, env),
            StatementKind::Switch(statement) => self.execute_switch(statement, env),
        }
    }

    pub(crate) fn execute_block(
        &mut self,
        block: &BlockStatement,
        env: EnvId,
    ) -> Result<Completion> {
        self.in_scope(EnvironmentKind::Block, env, |interpreter, block_env| {
            interpreter.execute_statements(&block.body, block_env)
        })
    }

    pub(crate) fn execute_declaration(
        &mut self,
        declaration: &VariableDeclaration,
        env: EnvId,
    ) -> Result<()> {
        for declarator in &declaration.declarations {
            match (&declarator.init, &declarator.id.kind) {
                // `var x;` never resets an existing binding
                (None, PatternKind::Identifier(identifier)) => self
                    .environments
                    .declare(declaration.kind, env, &identifier.name, Value::Undefined)
                    .map_err(|error| error.at(identifier.span))?,
                (init, kind) => {
                    let name = match kind {
                        PatternKind::Identifier(identifier) => Some(identifier.name.as_str()),
                        _ => None,
                    };
                    let value = match init {
                        Some(expression) => self.evaluate_named(expression, env, name)?,
                        None => Value::Undefined,
                    };
                    let mode = BindingMode::Declare(declaration.kind);
                    self.bind_pattern(&declarator.id, value, env, mode)?;
                }
            }
        }
        Ok(())
    }

    fn execute_for(&mut self, statement: &ForStatement, env: EnvId) -> Result<Completion> {
        self.in_scope(EnvironmentKind::Block, env, |interpreter, loop_env| {
            match &statement.init {
                Some(ForInit::Declaration(declaration)) => {
                    interpreter.execute_declaration(declaration, loop_env)?
                }
                Some(ForInit::Expression(expression)) => {
                    interpreter.evaluate_expression(expression, loop_env)?;
                }
                None => {}
            }

            loop {
                if let Some(test) = &statement.test {
                    if !interpreter.evaluate_expression(test, loop_env)?.is_truthy() {
                        break;
                    }
                }
                match LoopStep::from(interpreter.execute_statement(&statement.body, loop_env)?) {
                    LoopStep::Next => {}
                    LoopStep::Exit => break,
                    LoopStep::Propagate(completion) => return Ok(completion),
                }
                if let Some(update) = &statement.update {
                    interpreter.evaluate_expression(update, loop_env)?;
                }
            }
            Ok(Completion::empty())
        })
    }

    fn execute_while(&mut self, statement: &WhileStatement, env: EnvId) -> Result<Completion> {
        while self.evaluate_expression(&statement.test, env)?.is_truthy() {
            match LoopStep::from(self.execute_statement(&statement.body, env)?) {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Propagate(completion) => return Ok(completion),
            }
        }
        Ok(Completion::empty())
    }

    fn execute_do_while(&mut self, statement: &WhileStatement, env: EnvId) -> Result<Completion> {
        loop {
            match LoopStep::from(self.execute_statement(&statement.body, env)?) {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Propagate(completion) => return Ok(completion),
            }
            if !self.evaluate_expression(&statement.test, env)?.is_truthy() {
                break;
            }
        }
        Ok(Completion::empty())
    }

    /// `for-in` (keys) and `for-of` (elements), one fresh record per iteration
    fn execute_for_each(
        &mut self,
        statement: &ForEachStatement,
        env: EnvId,
        of: bool,
    ) -> Result<Completion> {
        let subject = self.evaluate_expression(&statement.right, env)?;

        let items = if of {
            match &subject {
                Value::Array(elements) => LoopItems::Live {
                    elements: elements.clone(),
                    index: 0,
                },
                other => LoopItems::Fixed(
                    self.iterate_values(other)
                        .map_err(|error| error.at(statement.right.span))?
                        .into_iter(),
                ),
            }
        } else {
            let keys: Vec<Value> = self
                .enumerable_keys(&subject)
                .into_iter()
                .map(Value::from)
                .collect();
            LoopItems::Fixed(keys.into_iter())
        };

        for item in items {
            let completion = self.in_scope(EnvironmentKind::Block, env, |interpreter, scope| {
                let (pattern, mode) = match &statement.left {
                    ForEachTarget::Declaration { kind, pattern } => {
                        (pattern, BindingMode::Declare(*kind))
                    }
                    ForEachTarget::Pattern(pattern) => (pattern, BindingMode::Assign),
                };
                interpreter.bind_pattern(pattern, item, scope, mode)?;
                interpreter.execute_statement(&statement.body, scope)
            })?;

            match LoopStep::from(completion) {
                LoopStep::Next => {}
                LoopStep::Exit => break,
                LoopStep::Propagate(completion) => return Ok(completion),
            }
        }
        Ok(Completion::empty())
    }

    fn execute_switch(&mut self, statement: &SwitchStatement, env: EnvId) -> Result<Completion> {
        let discriminant = self.evaluate_expression(&statement.discriminant, env)?;

        self.in_scope(EnvironmentKind::Block, env, |interpreter, switch_env| {
            for case in &statement.cases {
                interpreter.hoist_functions(&case.consequent, switch_env)?;
            }

            let mut start = None;
            for (index, case) in statement.cases.iter().enumerate() {
                if let Some(test) = &case.test {
                    if interpreter
                        .evaluate_expression(test, switch_env)?
                        .strict_equals(&discriminant)
                    {
                        start = Some(index);
                        break;
                    }
                }
            }
            let start =
                start.or_else(|| statement.cases.iter().position(|case| case.test.is_none()));
            let Some(start) = start else {
                return Ok(Completion::empty());
            };

            for case in &statement.cases[start..] {
                match interpreter.execute_sequence(&case.consequent, switch_env)? {
                    Completion::Normal(_) => {}
                    Completion::Break => break,
                    other => return Ok(other),
                }
            }
            Ok(Completion::empty())
        })
    }

    fn execute_try(&mut self, statement: &TryStatement, env: EnvId) -> Result<Completion> {
        let outcome = match (self.execute_block(&statement.block, env), &statement.handler) {
            (Err(error), Some(handler)) if error.is_catchable() => {
                self.execute_catch(handler, error, env)
            }
            (outcome, _) => outcome,
        };

        let Some(finalizer) = &statement.finalizer else {
            return outcome;
        };
        match self.execute_block(finalizer, env)? {
            Completion::Normal(_) => outcome,
            overriding => Ok(overriding),
        }
    }

    fn execute_catch(
        &mut self,
        handler: &CatchClause,
        error: RuntimeError,
        env: EnvId,
    ) -> Result<Completion> {
        tracing::debug!(error = %error, "caught runtime error");
        let value = self.error_to_value(error);

        self.in_scope(EnvironmentKind::Block, env, |interpreter, catch_env| {
            if let Some(param) = &handler.param {
                interpreter.bind_pattern(
                    param,
                    value,
                    catch_env,
                    BindingMode::Declare(DeclarationKind::Let),
                )?;
            }
            interpreter.execute_statements(&handler.body.body, catch_env)
        })
    }
}
