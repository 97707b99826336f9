//! Expression evaluation.

use crate::environment::EnvId;
use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use crate::patterns::BindingMode;
use crate::stack::ensure_sufficient_stack;
use crate::value::{check_string_length, format_number, Object, Value};
use runjs_parser::{
    Argument, ArrayElement, AssignmentOperation, AssignmentOperator, CallExpression, Expression,
    ExpressionKind, LogicalOperator, MemberExpression, MemberProperty, ObjectMember, Pattern,
    PatternKind, PropertyKey, Span, TemplateLiteral, UnaryOperator, UpdateOperation,
    UpdateOperator,
};

/// A place that can be read and written: a binding or a property
enum Reference {
    Binding { name: String, span: Span },
    Property { object: Value, key: String },
}

impl Interpreter {
    pub(crate) fn evaluate_expression(
        &mut self,
        expression: &Expression,
        env: EnvId,
    ) -> Result<Value> {
        ensure_sufficient_stack(|| self.evaluate_expression_kind(expression, env))
            .map_err(|error| error.at(expression.span))
    }

    /// Evaluate `expression`, giving anonymous functions `name`.
    ///
    /// Used wherever a function is bound to a name: declarators, default
    /// values, object properties and assignments.
    pub(crate) fn evaluate_named(
        &mut self,
        expression: &Expression,
        env: EnvId,
        name: Option<&str>,
    ) -> Result<Value> {
        match &expression.kind {
            ExpressionKind::Function(function) if function.name().is_none() => {
                Ok(self.create_closure(function, env, name))
            }
            _ => self.evaluate_expression(expression, env),
        }
    }

    fn evaluate_expression_kind(&mut self, expression: &Expression, env: EnvId) -> Result<Value> {
        match &expression.kind {
            ExpressionKind::Number(value) => Ok(Value::Number(*value)),
            ExpressionKind::String(value) => Ok(Value::string(value.as_str())),
            ExpressionKind::Boolean(value) => Ok(Value::Boolean(*value)),
            ExpressionKind::Null => Ok(Value::Null),
            ExpressionKind::Template(template) => self.evaluate_template(template, env),
            ExpressionKind::Identifier(identifier) => self.read_identifier(&identifier.name, env),
            ExpressionKind::This => Ok(self
                .environments
                .lookup(env, "this")
                .map(|(_, binding)| binding.value.clone())
                .unwrap_or_default()),
            ExpressionKind::Array(elements) => self.evaluate_array(elements, env),
            ExpressionKind::Object(members) => self.evaluate_object(members, env),
            ExpressionKind::Function(function) => self.create_function_expression(function, env),
            ExpressionKind::Unary(operation) => {
                self.evaluate_unary(operation.operator, &operation.argument, env)
            }
            ExpressionKind::Update(operation) => self.evaluate_update(operation, env),
            ExpressionKind::Binary(operation) => {
                let left = self.evaluate_expression(&operation.left, env)?;
                let right = self.evaluate_expression(&operation.right, env)?;
                self.binary_operation(operation.operator, left, right)
            }
            ExpressionKind::Logical(operation) => {
                let left = self.evaluate_expression(&operation.left, env)?;
                if short_circuits(operation.operator, &left) {
                    Ok(left)
                } else {
                    self.evaluate_expression(&operation.right, env)
                }
            }
            ExpressionKind::Assignment(operation) => self.evaluate_assignment(operation, env),
            ExpressionKind::Conditional(conditional) => {
                if self.evaluate_expression(&conditional.test, env)?.is_truthy() {
                    self.evaluate_expression(&conditional.consequent, env)
                } else {
                    self.evaluate_expression(&conditional.alternate, env)
                }
            }
            ExpressionKind::Call(call) => self.evaluate_call(call, env),
            ExpressionKind::New(call) => {
                let callee = self.evaluate_expression(&call.callee, env)?;
                let args = self.evaluate_arguments(&call.arguments, env)?;
                if !matches!(callee, Value::Function(_)) {
                    return Err(RuntimeError::type_error(format!(
                        "{} is not a constructor",
                        describe_callee(&call.callee)
                    )));
                }
                self.construct(&callee, args)
            }
            ExpressionKind::Member(member) => {
                let object = self.evaluate_expression(&member.object, env)?;
                let key = self.member_key(&member.property, env)?;
                self.get_property(&object, &key)
            }
            ExpressionKind::Sequence(expressions) => {
                let mut last = Value::Undefined;
                for expression in expressions {
                    last = self.evaluate_expression(expression, env)?;
                }
                Ok(last)
            }
        }
    }

    fn read_identifier(&self, name: &str, env: EnvId) -> Result<Value> {
        match self.environments.lookup(env, name) {
            Some((_, binding)) => Ok(binding.value.clone()),
            None if name == "undefined" => Ok(Value::Undefined),
            None => Err(RuntimeError::reference_error(name)),
        }
    }

    fn evaluate_template(&mut self, template: &TemplateLiteral, env: EnvId) -> Result<Value> {
        let mut text = String::new();
        for (index, quasi) in template.quasis.iter().enumerate() {
            text.push_str(quasi);
            if let Some(expression) = template.expressions.get(index) {
                let value = self.evaluate_expression(expression, env)?;
                let part = self.to_string(&value)?;
                check_string_length(text.len() + part.len())?;
                text.push_str(&part);
            }
        }
        Ok(Value::from(text))
    }

    fn evaluate_array(&mut self, elements: &[ArrayElement], env: EnvId) -> Result<Value> {
        let mut values = Vec::with_capacity(elements.len());
        for element in elements {
            match element {
                ArrayElement::Expression(expression) => {
                    values.push(self.evaluate_expression(expression, env)?)
                }
                ArrayElement::Spread(expression) => {
                    let spread = self.evaluate_expression(expression, env)?;
                    let items = self
                        .iterate_values(&spread)
                        .map_err(|error| error.at(expression.span))?;
                    values.extend(items);
                }
                ArrayElement::Hole => values.push(Value::Undefined),
            }
        }
        Ok(Value::array(values))
    }

    fn evaluate_object(&mut self, members: &[ObjectMember], env: EnvId) -> Result<Value> {
        let mut object = Object::new();
        for member in members {
            match member {
                ObjectMember::Property { key, value } => {
                    let key = self.property_name(key, env)?;
                    let value = self.evaluate_named(value, env, Some(&key))?;
                    object.insert(key, value);
                }
                ObjectMember::Spread(expression) => {
                    let source = self.evaluate_expression(expression, env)?;
                    for key in self.own_keys(&source) {
                        let value = source.get(&key).unwrap_or_default();
                        object.insert(key, value);
                    }
                }
            }
        }
        Ok(Value::object(object))
    }

    fn evaluate_unary(
        &mut self,
        operator: UnaryOperator,
        argument: &Expression,
        env: EnvId,
    ) -> Result<Value> {
        match (operator, &argument.kind) {
            (UnaryOperator::TypeOf, ExpressionKind::Identifier(identifier)) => {
                let value = self
                    .environments
                    .lookup(env, &identifier.name)
                    .map(|(_, binding)| binding.value.clone())
                    .unwrap_or_default();
                Ok(Value::from(value.type_of()))
            }
            (UnaryOperator::Delete, ExpressionKind::Member(member)) => {
                let object = self.evaluate_expression(&member.object, env)?;
                let key = self.member_key(&member.property, env)?;
                Ok(Value::Boolean(self.delete_property(&object, &key)?))
            }
            // Bindings cannot be deleted
            (UnaryOperator::Delete, ExpressionKind::Identifier(_)) => Ok(Value::Boolean(false)),
            _ => {
                let value = self.evaluate_expression(argument, env)?;
                self.unary_operation(operator, value)
            }
        }
    }

    fn evaluate_update(&mut self, operation: &UpdateOperation, env: EnvId) -> Result<Value> {
        let reference = self.resolve_expression(&operation.argument, env)?;
        let old = self.get_reference(&reference, env)?;
        let old = self.to_number(&old)?;
        let new = match operation.operator {
            UpdateOperator::Increment => old + 1.0,
            UpdateOperator::Decrement => old - 1.0,
        };
        self.put_reference(&reference, Value::Number(new), env)?;
        Ok(Value::Number(if operation.prefix { new } else { old }))
    }

    fn evaluate_assignment(
        &mut self,
        operation: &AssignmentOperation,
        env: EnvId,
    ) -> Result<Value> {
        let target = &operation.target;
        let name = match &target.kind {
            PatternKind::Identifier(identifier) => Some(identifier.name.as_str()),
            _ => None,
        };

        if operation.operator == AssignmentOperator::Assign {
            return match &target.kind {
                PatternKind::Identifier(_) | PatternKind::Member(_) => {
                    let reference = self.resolve_pattern(target, env)?;
                    let value = self.evaluate_named(&operation.value, env, name)?;
                    self.put_reference(&reference, value.clone(), env)?;
                    Ok(value)
                }
                PatternKind::Array(_) | PatternKind::Object(_) => {
                    let value = self.evaluate_expression(&operation.value, env)?;
                    self.bind_pattern(target, value.clone(), env, BindingMode::Assign)?;
                    Ok(value)
                }
                _ => Err(RuntimeError::unsupported_node(target.kind.node_name(), target.span)),
            };
        }

        let reference = self.resolve_pattern(target, env)?;
        let current = self.get_reference(&reference, env)?;

        if let Some(logical) = operation.operator.logical_operator() {
            if short_circuits(logical, &current) {
                return Ok(current);
            }
            let value = self.evaluate_named(&operation.value, env, name)?;
            self.put_reference(&reference, value.clone(), env)?;
            return Ok(value);
        }

        let Some(operator) = operation.operator.binary_operator() else {
            return Err(RuntimeError::unsupported_node(target.kind.node_name(), target.span));
        };
        let right = self.evaluate_expression(&operation.value, env)?;
        let value = self.binary_operation(operator, current, right)?;
        self.put_reference(&reference, value.clone(), env)?;
        Ok(value)
    }

    fn evaluate_call(&mut self, call: &CallExpression, env: EnvId) -> Result<Value> {
        let (callee, receiver) = match &call.callee.kind {
            ExpressionKind::Member(member) => {
                let object = self.evaluate_expression(&member.object, env)?;
                let key = self.member_key(&member.property, env)?;
                let callee = self
                    .get_property(&object, &key)
                    .map_err(|error| error.at(call.callee.span))?;
                (callee, object)
            }
            _ => (self.evaluate_expression(&call.callee, env)?, Value::Undefined),
        };

        let args = self.evaluate_arguments(&call.arguments, env)?;
        if !matches!(callee, Value::Function(_)) {
            return Err(RuntimeError::type_error(format!(
                "{} is not a function",
                describe_callee(&call.callee)
            )));
        }
        self.call(&callee, receiver, args)
    }

    fn evaluate_arguments(&mut self, arguments: &[Argument], env: EnvId) -> Result<Vec<Value>> {
        let mut values = Vec::with_capacity(arguments.len());
        for argument in arguments {
            match argument {
                Argument::Expression(expression) => {
                    values.push(self.evaluate_expression(expression, env)?)
                }
                Argument::Spread(expression) => {
                    let spread = self.evaluate_expression(expression, env)?;
                    let items = self
                        .iterate_values(&spread)
                        .map_err(|error| error.at(expression.span))?;
                    values.extend(items);
                }
            }
        }
        Ok(values)
    }

    /// The key named by `.name` or `[expression]`
    pub(crate) fn member_key(&mut self, property: &MemberProperty, env: EnvId) -> Result<String> {
        match property {
            MemberProperty::Static(identifier) => Ok(identifier.name.clone()),
            MemberProperty::Computed(expression) => {
                let key = self.evaluate_expression(expression, env)?;
                self.property_key(&key)
            }
        }
    }

    /// The key of an object literal or object pattern property
    pub(crate) fn property_name(&mut self, key: &PropertyKey, env: EnvId) -> Result<String> {
        match key {
            PropertyKey::Static(name) => Ok(name.clone()),
            PropertyKey::Number(number) => Ok(format_number(*number)),
            PropertyKey::Computed(expression) => {
                let key = self.evaluate_expression(expression, env)?;
                self.property_key(&key)
            }
        }
    }

    // References

    fn resolve_member(&mut self, member: &MemberExpression, env: EnvId) -> Result<Reference> {
        let object = self.evaluate_expression(&member.object, env)?;
        let key = self.member_key(&member.property, env)?;
        Ok(Reference::Property { object, key })
    }

    fn resolve_expression(&mut self, expression: &Expression, env: EnvId) -> Result<Reference> {
        match &expression.kind {
            ExpressionKind::Identifier(identifier) => Ok(Reference::Binding {
                name: identifier.name.clone(),
                span: identifier.span,
            }),
            ExpressionKind::Member(member) => self.resolve_member(member, env),
            other => Err(RuntimeError::unsupported_node(other.node_name(), expression.span)),
        }
    }

    fn resolve_pattern(&mut self, pattern: &Pattern, env: EnvId) -> Result<Reference> {
        match &pattern.kind {
            PatternKind::Identifier(identifier) => Ok(Reference::Binding {
                name: identifier.name.clone(),
                span: identifier.span,
            }),
            PatternKind::Member(member) => self.resolve_member(member, env),
            other => Err(RuntimeError::unsupported_node(other.node_name(), pattern.span)),
        }
    }

    fn get_reference(&mut self, reference: &Reference, env: EnvId) -> Result<Value> {
        match reference {
            Reference::Binding { name, span } => self
                .read_identifier(name, env)
                .map_err(|error| error.at(*span)),
            Reference::Property { object, key } => self.get_property(object, key),
        }
    }

    fn put_reference(&mut self, reference: &Reference, value: Value, env: EnvId) -> Result<()> {
        match reference {
            Reference::Binding { name, span } => self
                .environments
                .write(env, name, value)
                .map_err(|error| error.at(*span)),
            Reference::Property { object, key } => self.set_property(object, key, value),
        }
    }
}

fn short_circuits(operator: LogicalOperator, left: &Value) -> bool {
    match operator {
        LogicalOperator::And => !left.is_truthy(),
        LogicalOperator::Or => left.is_truthy(),
        LogicalOperator::NullishCoalescing => !left.is_nullish(),
    }
}

/// Source-like label for a callee in "is not a function" messages
fn describe_callee(callee: &Expression) -> String {
    match &callee.kind {
        ExpressionKind::Identifier(identifier) => identifier.name.clone(),
        ExpressionKind::This => "this".to_string(),
        ExpressionKind::Member(member) => {
            let object = describe_callee(&member.object);
            match &member.property {
                MemberProperty::Static(identifier) => format!("{object}.{}", identifier.name),
                MemberProperty::Computed(_) => format!("{object}[...]"),
            }
        }
        ExpressionKind::Call(call) => format!("{}(...)", describe_callee(&call.callee)),
        other => other.node_name().to_string(),
    }
}
