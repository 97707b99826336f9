//! Closures, calls and construction.

use crate::completion::Completion;
use crate::environment::{EnvId, EnvironmentKind};
use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use crate::patterns::BindingMode;
use crate::stack::ensure_sufficient_stack;
use crate::value::{Callable, Closure, FunctionObject, Object, Value};
use runjs_parser::{DeclarationKind, Function, FunctionBody, FunctionKind, Pattern, PatternKind};
use std::rc::Rc;

impl Interpreter {
    /// Close over `env`. `name` is used when the function has no name of
    /// its own (`const f = () => ...`).
    pub(crate) fn create_closure(
        &mut self,
        function: &Rc<Function>,
        env: EnvId,
        name: Option<&str>,
    ) -> Value {
        let name = function.name().or(name).unwrap_or_default();
        Value::function(FunctionObject::closure(
            name,
            Closure {
                function: Rc::clone(function),
                scope: self.environments.capture(env),
                realm: self.environments.realm(),
            },
        ))
    }

    /// Function expressions with a name can refer to themselves by it.
    pub(crate) fn create_function_expression(
        &mut self,
        function: &Rc<Function>,
        env: EnvId,
    ) -> Result<Value> {
        match (function.kind, function.name()) {
            (FunctionKind::Expression, Some(name)) => {
                let scope = self.environments.push(EnvironmentKind::Block, env);
                let closure = self.create_closure(function, scope, None);
                let declared = self.environments.declare_const(scope, name, closure.clone());
                self.environments.release(scope);
                declared.map(|_| closure)
            }
            _ => Ok(self.create_closure(function, env, None)),
        }
    }

    /// Call `callee` with `this` bound to `receiver`
    pub fn call(&mut self, callee: &Value, receiver: Value, args: Vec<Value>) -> Result<Value> {
        let Value::Function(function) = callee else {
            return Err(RuntimeError::type_error(format!(
                "{} is not a function",
                callee.inspect()
            )));
        };

        match &function.callable {
            Callable::Native(native) => (native.function)(self, receiver, args),
            Callable::Closure(closure) => self.call_closure(function, closure, receiver, args),
        }
    }

    fn call_closure(
        &mut self,
        function: &FunctionObject,
        closure: &Closure,
        receiver: Value,
        args: Vec<Value>,
    ) -> Result<Value> {
        if closure.realm != self.environments.realm() {
            return Err(RuntimeError::type_error(format!(
                "{} was created by a different interpreter",
                function_label(function)
            )));
        }
        if self.call_depth >= self.max_call_depth {
            return Err(RuntimeError::range_error("Maximum call stack size exceeded"));
        }

        tracing::trace!(
            function = %function_label(function),
            arguments = args.len(),
            depth = self.call_depth,
            "calling function"
        );

        let definition = Rc::clone(&closure.function);
        self.call_depth += 1;
        let result = ensure_sufficient_stack(|| {
            self.in_scope(EnvironmentKind::Function, closure.env(), |interpreter, env| {
                interpreter.invoke(&definition, env, receiver, args)
            })
        });
        self.call_depth -= 1;
        result
    }

    fn invoke(
        &mut self,
        function: &Function,
        env: EnvId,
        receiver: Value,
        args: Vec<Value>,
    ) -> Result<Value> {
        let arguments = (!function.is_arrow()).then(|| Value::array(args.clone()));
        if !function.is_arrow() {
            self.environments.declare_const(env, "this", receiver)?;
        }
        self.bind_parameters(&function.params, env, args)?;
        if let Some(arguments) = arguments {
            self.environments.declare_var(env, "arguments", arguments);
        }

        match &function.body {
            FunctionBody::Expression(expression) => self.evaluate_expression(expression, env),
            FunctionBody::Block(block) => match self.execute_statements(&block.body, env)? {
                Completion::Return(value) => Ok(value),
                Completion::Normal(_) | Completion::Break | Completion::Continue => {
                    Ok(Value::Undefined)
                }
            },
        }
    }

    /// Bind parameters left to right; defaults see the earlier parameters.
    /// Parameters are `var`s of the function record, so a function
    /// declared in the body can replace one.
    fn bind_parameters(&mut self, params: &[Pattern], env: EnvId, args: Vec<Value>) -> Result<()> {
        let mode = BindingMode::Declare(DeclarationKind::Var);
        let mut args = args.into_iter();

        for param in params {
            match &param.kind {
                PatternKind::Rest(target) => {
                    let rest: Vec<Value> = args.by_ref().collect();
                    self.bind_pattern(target, Value::array(rest), env, mode)?;
                }
                _ => {
                    let value = args.next().unwrap_or_default();
                    self.bind_pattern(param, value, env, mode)?;
                }
            }
        }
        Ok(())
    }

    /// `new callee(...args)`
    pub fn construct(&mut self, callee: &Value, args: Vec<Value>) -> Result<Value> {
        let constructor = match callee {
            Value::Function(function) if !function.is_arrow() => function,
            other => {
                return Err(RuntimeError::type_error(format!(
                    "{} is not a constructor",
                    other.inspect()
                )))
            }
        };

        let prototype = match self.function_prototype(constructor) {
            Value::Object(prototype) => Some(prototype),
            _ => None,
        };
        let instance = Value::object(Object::with_prototype(prototype));
        let result = self.call(callee, instance.clone(), args)?;

        Ok(match result {
            Value::Object(_) | Value::Array(_) | Value::Function(_) => result,
            _ => instance,
        })
    }
}

fn function_label(function: &FunctionObject) -> &str {
    if function.name.is_empty() {
        "(anonymous)"
    } else {
        &function.name
    }
}
