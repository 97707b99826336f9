//! The tree-walking interpreter.
//!
//! [`Interpreter`] owns the environment arena and the primitive method
//! tables. Statement execution lives in `statements.rs`, expression
//! evaluation in `expressions.rs`, calls in `functions.rs` and destructuring
//! in `patterns.rs`; this module holds the shared pieces: scoping, property
//! access and conversion of runtime errors into script values.

use crate::builtins::Intrinsics;
use crate::completion::Completion;
use crate::environment::{EnvId, EnvironmentKind, Environments};
use crate::error::{Result, RuntimeError};
use crate::value::{
    array_index, check_array_length, format_number, FunctionRef, Object, ObjectRef, Value,
};
use runjs_parser::Program;

/// Default bound on nested script calls
pub const DEFAULT_MAX_CALL_DEPTH: usize = 1000;

pub struct Interpreter {
    pub(crate) environments: Environments,
    pub(crate) intrinsics: Intrinsics,
    pub(crate) call_depth: usize,
    pub(crate) max_call_depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::with_max_call_depth(DEFAULT_MAX_CALL_DEPTH)
    }

    pub fn with_max_call_depth(max_call_depth: usize) -> Self {
        Self {
            environments: Environments::new_root(),
            intrinsics: Intrinsics::new(),
            call_depth: 0,
            max_call_depth,
        }
    }

    pub fn environments(&self) -> &Environments {
        &self.environments
    }

    pub fn environments_mut(&mut self) -> &mut Environments {
        &mut self.environments
    }

    pub fn root(&self) -> EnvId {
        self.environments.root()
    }

    /// Execute a program in the root record and return its completion value
    pub fn execute_program(&mut self, program: &Program) -> Result<Value> {
        let root = self.root();
        let completion = self.execute_statements(&program.body, root)?;
        Ok(match completion {
            Completion::Normal(value) | Completion::Return(value) => value,
            Completion::Break | Completion::Continue => Value::Undefined,
        })
    }

    /// Run `f` in a fresh child record that is released afterwards, whether
    /// `f` succeeds or not.
    pub(crate) fn in_scope<T>(
        &mut self,
        kind: EnvironmentKind,
        parent: EnvId,
        f: impl FnOnce(&mut Self, EnvId) -> Result<T>,
    ) -> Result<T> {
        let env = self.environments.push(kind, parent);
        let result = f(self, env);
        self.environments.release(env);
        result
    }

    // Error objects

    /// Build an error object whose prototype is `<name>.prototype` when a
    /// global constructor of that name is bound.
    pub fn make_error(&self, name: &str, message: &str) -> Value {
        let prototype = self.global_prototype(name);
        let mut object = Object::with_prototype(prototype.clone());
        if prototype.is_none() {
            object.insert("name", Value::from(name));
        }
        object.insert("message", Value::from(message));
        Value::object(object)
    }

    fn global_prototype(&self, constructor: &str) -> Option<ObjectRef> {
        match self.environments.read(self.root(), constructor).ok()? {
            Value::Function(function) => match function.get_own("prototype")? {
                Value::Object(prototype) => Some(prototype),
                _ => None,
            },
            _ => None,
        }
    }

    /// The value a `catch` clause binds for `error`
    pub(crate) fn error_to_value(&self, error: RuntimeError) -> Value {
        match error {
            RuntimeError::Thrown { value, .. } => value,
            other => self.make_error(other.kind().name(), &other.message()),
        }
    }

    // Property access

    pub fn get_property(&mut self, object: &Value, key: &str) -> Result<Value> {
        let found = match object {
            Value::Undefined | Value::Null => {
                return Err(RuntimeError::type_error(format!(
                    "Cannot read properties of {} (reading '{}')",
                    object.to_js_string(),
                    key
                )));
            }
            Value::Function(function) if key == "prototype" => {
                return Ok(self.function_prototype(function));
            }
            Value::Object(_) | Value::Array(_) | Value::String(_) | Value::Function(_) => {
                object.get(key)
            }
            Value::Number(_) | Value::Boolean(_) => None,
        };

        Ok(found
            .or_else(|| self.intrinsics.lookup(object, key))
            .unwrap_or_default())
    }

    /// `prototype` of a constructor, created on first access for script
    /// functions.
    pub(crate) fn function_prototype(&self, function: &FunctionRef) -> Value {
        if let Some(prototype) = function.get_own("prototype") {
            return prototype;
        }
        if function.is_arrow() || !matches!(function.callable, crate::value::Callable::Closure(_)) {
            return Value::Undefined;
        }
        let prototype = Value::object(Object::new());
        function.set_own("prototype", prototype.clone());
        prototype
    }

    pub fn set_property(&mut self, object: &Value, key: &str, value: Value) -> Result<()> {
        match object {
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(format!(
                "Cannot set properties of {} (setting '{}')",
                object.to_js_string(),
                key
            ))),
            Value::Object(target) => {
                target.borrow_mut().insert(key, value);
                Ok(())
            }
            Value::Array(elements) => {
                if key == "length" {
                    let length = value.to_number();
                    if length < 0.0 || length.fract() != 0.0 || length > f64::from(u32::MAX) {
                        return Err(RuntimeError::range_error("Invalid array length"));
                    }
                    check_array_length(length as usize)?;
                    elements.borrow_mut().resize(length as usize, Value::Undefined);
                } else if let Some(index) = array_index(key) {
                    let mut elements = elements.borrow_mut();
                    if index >= elements.len() {
                        check_array_length(index + 1)?;
                        elements.resize(index + 1, Value::Undefined);
                    }
                    elements[index] = value;
                }
                Ok(())
            }
            Value::Function(function) => {
                function.set_own(key, value);
                Ok(())
            }
            Value::Boolean(_) | Value::Number(_) | Value::String(_) => Ok(()),
        }
    }

    pub(crate) fn delete_property(&mut self, object: &Value, key: &str) -> Result<bool> {
        match object {
            Value::Undefined | Value::Null => Err(RuntimeError::type_error(format!(
                "Cannot convert undefined or null to object (deleting '{key}')"
            ))),
            Value::Object(target) => {
                target.borrow_mut().properties.shift_remove(key);
                Ok(true)
            }
            Value::Array(elements) => {
                if let Some(index) = array_index(key) {
                    if let Some(slot) = elements.borrow_mut().get_mut(index) {
                        *slot = Value::Undefined;
                    }
                }
                Ok(key != "length")
            }
            Value::Function(function) => {
                function.properties.borrow_mut().shift_remove(key);
                Ok(true)
            }
            _ => Ok(true),
        }
    }

    /// The `in` operator
    pub(crate) fn has_property(&self, object: &Value, key: &str) -> Result<bool> {
        match object {
            Value::Object(target) => Ok(target.borrow().has_property(key)),
            Value::Array(elements) => Ok(key == "length"
                || array_index(key).is_some_and(|index| index < elements.borrow().len())),
            Value::Function(function) => Ok(function.get_own(key).is_some()
                || matches!(key, "name" | "length" | "prototype")),
            other => Err(RuntimeError::type_error(format!(
                "Cannot use 'in' operator to search for '{}' in {}",
                key,
                other.to_js_string()
            ))),
        }
    }

    /// Own enumerable keys, in insertion order
    pub(crate) fn own_keys(&self, value: &Value) -> Vec<String> {
        match value {
            Value::Object(object) => object.borrow().properties.keys().cloned().collect(),
            Value::Array(elements) => (0..elements.borrow().len()).map(|i| i.to_string()).collect(),
            Value::String(text) => (0..text.chars().count()).map(|i| i.to_string()).collect(),
            Value::Function(function) => function.properties.borrow().keys().cloned().collect(),
            _ => Vec::new(),
        }
    }

    /// Keys visited by `for-in`: own keys, then inherited ones not shadowed
    pub(crate) fn enumerable_keys(&self, value: &Value) -> Vec<String> {
        let mut keys = self.own_keys(value);
        if let Value::Object(object) = value {
            let mut prototype = object.borrow().prototype.clone();
            while let Some(current) = prototype {
                let current = current.borrow();
                for key in current.properties.keys() {
                    if !keys.contains(key) {
                        keys.push(key.clone());
                    }
                }
                prototype = current.prototype.clone();
            }
        }
        keys
    }

    /// Convert a computed key to the string used for lookup
    pub(crate) fn property_key(&mut self, key: &Value) -> Result<String> {
        match key {
            Value::String(text) => Ok(text.to_string()),
            Value::Number(number) => Ok(format_number(*number)),
            other => self.to_string(other),
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}
