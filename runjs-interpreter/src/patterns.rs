//! Destructuring.
//!
//! One routine binds every pattern form. Declarations pass
//! [`BindingMode::Declare`] with the declaration kind in effect; assignments
//! and `for-in`/`for-of` over existing targets pass [`BindingMode::Assign`].

use crate::environment::EnvId;
use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use crate::value::Value;
use runjs_parser::{DeclarationKind, Pattern, PatternKind};

/// How a pattern's identifiers receive their values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingMode {
    Declare(DeclarationKind),
    Assign,
}

impl Interpreter {
    pub(crate) fn bind_pattern(
        &mut self,
        pattern: &Pattern,
        value: Value,
        env: EnvId,
        mode: BindingMode,
    ) -> Result<()> {
        match &pattern.kind {
            PatternKind::Identifier(identifier) => self
                .bind_name(&identifier.name, value, env, mode)
                .map_err(|error| error.at(identifier.span)),

            PatternKind::Member(member) => match mode {
                BindingMode::Assign => {
                    let object = self.evaluate_expression(&member.object, env)?;
                    let key = self.member_key(&member.property, env)?;
                    self.set_property(&object, &key, value)
                        .map_err(|error| error.at(pattern.span))
                }
                BindingMode::Declare(_) => Err(RuntimeError::unsupported_node(
                    pattern.kind.node_name(),
                    pattern.span,
                )),
            },

            PatternKind::Assignment(assignment) => {
                let value = match value {
                    Value::Undefined => {
                        let name = match &assignment.target.kind {
                            PatternKind::Identifier(identifier) => Some(identifier.name.as_str()),
                            _ => None,
                        };
                        self.evaluate_named(&assignment.default, env, name)?
                    }
                    other => other,
                };
                self.bind_pattern(&assignment.target, value, env, mode)
            }

            PatternKind::Array(array) => {
                let items = self
                    .iterate_values(&value)
                    .map_err(|error| error.at(pattern.span))?;

                for (index, element) in array.elements.iter().enumerate() {
                    let Some(element) = element else {
                        continue;
                    };
                    match &element.kind {
                        PatternKind::Rest(target) => {
                            let rest =
                                items.get(index..).map(<[Value]>::to_vec).unwrap_or_default();
                            self.bind_pattern(target, Value::array(rest), env, mode)?;
                        }
                        _ => {
                            let item = items.get(index).cloned().unwrap_or_default();
                            self.bind_pattern(element, item, env, mode)?;
                        }
                    }
                }
                Ok(())
            }

            PatternKind::Object(object) => {
                if value.is_nullish() {
                    return Err(RuntimeError::type_error_with_span(
                        format!("Cannot destructure '{value}' as it is {value}."),
                        pattern.span,
                    ));
                }

                let mut used = Vec::with_capacity(object.properties.len());
                for property in &object.properties {
                    let key = self.property_name(&property.key, env)?;
                    let property_value = self.get_property(&value, &key)?;
                    self.bind_pattern(&property.value, property_value, env, mode)?;
                    used.push(key);
                }

                if let Some(rest) = &object.rest {
                    let remaining: Vec<(String, Value)> = self
                        .own_keys(&value)
                        .into_iter()
                        .filter(|key| !used.contains(key))
                        .map(|key| {
                            let item = value.get(&key).unwrap_or_default();
                            (key, item)
                        })
                        .collect();
                    self.bind_pattern(rest, Value::object_from(remaining), env, mode)?;
                }
                Ok(())
            }

            PatternKind::Rest(target) => self.bind_pattern(target, value, env, mode),
        }
    }

    fn bind_name(&mut self, name: &str, value: Value, env: EnvId, mode: BindingMode) -> Result<()> {
        match mode {
            BindingMode::Assign => self.environments.write(env, name, value),
            // A repeated `var` with a value assigns to the existing binding
            BindingMode::Declare(DeclarationKind::Var) => {
                if !self.environments.declare_var(env, name, value.clone()) {
                    self.environments.write(env, name, value)?;
                }
                Ok(())
            }
            BindingMode::Declare(kind) => self.environments.declare(kind, env, name, value),
        }
    }

    /// Elements produced by spreading or array-destructuring `value`
    pub(crate) fn iterate_values(&self, value: &Value) -> Result<Vec<Value>> {
        match value {
            Value::Array(elements) => Ok(elements.borrow().clone()),
            Value::String(text) => Ok(text.chars().map(|c| Value::from(c.to_string())).collect()),
            other => Err(RuntimeError::type_error(format!(
                "{} is not iterable",
                other.inspect()
            ))),
        }
    }
}
