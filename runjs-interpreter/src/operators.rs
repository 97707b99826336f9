//! Operators and the conversions they rely on.
//!
//! Conversions that may run script code (`valueOf`, `toString`) live on the
//! interpreter; the pure numeric helpers are free functions.

use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use crate::value::{check_string_length, string_to_number, Value};
use runjs_parser::{BinaryOperator, UnaryOperator};

/// Conversion hint for [`Interpreter::to_primitive`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PreferredType {
    Default,
    Number,
    String,
}

impl Interpreter {
    /// Reduce objects and functions to a primitive by calling their
    /// `valueOf`/`toString`, falling back to the default string form.
    pub(crate) fn to_primitive(&mut self, value: Value, hint: PreferredType) -> Result<Value> {
        match value {
            Value::Object(_) | Value::Function(_) => {
                let order = match hint {
                    PreferredType::String => ["toString", "valueOf"],
                    PreferredType::Default | PreferredType::Number => ["valueOf", "toString"],
                };
                for name in order {
                    let method = self.get_property(&value, name)?;
                    if let Value::Function(_) = method {
                        let result = self.call(&method, value.clone(), Vec::new())?;
                        let is_object = matches!(
                            result,
                            Value::Object(_) | Value::Array(_) | Value::Function(_)
                        );
                        if !is_object {
                            return Ok(result);
                        }
                    }
                }
                Ok(Value::from(value.to_js_string()))
            }
            Value::Array(_) => Ok(Value::from(value.to_js_string())),
            primitive => Ok(primitive),
        }
    }

    pub(crate) fn to_string(&mut self, value: &Value) -> Result<String> {
        match value {
            Value::Object(_) | Value::Function(_) => {
                let primitive = self.to_primitive(value.clone(), PreferredType::String)?;
                Ok(primitive.to_js_string())
            }
            other => Ok(other.to_js_string()),
        }
    }

    pub(crate) fn to_number(&mut self, value: &Value) -> Result<f64> {
        match value {
            Value::Object(_) | Value::Function(_) => {
                let primitive = self.to_primitive(value.clone(), PreferredType::Number)?;
                Ok(primitive.to_number())
            }
            other => Ok(other.to_number()),
        }
    }

    pub(crate) fn unary_operation(
        &mut self,
        operator: UnaryOperator,
        value: Value,
    ) -> Result<Value> {
        Ok(match operator {
            UnaryOperator::Minus => Value::Number(-self.to_number(&value)?),
            UnaryOperator::Plus => Value::Number(self.to_number(&value)?),
            UnaryOperator::Not => Value::Boolean(!value.is_truthy()),
            UnaryOperator::BitwiseNot => {
                Value::Number(f64::from(!to_int32(self.to_number(&value)?)))
            }
            UnaryOperator::TypeOf => Value::from(value.type_of()),
            UnaryOperator::Void => Value::Undefined,
            UnaryOperator::Delete => Value::Boolean(true),
        })
    }

    pub(crate) fn binary_operation(
        &mut self,
        operator: BinaryOperator,
        left: Value,
        right: Value,
    ) -> Result<Value> {
        use BinaryOperator::*;

        let result = match operator {
            Add => {
                let left = self.to_primitive(left, PreferredType::Default)?;
                let right = self.to_primitive(right, PreferredType::Default)?;
                if matches!(left, Value::String(_)) || matches!(right, Value::String(_)) {
                    let (left, right) = (left.to_js_string(), right.to_js_string());
                    check_string_length(left.len() + right.len())?;
                    Value::from(left + &right)
                } else {
                    Value::Number(left.to_number() + right.to_number())
                }
            }
            Subtract | Multiply | Divide | Modulo | Exponent => {
                let a = self.to_number(&left)?;
                let b = self.to_number(&right)?;
                Value::Number(match operator {
                    Subtract => a - b,
                    Multiply => a * b,
                    Divide => a / b,
                    Modulo => a % b,
                    _ => power(a, b),
                })
            }
            BitwiseAnd | BitwiseOr | BitwiseXor | ShiftLeft | ShiftRight | UnsignedShiftRight => {
                let a = self.to_number(&left)?;
                let b = self.to_number(&right)?;
                let shift = to_uint32(b) & 31;
                Value::Number(match operator {
                    BitwiseAnd => f64::from(to_int32(a) & to_int32(b)),
                    BitwiseOr => f64::from(to_int32(a) | to_int32(b)),
                    BitwiseXor => f64::from(to_int32(a) ^ to_int32(b)),
                    ShiftLeft => f64::from(to_int32(a).wrapping_shl(shift)),
                    ShiftRight => f64::from(to_int32(a) >> shift),
                    _ => f64::from(to_uint32(a) >> shift),
                })
            }
            Equal => Value::Boolean(self.loose_equals(&left, &right)?),
            NotEqual => Value::Boolean(!self.loose_equals(&left, &right)?),
            StrictEqual => Value::Boolean(left.strict_equals(&right)),
            StrictNotEqual => Value::Boolean(!left.strict_equals(&right)),
            Less => Value::Boolean(self.less_than(left, right)? == Some(true)),
            Greater => Value::Boolean(self.less_than(right, left)? == Some(true)),
            LessEqual => Value::Boolean(self.less_than(right, left)? == Some(false)),
            GreaterEqual => Value::Boolean(self.less_than(left, right)? == Some(false)),
            In => {
                let key = self.property_key(&left)?;
                Value::Boolean(self.has_property(&right, &key)?)
            }
            InstanceOf => Value::Boolean(self.instance_of(&left, &right)?),
        };
        Ok(result)
    }

    /// Abstract relational comparison; `None` when either side is `NaN`.
    fn less_than(&mut self, left: Value, right: Value) -> Result<Option<bool>> {
        let left = self.to_primitive(left, PreferredType::Number)?;
        let right = self.to_primitive(right, PreferredType::Number)?;

        if let (Value::String(a), Value::String(b)) = (&left, &right) {
            return Ok(Some(a.encode_utf16().lt(b.encode_utf16())));
        }
        let (a, b) = (left.to_number(), right.to_number());
        if a.is_nan() || b.is_nan() {
            return Ok(None);
        }
        Ok(Some(a < b))
    }

    pub(crate) fn loose_equals(&mut self, left: &Value, right: &Value) -> Result<bool> {
        match (left, right) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => Ok(true),
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => Ok(false),
            (Value::Number(a), Value::String(b)) => Ok(*a == string_to_number(b)),
            (Value::String(a), Value::Number(b)) => Ok(string_to_number(a) == *b),
            (Value::Boolean(_), _) => self.loose_equals(&Value::Number(left.to_number()), right),
            (_, Value::Boolean(_)) => self.loose_equals(left, &Value::Number(right.to_number())),
            (
                Value::Object(_) | Value::Array(_) | Value::Function(_),
                Value::Number(_) | Value::String(_),
            ) => {
                let primitive = self.to_primitive(left.clone(), PreferredType::Default)?;
                self.loose_equals(&primitive, right)
            }
            (
                Value::Number(_) | Value::String(_),
                Value::Object(_) | Value::Array(_) | Value::Function(_),
            ) => {
                let primitive = self.to_primitive(right.clone(), PreferredType::Default)?;
                self.loose_equals(left, &primitive)
            }
            _ => Ok(left.strict_equals(right)),
        }
    }

    pub(crate) fn instance_of(&mut self, value: &Value, constructor: &Value) -> Result<bool> {
        if !matches!(constructor, Value::Function(_)) {
            return Err(RuntimeError::type_error(
                "Right-hand side of 'instanceof' is not callable",
            ));
        }
        let Value::Object(prototype) = self.get_property(constructor, "prototype")? else {
            return Ok(false);
        };
        let Value::Object(object) = value else {
            return Ok(false);
        };

        let mut current = object.borrow().prototype.clone();
        while let Some(candidate) = current {
            if std::rc::Rc::ptr_eq(&candidate, &prototype) {
                return Ok(true);
            }
            current = candidate.borrow().prototype.clone();
        }
        Ok(false)
    }
}

/// `**` with the JavaScript special cases `powf` does not share
pub fn power(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// JavaScript `ToInt32`
pub fn to_int32(value: f64) -> i32 {
    to_uint32(value) as i32
}

/// JavaScript `ToUint32`
pub fn to_uint32(value: f64) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.trunc().rem_euclid(4_294_967_296.0) as u32
}
