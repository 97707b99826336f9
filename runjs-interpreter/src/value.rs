//! Script values.
//!
//! Primitives are stored inline. Arrays, objects and functions are shared
//! `Rc` handles compared by identity, so a script and its host observe the
//! same mutations.

use crate::environment::{EnvId, RealmId, ScopeRef};
use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use indexmap::IndexMap;
use runjs_parser::ast;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub type ArrayRef = Rc<RefCell<Vec<Value>>>;
pub type ObjectRef = Rc<RefCell<Object>>;
pub type FunctionRef = Rc<FunctionObject>;

/// Signature of host callables: interpreter, receiver, arguments.
pub type NativeFn = dyn Fn(&mut Interpreter, Value, Vec<Value>) -> Result<Value>;

/// Runtime values
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Boolean(bool),
    Number(f64),
    String(Rc<str>),
    Array(ArrayRef),
    Object(ObjectRef),
    Function(FunctionRef),
}

/// A plain object: ordered own properties plus an optional prototype
#[derive(Default)]
pub struct Object {
    pub properties: IndexMap<String, Value>,
    pub prototype: Option<ObjectRef>,
}

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prototype(prototype: Option<ObjectRef>) -> Self {
        Self {
            properties: IndexMap::new(),
            prototype,
        }
    }

    /// Own property, then the prototype chain
    pub fn lookup(&self, key: &str) -> Option<Value> {
        match self.properties.get(key) {
            Some(value) => Some(value.clone()),
            None => self
                .prototype
                .as_ref()
                .and_then(|prototype| prototype.borrow().lookup(key)),
        }
    }

    pub fn has_property(&self, key: &str) -> bool {
        self.properties.contains_key(key)
            || self
                .prototype
                .as_ref()
                .is_some_and(|prototype| prototype.borrow().has_property(key))
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.properties.insert(key.into(), value);
    }
}

/// A callable value and its own property table
pub struct FunctionObject {
    pub name: String,
    pub callable: Callable,
    pub properties: RefCell<IndexMap<String, Value>>,
}

pub enum Callable {
    Closure(Closure),
    Native(NativeFunction),
}

/// A script function paired with the environment it was defined in
pub struct Closure {
    pub function: Rc<ast::Function>,
    pub scope: ScopeRef,
    pub realm: RealmId,
}

impl Closure {
    /// The record the function was created in
    pub fn env(&self) -> EnvId {
        self.scope.env()
    }
}

pub struct NativeFunction {
    pub arity: usize,
    pub function: Rc<NativeFn>,
}

impl FunctionObject {
    pub fn closure(name: impl Into<String>, closure: Closure) -> Self {
        Self {
            name: name.into(),
            callable: Callable::Closure(closure),
            properties: RefCell::new(IndexMap::new()),
        }
    }

    pub fn native(
        name: impl Into<String>,
        arity: usize,
        function: impl Fn(&mut Interpreter, Value, Vec<Value>) -> Result<Value> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            callable: Callable::Native(NativeFunction {
                arity,
                function: Rc::new(function),
            }),
            properties: RefCell::new(IndexMap::new()),
        }
    }

    pub fn is_arrow(&self) -> bool {
        matches!(&self.callable, Callable::Closure(closure) if closure.function.is_arrow())
    }

    /// Declared parameter count, as reported by `fn.length`
    pub fn arity(&self) -> usize {
        match &self.callable {
            Callable::Closure(closure) => closure.function.arity(),
            Callable::Native(native) => native.arity,
        }
    }

    pub fn get_own(&self, key: &str) -> Option<Value> {
        self.properties.borrow().get(key).cloned()
    }

    pub fn set_own(&self, key: impl Into<String>, value: Value) {
        self.properties.borrow_mut().insert(key.into(), value);
    }
}

impl fmt::Debug for FunctionObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.callable {
            Callable::Closure(_) => "closure",
            Callable::Native(_) => "native",
        };
        f.debug_struct("FunctionObject")
            .field("name", &self.name)
            .field("kind", &kind)
            .finish()
    }
}

impl Value {
    pub fn string(value: impl Into<Rc<str>>) -> Self {
        Value::String(value.into())
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Value::Array(Rc::new(RefCell::new(elements)))
    }

    pub fn object(object: Object) -> Self {
        Value::Object(Rc::new(RefCell::new(object)))
    }

    /// Build a plain object from key/value pairs, keeping their order
    pub fn object_from<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut object = Object::new();
        for (key, value) in entries {
            object.insert(key, value);
        }
        Value::object(object)
    }

    pub fn function(function: FunctionObject) -> Self {
        Value::Function(Rc::new(function))
    }

    pub fn native(
        name: impl Into<String>,
        arity: usize,
        function: impl Fn(&mut Interpreter, Value, Vec<Value>) -> Result<Value> + 'static,
    ) -> Self {
        Value::function(FunctionObject::native(name, arity, function))
    }

    pub fn type_of(&self) -> &'static str {
        match self {
            Value::Undefined => "undefined",
            Value::Null | Value::Array(_) | Value::Object(_) => "object",
            Value::Boolean(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
        }
    }

    pub fn is_nullish(&self) -> bool {
        matches!(self, Value::Undefined | Value::Null)
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Undefined | Value::Null => false,
            Value::Boolean(value) => *value,
            Value::Number(value) => *value != 0.0 && !value.is_nan(),
            Value::String(value) => !value.is_empty(),
            Value::Array(_) | Value::Object(_) | Value::Function(_) => true,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(value) => Some(value),
            _ => None,
        }
    }

    /// Numeric conversion without calling script-defined `valueOf`
    pub fn to_number(&self) -> f64 {
        match self {
            Value::Undefined => f64::NAN,
            Value::Null => 0.0,
            Value::Boolean(value) => f64::from(u8::from(*value)),
            Value::Number(value) => *value,
            Value::String(value) => string_to_number(value),
            Value::Array(_) => string_to_number(&self.to_js_string()),
            Value::Object(_) | Value::Function(_) => f64::NAN,
        }
    }

    /// String conversion without calling script-defined `toString`
    pub fn to_js_string(&self) -> String {
        let mut seen = Vec::new();
        self.join_string(&mut seen)
    }

    fn join_string(&self, seen: &mut Vec<usize>) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Boolean(value) => value.to_string(),
            Value::Number(value) => format_number(*value),
            Value::String(value) => value.to_string(),
            Value::Array(elements) => {
                let id = Rc::as_ptr(elements) as *const () as usize;
                if seen.contains(&id) {
                    return String::new();
                }
                seen.push(id);
                let joined = elements
                    .borrow()
                    .iter()
                    .map(|element| match element {
                        Value::Undefined | Value::Null => String::new(),
                        other => other.join_string(seen),
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                seen.pop();
                joined
            }
            Value::Object(_) => "[object Object]".to_string(),
            Value::Function(function) => {
                format!("function {}() {{ [native code] }}", function.name)
            }
        }
    }

    pub fn strict_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Strict equality where `NaN` equals itself, as `includes` compares
    pub fn same_value_zero(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) if a.is_nan() && b.is_nan() => true,
            _ => self.strict_equals(other),
        }
    }

    /// Read a property without running script code.
    ///
    /// Objects consult their prototype chain, arrays and strings answer
    /// indices and `length`, functions answer their own properties plus
    /// `name` and `length`.
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(object) => object.borrow().lookup(key),
            Value::Array(elements) => {
                let elements = elements.borrow();
                if key == "length" {
                    return Some(Value::Number(elements.len() as f64));
                }
                array_index(key).and_then(|index| elements.get(index).cloned())
            }
            Value::String(value) => {
                if key == "length" {
                    return Some(Value::Number(value.chars().count() as f64));
                }
                array_index(key)
                    .and_then(|index| value.chars().nth(index))
                    .map(|c| Value::string(c.to_string()))
            }
            Value::Function(function) => function.get_own(key).or_else(|| match key {
                "name" => Some(Value::string(function.name.as_str())),
                "length" => Some(Value::Number(function.arity() as f64)),
                _ => None,
            }),
            _ => None,
        }
    }

    /// One-line summary used for uncaught errors.
    ///
    /// Error-like objects render as `Name: message`.
    pub fn describe(&self) -> String {
        if let Value::Object(object) = self {
            let object = object.borrow();
            if let (Some(name), Some(message)) = (object.lookup("name"), object.lookup("message")) {
                let message = message.to_js_string();
                return if message.is_empty() {
                    name.to_js_string()
                } else {
                    format!("{}: {}", name.to_js_string(), message)
                };
            }
        }
        match self {
            Value::String(value) => value.to_string(),
            other => other.inspect(),
        }
    }

    /// Console-style rendering: strings quoted, nested containers spelled out.
    pub fn inspect(&self) -> String {
        let mut seen = Vec::new();
        self.inspect_nested(&mut seen, 0)
    }

    fn inspect_nested(&self, seen: &mut Vec<usize>, depth: usize) -> String {
        match self {
            Value::String(value) => format!("'{}'", value.replace('\'', "\\'")),
            Value::Number(value) if *value == 0.0 && value.is_sign_negative() => "-0".to_string(),
            Value::Function(function) if function.name.is_empty() => {
                "[Function (anonymous)]".to_string()
            }
            Value::Function(function) => format!("[Function: {}]", function.name),
            Value::Array(elements) => {
                let id = Rc::as_ptr(elements) as *const () as usize;
                if seen.contains(&id) {
                    return "[Circular]".to_string();
                }
                if depth > 2 {
                    return "[Array]".to_string();
                }
                let elements = elements.borrow();
                if elements.is_empty() {
                    return "[]".to_string();
                }
                seen.push(id);
                let parts: Vec<String> = elements
                    .iter()
                    .map(|element| element.inspect_nested(seen, depth + 1))
                    .collect();
                seen.pop();
                format!("[ {} ]", parts.join(", "))
            }
            Value::Object(object) => {
                let id = Rc::as_ptr(object) as *const () as usize;
                if seen.contains(&id) {
                    return "[Circular]".to_string();
                }
                if depth > 2 {
                    return "[Object]".to_string();
                }
                let object = object.borrow();
                if object.properties.is_empty() {
                    return "{}".to_string();
                }
                seen.push(id);
                let parts: Vec<String> = object
                    .properties
                    .iter()
                    .map(|(key, value)| {
                        let key = if is_identifier_name(key) {
                            key.clone()
                        } else {
                            format!("'{key}'")
                        };
                        format!("{key}: {}", value.inspect_nested(seen, depth + 1))
                    })
                    .collect();
                seen.pop();
                format!("{{ {} }}", parts.join(", "))
            }
            other => other.to_js_string(),
        }
    }

    /// Convert to JSON for the host. `undefined` and functions become `null`.
    pub fn to_json(&self) -> Result<serde_json::Value> {
        let mut seen = Vec::new();
        Ok(self
            .json_fragment(&mut seen)?
            .unwrap_or(serde_json::Value::Null))
    }

    /// JSON conversion that reports values JSON cannot represent as `None`
    pub(crate) fn json_fragment(&self, seen: &mut Vec<usize>) -> Result<Option<serde_json::Value>> {
        use serde_json::Value as Json;

        let json = match self {
            Value::Undefined | Value::Function(_) => return Ok(None),
            Value::Null => Json::Null,
            Value::Boolean(value) => Json::Bool(*value),
            Value::Number(value) => number_to_json(*value),
            Value::String(value) => Json::String(value.to_string()),
            Value::Array(elements) => {
                let id = Rc::as_ptr(elements) as *const () as usize;
                enter_container(seen, id)?;
                let mut items = Vec::new();
                for element in elements.borrow().iter() {
                    items.push(element.json_fragment(seen)?.unwrap_or(Json::Null));
                }
                seen.pop();
                Json::Array(items)
            }
            Value::Object(object) => {
                let id = Rc::as_ptr(object) as *const () as usize;
                enter_container(seen, id)?;
                let mut map = serde_json::Map::new();
                for (key, value) in object.borrow().properties.iter() {
                    if let Some(json) = value.json_fragment(seen)? {
                        map.insert(key.clone(), json);
                    }
                }
                seen.pop();
                Json::Object(map)
            }
        };
        Ok(Some(json))
    }

    pub fn from_json(json: &serde_json::Value) -> Value {
        use serde_json::Value as Json;

        match json {
            Json::Null => Value::Null,
            Json::Bool(value) => Value::Boolean(*value),
            Json::Number(number) => Value::Number(number.as_f64().unwrap_or(f64::NAN)),
            Json::String(value) => Value::string(value.as_str()),
            Json::Array(items) => Value::array(items.iter().map(Value::from_json).collect()),
            Json::Object(map) => Value::object_from(
                map.iter()
                    .map(|(key, value)| (key.clone(), Value::from_json(value))),
            ),
        }
    }
}

fn enter_container(seen: &mut Vec<usize>, id: usize) -> Result<()> {
    if seen.contains(&id) {
        return Err(RuntimeError::type_error(
            "Converting circular structure to JSON",
        ));
    }
    seen.push(id);
    Ok(())
}

fn number_to_json(value: f64) -> serde_json::Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if !value.is_finite() {
        return serde_json::Value::Null;
    }
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::from(value as i64);
    }
    serde_json::Number::from_f64(value)
        .map(serde_json::Value::Number)
        .unwrap_or(serde_json::Value::Null)
}

fn is_identifier_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
            chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Longest array the interpreter will allocate. Arrays are stored densely,
/// so a larger `length` or index raises a `RangeError`.
pub const MAX_ARRAY_LENGTH: usize = 1 << 24;

/// Longest string, in bytes, the interpreter will build
pub const MAX_STRING_LENGTH: usize = 1 << 28;

pub(crate) fn check_array_length(length: usize) -> Result<()> {
    if length > MAX_ARRAY_LENGTH {
        return Err(RuntimeError::range_error("Invalid array length"));
    }
    Ok(())
}

pub(crate) fn check_string_length(length: usize) -> Result<()> {
    if length > MAX_STRING_LENGTH {
        return Err(RuntimeError::range_error("Invalid string length"));
    }
    Ok(())
}

/// Canonical array index (`"0"`, `"17"`, never `"01"`)
pub fn array_index(key: &str) -> Option<usize> {
    if key.is_empty() || (key.len() > 1 && key.starts_with('0')) {
        return None;
    }
    if !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}

/// JavaScript `ToNumber` applied to a string
pub fn string_to_number(input: &str) -> f64 {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }

    let radix_digits = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)];
    for (prefix, radix) in radix_digits {
        if let Some(digits) = trimmed.strip_prefix(prefix) {
            return parse_radix_digits(digits, radix).unwrap_or(f64::NAN);
        }
    }

    let numeric = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    if !numeric {
        return f64::NAN;
    }
    trimmed.parse().unwrap_or(f64::NAN)
}

pub(crate) fn parse_radix_digits(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0.0, |acc, c| {
        c.to_digit(radix).map(|digit| acc * f64::from(radix) + f64::from(digit))
    })
}

/// JavaScript `Number.prototype.toString()` for radix 10
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    // Shortest round-trip digits, e.g. "1.2345e3"
    let scientific = format!("{:e}", value.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    let n = exponent + 1;

    let body = if k <= n && n <= 21 {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if 0 < n && n <= 21 {
        let (integer, fraction) = digits.split_at(n as usize);
        format!("{integer}.{fraction}")
    } else if -6 < n && n <= 0 {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let e = n - 1;
        let exponent_sign = if e >= 0 { "+" } else { "-" };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{exponent_sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{exponent_sign}{}", e.abs())
        }
    };
    format!("{sign}{body}")
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(value) => write!(f, "{value:?}"),
            other => f.write_str(&other.inspect()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.strict_equals(other)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(f64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::string(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::string(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Value::array(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_number_formatting() {
        let cases = [
            (2.0, "2"),
            (-1.5, "-1.5"),
            (0.1 + 0.2, "0.30000000000000004"),
            (1e21, "1e+21"),
            (123456789012345680000.0, "123456789012345680000"),
            (0.000001, "0.000001"),
            (1e-7, "1e-7"),
            (1.5e-10, "1.5e-10"),
            (-0.0, "0"),
            (f64::NAN, "NaN"),
            (f64::NEG_INFINITY, "-Infinity"),
        ];

        for (value, expected) in cases {
            assert_eq!(format_number(value), expected, "formatting {value}");
        }
    }

    #[test]
    fn test_string_to_number() {
        assert_eq!(string_to_number("  42 "), 42.0);
        assert_eq!(string_to_number(""), 0.0);
        assert_eq!(string_to_number("0x1F"), 31.0);
        assert_eq!(string_to_number("-Infinity"), f64::NEG_INFINITY);
        assert!(string_to_number("inf").is_nan());
        assert!(string_to_number("12px").is_nan());
        assert!(string_to_number("nan").is_nan());
    }

    #[test]
    fn test_truthiness_and_typeof() {
        assert!(!Value::from("").is_truthy());
        assert!(!Value::Number(f64::NAN).is_truthy());
        assert!(Value::array(vec![]).is_truthy());
        assert_eq!(Value::Null.type_of(), "object");
        assert_eq!(Value::native("f", 0, |_, _, _| Ok(Value::Undefined)).type_of(), "function");
    }

    #[test]
    fn test_array_string_conversion() {
        let inner = Value::array(vec![Value::from("a"), Value::from(true)]);
        let nested = Value::array(vec![Value::from(1), Value::Null, inner]);
        assert_eq!(nested.to_js_string(), "1,,a,true");
        assert_eq!(Value::array(vec![Value::from(5)]).to_number(), 5.0);
    }

    #[test]
    fn test_identity_equality() {
        let a = Value::array(vec![]);
        let b = Value::array(vec![]);

        assert!(a.strict_equals(&a.clone()));
        assert!(!a.strict_equals(&b));
        assert!(Value::Number(f64::NAN).same_value_zero(&Value::Number(f64::NAN)));
    }

    #[test]
    fn test_json_conversion() {
        let value = Value::object_from([
            ("a", Value::from(1)),
            ("b", Value::array(vec![Value::Undefined, Value::from(1.5)])),
            ("skipped", Value::Undefined),
            ("s", Value::from("x")),
        ]);

        assert_eq!(value.to_json().unwrap(), json!({"a": 1, "b": [null, 1.5], "s": "x"}));

        let back = Value::from_json(&json!({"n": [1, "two", null]}));
        assert_eq!(back.to_json().unwrap(), json!({"n": [1, "two", null]}));
    }

    #[test]
    fn test_circular_json_is_a_type_error() {
        let array = Value::array(vec![]);
        if let Value::Array(elements) = &array {
            elements.borrow_mut().push(array.clone());
        }

        let error = array.to_json().unwrap_err();
        assert_eq!(error.message(), "Converting circular structure to JSON");
        assert_eq!(array.inspect(), "[ [Circular] ]");
    }

    #[test]
    fn test_inspect_and_describe() {
        let value = Value::object_from([("a", Value::from(1)), ("b c", Value::from("x"))]);
        assert_eq!(value.inspect(), "{ a: 1, 'b c': 'x' }");

        let error = Value::object_from([
            ("name", Value::from("TypeError")),
            ("message", Value::from("bad")),
        ]);
        assert_eq!(error.describe(), "TypeError: bad");
    }

    #[test]
    fn test_property_reads() {
        let array = Value::array(vec![Value::from(1), Value::from(2)]);
        assert_eq!(array.get("length"), Some(Value::from(2)));
        assert_eq!(array.get("1"), Some(Value::from(2)));
        assert_eq!(array.get("01"), None);
        assert_eq!(Value::from("héllo").get("1"), Some(Value::from("é")));
    }
}
