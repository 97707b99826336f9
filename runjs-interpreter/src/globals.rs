//! The global API injected into the root record before a program runs.
//!
//! [`GlobalApi`] is an ordered map of names to values. Hosts start from
//! [`GlobalApi::standard`] and add or replace entries, or start empty and
//! supply their own.

use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use crate::operators::power;
use crate::value::{parse_radix_digits, Object, ObjectRef, Value};
use indexmap::IndexMap;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, Default)]
pub struct GlobalApi {
    entries: IndexMap<String, Value>,
}

impl GlobalApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, replacing an earlier entry of the same name
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.entries.insert(name.into(), value);
        self
    }

    /// Register a native function under `name`
    pub fn function(
        &mut self,
        name: &str,
        arity: usize,
        function: impl Fn(&mut Interpreter, Value, Vec<Value>) -> Result<Value> + 'static,
    ) -> &mut Self {
        self.insert(name, Value::native(name, arity, function))
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The standard library every program sees by default
    pub fn standard() -> Self {
        let mut globals = Self::new();
        globals
            .insert("undefined", Value::Undefined)
            .insert("NaN", Value::Number(f64::NAN))
            .insert("Infinity", Value::Number(f64::INFINITY));

        install_errors(&mut globals);

        globals
            .insert("JSON", json_namespace())
            .insert("Math", math_namespace())
            .insert("Object", object_namespace())
            .insert("Array", array_namespace())
            .insert("console", console_namespace());

        globals
            .function("String", 1, |interpreter, _, args| {
                match args.first() {
                    Some(value) => Ok(Value::from(interpreter.to_string(value)?)),
                    None => Ok(Value::from("")),
                }
            })
            .function("Number", 1, |interpreter, _, args| match args.first() {
                Some(value) => Ok(Value::Number(interpreter.to_number(value)?)),
                None => Ok(Value::Number(0.0)),
            })
            .function("Boolean", 1, |_, _, args| {
                Ok(Value::Boolean(first(&args).is_truthy()))
            })
            .function("parseInt", 2, |interpreter, _, args| {
                let text = interpreter.to_string(&first(&args))?;
                let radix = args.get(1).map(Value::to_number).unwrap_or(0.0);
                Ok(Value::Number(parse_int(&text, radix)))
            })
            .function("parseFloat", 1, |interpreter, _, args| {
                let text = interpreter.to_string(&first(&args))?;
                Ok(Value::Number(parse_float(&text)))
            })
            .function("isNaN", 1, |interpreter, _, args| {
                Ok(Value::Boolean(interpreter.to_number(&first(&args))?.is_nan()))
            })
            .function("isFinite", 1, |interpreter, _, args| {
                Ok(Value::Boolean(interpreter.to_number(&first(&args))?.is_finite()))
            });

        globals
    }
}

fn first(args: &[Value]) -> Value {
    args.first().cloned().unwrap_or_default()
}

// Errors

const ERROR_TYPES: [&str; 4] = ["TypeError", "ReferenceError", "SyntaxError", "RangeError"];

fn install_errors(globals: &mut GlobalApi) {
    let base = error_prototype("Error", None);
    base.borrow_mut().insert("message", Value::from(""));
    base.borrow_mut().insert(
        "toString",
        Value::native("toString", 0, |interpreter, this, _| {
            let name = interpreter.get_property(&this, "name")?;
            let message = interpreter.get_property(&this, "message")?;
            let name = match name {
                Value::Undefined => "Error".to_string(),
                other => interpreter.to_string(&other)?,
            };
            let message = match message {
                Value::Undefined => String::new(),
                other => interpreter.to_string(&other)?,
            };
            Ok(Value::from(match (name.is_empty(), message.is_empty()) {
                (_, true) => name,
                (true, false) => message,
                (false, false) => format!("{name}: {message}"),
            }))
        }),
    );
    globals.insert("Error", error_constructor("Error", Rc::clone(&base)));

    for name in ERROR_TYPES {
        let prototype = error_prototype(name, Some(Rc::clone(&base)));
        globals.insert(name, error_constructor(name, prototype));
    }
}

fn error_prototype(name: &str, parent: Option<ObjectRef>) -> ObjectRef {
    let mut prototype = Object::with_prototype(parent);
    prototype.insert("name", Value::from(name));
    Rc::new(RefCell::new(prototype))
}

/// `new TypeError(message)` and `TypeError(message)` both produce an object
/// inheriting from `TypeError.prototype`.
fn error_constructor(name: &str, prototype: ObjectRef) -> Value {
    let shared = Rc::clone(&prototype);
    let constructor = Value::native(name, 1, move |interpreter, this, args| {
        let target = match &this {
            Value::Object(object)
                if object
                    .borrow()
                    .prototype
                    .as_ref()
                    .is_some_and(|parent| Rc::ptr_eq(parent, &shared)) =>
            {
                this.clone()
            }
            _ => Value::object(Object::with_prototype(Some(Rc::clone(&shared)))),
        };
        if let Some(message) = args.first().filter(|message| !matches!(message, Value::Undefined)) {
            let message = interpreter.to_string(message)?;
            interpreter.set_property(&target, "message", Value::from(message))?;
        }
        Ok(target)
    });
    if let Value::Function(function) = &constructor {
        function.set_own("prototype", Value::Object(prototype));
    }
    constructor
}

// JSON

fn json_namespace() -> Value {
    Value::object_from([
        (
            "stringify",
            Value::native("stringify", 3, |_, _, args| {
                let mut seen = Vec::new();
                let Some(json) = first(&args).json_fragment(&mut seen)? else {
                    return Ok(Value::Undefined);
                };
                let indent = json_indent(args.get(2));
                Ok(Value::from(render_json(&json, &indent)))
            }),
        ),
        (
            "parse",
            Value::native("parse", 1, |interpreter, _, args| {
                let text = interpreter.to_string(&first(&args))?;
                match serde_json::from_str::<serde_json::Value>(&text) {
                    Ok(json) => Ok(Value::from_json(&json)),
                    Err(error) => {
                        let message = format!("Unexpected token in JSON: {error}");
                        Err(RuntimeError::thrown(interpreter.make_error("SyntaxError", &message)))
                    }
                }
            }),
        ),
    ])
}

/// The indentation unit requested by `JSON.stringify`'s third argument
fn json_indent(space: Option<&Value>) -> String {
    match space {
        Some(Value::Number(width)) if *width >= 1.0 => " ".repeat(width.min(10.0) as usize),
        Some(Value::String(text)) => text.chars().take(10).collect(),
        _ => String::new(),
    }
}

fn render_json(json: &serde_json::Value, indent: &str) -> String {
    if indent.is_empty() {
        return json.to_string();
    }
    let pretty = serde_json::to_string_pretty(json).unwrap_or_else(|_| json.to_string());
    pretty
        .lines()
        .map(|line| {
            let body = line.trim_start_matches(' ');
            let depth = (line.len() - body.len()) / 2;
            format!("{}{}", indent.repeat(depth), body)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

// Math

fn math_namespace() -> Value {
    fn unary(name: &'static str, f: fn(f64) -> f64) -> (&'static str, Value) {
        (
            name,
            Value::native(name, 1, move |interpreter, _, args| {
                Ok(Value::Number(f(interpreter.to_number(&first(&args))?)))
            }),
        )
    }

    fn fold(name: &'static str, initial: f64, pick: fn(f64, f64) -> f64) -> (&'static str, Value) {
        (
            name,
            Value::native(name, 2, move |interpreter, _, args| {
                let mut result = initial;
                for arg in &args {
                    let value = interpreter.to_number(arg)?;
                    if value.is_nan() {
                        return Ok(Value::Number(f64::NAN));
                    }
                    result = pick(result, value);
                }
                Ok(Value::Number(result))
            }),
        )
    }

    Value::object_from([
        ("PI", Value::Number(std::f64::consts::PI)),
        ("E", Value::Number(std::f64::consts::E)),
        unary("abs", f64::abs),
        unary("floor", f64::floor),
        unary("ceil", f64::ceil),
        unary("round", |x| (x + 0.5).floor()),
        unary("sqrt", f64::sqrt),
        unary("trunc", f64::trunc),
        unary("sign", |x| if x == 0.0 || x.is_nan() { x } else { x.signum() }),
        fold("max", f64::NEG_INFINITY, f64::max),
        fold("min", f64::INFINITY, f64::min),
        (
            "pow",
            Value::native("pow", 2, |interpreter, _, args| {
                let base = interpreter.to_number(&first(&args))?;
                let exponent = interpreter.to_number(&args.get(1).cloned().unwrap_or_default())?;
                Ok(Value::Number(power(base, exponent)))
            }),
        ),
    ])
}

// Object and Array

fn object_namespace() -> Value {
    Value::object_from([
        (
            "keys",
            Value::native("keys", 1, |interpreter, _, args| {
                let subject = object_argument(&first(&args), "keys")?;
                let keys = interpreter.own_keys(&subject).into_iter().map(Value::from).collect();
                Ok(Value::array(keys))
            }),
        ),
        (
            "values",
            Value::native("values", 1, |interpreter, _, args| {
                let subject = object_argument(&first(&args), "values")?;
                let values = interpreter
                    .own_keys(&subject)
                    .iter()
                    .map(|key| subject.get(key).unwrap_or_default())
                    .collect();
                Ok(Value::array(values))
            }),
        ),
        (
            "entries",
            Value::native("entries", 1, |interpreter, _, args| {
                let subject = object_argument(&first(&args), "entries")?;
                let entries = interpreter
                    .own_keys(&subject)
                    .into_iter()
                    .map(|key| {
                        let value = subject.get(&key).unwrap_or_default();
                        Value::array(vec![Value::from(key), value])
                    })
                    .collect();
                Ok(Value::array(entries))
            }),
        ),
        (
            "assign",
            Value::native("assign", 2, |interpreter, _, args| {
                let target = object_argument(&first(&args), "assign")?;
                for source in args.iter().skip(1).filter(|source| !source.is_nullish()) {
                    for key in interpreter.own_keys(source) {
                        let value = source.get(&key).unwrap_or_default();
                        interpreter.set_property(&target, &key, value)?;
                    }
                }
                Ok(target)
            }),
        ),
    ])
}

fn object_argument(value: &Value, method: &str) -> Result<Value> {
    if value.is_nullish() {
        return Err(RuntimeError::type_error(format!(
            "Object.{method} called on {}",
            value.to_js_string()
        )));
    }
    Ok(value.clone())
}

fn array_namespace() -> Value {
    Value::object_from([(
        "isArray",
        Value::native("isArray", 1, |_, _, args| {
            Ok(Value::Boolean(matches!(first(&args), Value::Array(_))))
        }),
    )])
}

// console

fn console_namespace() -> Value {
    Value::object_from([(
        "log",
        Value::native("log", 0, |interpreter, _, args| {
            let mut parts = Vec::with_capacity(args.len());
            for arg in &args {
                parts.push(match arg {
                    Value::String(text) => text.to_string(),
                    Value::Object(_)
                        if arg.get("message").is_some() && arg.get("name").is_some() =>
                    {
                        interpreter.to_string(arg)?
                    }
                    other => other.inspect(),
                });
            }
            let line = parts.join(" ");
            tracing::info!(target: "runjs::console", "{line}");
            println!("{line}");
            Ok(Value::Undefined)
        }),
    )])
}

// Number parsing

fn parse_int(text: &str, radix: f64) -> f64 {
    let text = text.trim_start();
    let (negative, text) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let mut radix = if radix.is_finite() { radix.trunc() as u32 } else { 0 };
    let mut digits = text;
    if radix == 0 || radix == 16 {
        if let Some(rest) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            digits = rest;
            radix = 16;
        }
    }
    if radix == 0 {
        radix = 10;
    }
    if !(2..=36).contains(&radix) {
        return f64::NAN;
    }

    let end = digits
        .char_indices()
        .find(|(_, c)| !c.is_digit(radix))
        .map_or(digits.len(), |(index, _)| index);
    match parse_radix_digits(&digits[..end], radix) {
        Some(value) if negative => -value,
        Some(value) => value,
        None => f64::NAN,
    }
}

fn parse_float(text: &str) -> f64 {
    let text = text.trim_start();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, text.strip_prefix('+').unwrap_or(text)),
    };
    if unsigned.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let bytes = text.as_bytes();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    let mut seen_exponent = false;

    while end < bytes.len() {
        match bytes[end] {
            b'0'..=b'9' => seen_digit = true,
            b'+' | b'-' if end == 0 => {}
            b'+' | b'-' if seen_exponent && matches!(bytes[end - 1], b'e' | b'E') => {}
            b'.' if !seen_dot && !seen_exponent => seen_dot = true,
            b'e' | b'E' if seen_digit && !seen_exponent => seen_exponent = true,
            _ => break,
        }
        end += 1;
    }

    let mut candidate = &text[..end];
    while !candidate.is_empty() {
        if let Ok(value) = candidate.parse::<f64>() {
            return value;
        }
        candidate = &candidate[..candidate.len() - 1];
    }
    f64::NAN
}
