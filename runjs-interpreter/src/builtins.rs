//! Methods of primitive and built-in values.
//!
//! Arrays, strings, numbers, functions and plain objects share one native
//! function per method name. Member access falls back to these tables when a
//! value has no own property of that name, and the receiver arrives as
//! `this`.

use crate::error::{Result, RuntimeError};
use crate::evaluator::Interpreter;
use crate::value::{
    check_string_length, format_number, ArrayRef, FunctionObject, Value, MAX_STRING_LENGTH,
};
use std::collections::HashMap;

type Method = fn(&mut Interpreter, Value, Vec<Value>) -> Result<Value>;

pub(crate) struct Intrinsics {
    array: HashMap<&'static str, Value>,
    string: HashMap<&'static str, Value>,
    number: HashMap<&'static str, Value>,
    function: HashMap<&'static str, Value>,
    object: HashMap<&'static str, Value>,
}

impl Intrinsics {
    pub(crate) fn new() -> Self {
        Self {
            array: table(&[
                ("push", 1, array_push),
                ("pop", 0, array_pop),
                ("shift", 0, array_shift),
                ("unshift", 1, array_unshift),
                ("slice", 2, array_slice),
                ("concat", 1, array_concat),
                ("join", 1, array_join),
                ("indexOf", 1, array_index_of),
                ("includes", 1, array_includes),
                ("reverse", 0, array_reverse),
                ("map", 1, array_map),
                ("filter", 1, array_filter),
                ("forEach", 1, array_for_each),
                ("reduce", 1, array_reduce),
                ("some", 1, array_some),
                ("every", 1, array_every),
                ("find", 1, array_find),
                ("findIndex", 1, array_find_index),
                ("sort", 1, array_sort),
                ("toString", 0, array_to_string),
            ]),
            string: table(&[
                ("charAt", 1, string_char_at),
                ("charCodeAt", 1, string_char_code_at),
                ("indexOf", 1, string_index_of),
                ("includes", 1, string_includes),
                ("slice", 2, string_slice),
                ("substring", 2, string_substring),
                ("toUpperCase", 0, string_to_upper_case),
                ("toLowerCase", 0, string_to_lower_case),
                ("trim", 0, string_trim),
                ("trimStart", 0, string_trim_start),
                ("trimEnd", 0, string_trim_end),
                ("split", 2, string_split),
                ("startsWith", 1, string_starts_with),
                ("endsWith", 1, string_ends_with),
                ("repeat", 1, string_repeat),
                ("padStart", 2, string_pad_start),
                ("padEnd", 2, string_pad_end),
                ("concat", 1, string_concat),
                ("toString", 0, this_value),
                ("valueOf", 0, this_value),
            ]),
            number: table(&[
                ("toFixed", 1, number_to_fixed),
                ("toString", 1, number_to_string),
                ("valueOf", 0, this_value),
            ]),
            function: table(&[
                ("call", 1, function_call),
                ("apply", 2, function_apply),
                ("bind", 1, function_bind),
                ("toString", 0, function_to_string),
            ]),
            object: table(&[
                ("hasOwnProperty", 1, object_has_own_property),
                ("toString", 0, object_to_string),
                ("valueOf", 0, this_value),
            ]),
        }
    }

    /// Method `key` of the table matching the receiver's type
    pub(crate) fn lookup(&self, receiver: &Value, key: &str) -> Option<Value> {
        let table = match receiver {
            Value::Array(_) => &self.array,
            Value::String(_) => &self.string,
            Value::Number(_) => &self.number,
            Value::Function(_) => &self.function,
            Value::Object(_) => &self.object,
            Value::Undefined | Value::Null | Value::Boolean(_) => return None,
        };
        table.get(key).cloned()
    }
}

fn table(methods: &[(&'static str, usize, Method)]) -> HashMap<&'static str, Value> {
    methods
        .iter()
        .map(|&(name, arity, method)| (name, Value::native(name, arity, method)))
        .collect()
}

fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or_default()
}

fn to_integer(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.trunc()
    }
}

/// Resolve a possibly negative position against `len`, as `slice` does
fn relative_index(value: &Value, len: usize, default: usize) -> usize {
    if matches!(value, Value::Undefined) {
        return default;
    }
    let position = to_integer(value.to_number());
    if position < 0.0 {
        (len as f64 + position).max(0.0) as usize
    } else {
        position.min(len as f64) as usize
    }
}

fn this_value(_: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    Ok(this)
}

// Arrays

fn this_array(this: &Value, method: &str) -> Result<ArrayRef> {
    match this {
        Value::Array(elements) => Ok(elements.clone()),
        _ => Err(RuntimeError::type_error(format!(
            "Array.prototype.{method} called on a non-array"
        ))),
    }
}

fn callback_argument(args: &[Value], method: &str) -> Result<Value> {
    match args.first() {
        Some(callback @ Value::Function(_)) => Ok(callback.clone()),
        Some(other) => Err(RuntimeError::type_error(format!(
            "{} is not a function",
            other.inspect()
        ))),
        None => Err(RuntimeError::type_error(format!(
            "undefined is not a function (in Array.prototype.{method})"
        ))),
    }
}

fn element_at(elements: &ArrayRef, index: usize) -> Option<Value> {
    elements.borrow().get(index).cloned()
}

/// Call `callback(element, index, array)` for each element until `visit`
/// returns `Some`, which becomes the result.
fn each_element<T>(
    interpreter: &mut Interpreter,
    this: &Value,
    args: &[Value],
    method: &str,
    mut visit: impl FnMut(usize, Value, Value) -> Option<T>,
) -> Result<Option<T>> {
    let elements = this_array(this, method)?;
    let callback = callback_argument(args, method)?;
    let receiver = arg(args, 1);
    let len = elements.borrow().len();

    for index in 0..len {
        let Some(element) = element_at(&elements, index) else {
            break;
        };
        let result = interpreter.call(
            &callback,
            receiver.clone(),
            vec![element.clone(), Value::from(index as f64), this.clone()],
        )?;
        if let Some(found) = visit(index, element, result) {
            return Ok(Some(found));
        }
    }
    Ok(None)
}

fn array_push(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "push")?;
    let mut elements = elements.borrow_mut();
    elements.extend(args);
    Ok(Value::from(elements.len() as f64))
}

fn array_pop(_: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "pop")?;
    let popped = elements.borrow_mut().pop();
    Ok(popped.unwrap_or_default())
}

fn array_shift(_: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "shift")?;
    let mut elements = elements.borrow_mut();
    if elements.is_empty() {
        return Ok(Value::Undefined);
    }
    Ok(elements.remove(0))
}

fn array_unshift(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "unshift")?;
    let mut elements = elements.borrow_mut();
    elements.splice(0..0, args);
    Ok(Value::from(elements.len() as f64))
}

fn array_slice(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "slice")?;
    let elements = elements.borrow();
    let len = elements.len();
    let start = relative_index(&arg(&args, 0), len, 0);
    let end = relative_index(&arg(&args, 1), len, len);
    let sliced = if start < end {
        elements[start..end].to_vec()
    } else {
        Vec::new()
    };
    Ok(Value::array(sliced))
}

fn array_concat(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "concat")?;
    let mut result = elements.borrow().clone();
    for value in args {
        match value {
            Value::Array(other) => result.extend(other.borrow().iter().cloned()),
            other => result.push(other),
        }
    }
    Ok(Value::array(result))
}

fn array_join(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "join")?;
    let separator = match arg(&args, 0) {
        Value::Undefined => ",".to_string(),
        other => interpreter.to_string(&other)?,
    };
    let snapshot = elements.borrow().clone();
    let mut parts = Vec::with_capacity(snapshot.len());
    for element in &snapshot {
        parts.push(match element {
            Value::Undefined | Value::Null => String::new(),
            Value::Array(nested) if std::rc::Rc::ptr_eq(nested, &elements) => String::new(),
            other => interpreter.to_string(other)?,
        });
    }
    Ok(Value::from(parts.join(&separator)))
}

fn array_to_string(interpreter: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    array_join(interpreter, this, Vec::new())
}

fn array_index_of(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "indexOf")?;
    let elements = elements.borrow();
    let start = relative_index(&arg(&args, 1), elements.len(), 0);
    let search = arg(&args, 0);
    let position = elements
        .iter()
        .skip(start)
        .position(|element| element.strict_equals(&search))
        .map(|offset| (start + offset) as f64)
        .unwrap_or(-1.0);
    Ok(Value::from(position))
}

fn array_includes(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "includes")?;
    let search = arg(&args, 0);
    let found = elements
        .borrow()
        .iter()
        .any(|element| element.same_value_zero(&search));
    Ok(Value::from(found))
}

fn array_reverse(_: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    this_array(&this, "reverse")?.borrow_mut().reverse();
    Ok(this)
}

fn array_map(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let mut mapped = Vec::new();
    each_element(interpreter, &this, &args, "map", |_, _, result| {
        mapped.push(result);
        None::<()>
    })?;
    Ok(Value::array(mapped))
}

fn array_filter(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let mut kept = Vec::new();
    each_element(interpreter, &this, &args, "filter", |_, element, result| {
        if result.is_truthy() {
            kept.push(element);
        }
        None::<()>
    })?;
    Ok(Value::array(kept))
}

fn array_for_each(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    each_element(interpreter, &this, &args, "forEach", |_, _, _| None::<()>)?;
    Ok(Value::Undefined)
}

fn array_some(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let found = each_element(interpreter, &this, &args, "some", |_, _, result| {
        result.is_truthy().then_some(())
    })?;
    Ok(Value::from(found.is_some()))
}

fn array_every(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let failed = each_element(interpreter, &this, &args, "every", |_, _, result| {
        (!result.is_truthy()).then_some(())
    })?;
    Ok(Value::from(failed.is_none()))
}

fn array_find(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let found = each_element(interpreter, &this, &args, "find", |_, element, result| {
        result.is_truthy().then_some(element)
    })?;
    Ok(found.unwrap_or_default())
}

fn array_find_index(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let found = each_element(interpreter, &this, &args, "findIndex", |index, _, result| {
        result.is_truthy().then_some(index as f64)
    })?;
    Ok(Value::from(found.unwrap_or(-1.0)))
}

fn array_reduce(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "reduce")?;
    let callback = callback_argument(&args, "reduce")?;
    let len = elements.borrow().len();

    let (mut accumulator, start) = match args.get(1) {
        Some(initial) => (initial.clone(), 0),
        None => match element_at(&elements, 0) {
            Some(first) => (first, 1),
            None => {
                return Err(RuntimeError::type_error(
                    "Reduce of empty array with no initial value",
                ))
            }
        },
    };

    for index in start..len {
        let Some(element) = element_at(&elements, index) else {
            break;
        };
        accumulator = interpreter.call(
            &callback,
            Value::Undefined,
            vec![accumulator, element, Value::from(index as f64), this.clone()],
        )?;
    }
    Ok(accumulator)
}

fn array_sort(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let elements = this_array(&this, "sort")?;
    let comparator = match arg(&args, 0) {
        Value::Undefined => None,
        function @ Value::Function(_) => Some(function),
        _ => {
            return Err(RuntimeError::type_error(
                "The comparison function must be either a function or undefined",
            ))
        }
    };

    let snapshot = elements.borrow().clone();
    let (defined, undefined): (Vec<Value>, Vec<Value>) = snapshot
        .into_iter()
        .partition(|value| !matches!(value, Value::Undefined));

    let mut sorted = merge_sort(interpreter, defined, comparator.as_ref())?;
    sorted.extend(undefined);
    *elements.borrow_mut() = sorted;
    Ok(this)
}

/// Stable merge sort whose comparisons may call back into script code
fn merge_sort(
    interpreter: &mut Interpreter,
    mut items: Vec<Value>,
    comparator: Option<&Value>,
) -> Result<Vec<Value>> {
    if items.len() <= 1 {
        return Ok(items);
    }
    let right = items.split_off(items.len() / 2);
    let left = merge_sort(interpreter, items, comparator)?;
    let right = merge_sort(interpreter, right, comparator)?;

    let mut merged = Vec::with_capacity(left.len() + right.len());
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        if sort_compare(interpreter, &right[j], &left[i], comparator)? < 0.0 {
            merged.push(right[j].clone());
            j += 1;
        } else {
            merged.push(left[i].clone());
            i += 1;
        }
    }
    merged.extend_from_slice(&left[i..]);
    merged.extend_from_slice(&right[j..]);
    Ok(merged)
}

fn sort_compare(
    interpreter: &mut Interpreter,
    a: &Value,
    b: &Value,
    comparator: Option<&Value>,
) -> Result<f64> {
    match comparator {
        Some(comparator) => {
            let args = vec![a.clone(), b.clone()];
            let result = interpreter.call(comparator, Value::Undefined, args)?;
            let order = interpreter.to_number(&result)?;
            Ok(if order.is_nan() { 0.0 } else { order })
        }
        None => {
            let a = interpreter.to_string(a)?;
            let b = interpreter.to_string(b)?;
            Ok(match a.encode_utf16().cmp(b.encode_utf16()) {
                std::cmp::Ordering::Less => -1.0,
                std::cmp::Ordering::Equal => 0.0,
                std::cmp::Ordering::Greater => 1.0,
            })
        }
    }
}

// Strings

fn this_string(interpreter: &mut Interpreter, this: &Value) -> Result<String> {
    match this {
        Value::String(text) => Ok(text.to_string()),
        Value::Undefined | Value::Null => Err(RuntimeError::type_error(
            "String.prototype method called on null or undefined",
        )),
        other => interpreter.to_string(other),
    }
}

fn string_argument(interpreter: &mut Interpreter, args: &[Value], index: usize) -> Result<String> {
    interpreter.to_string(&arg(args, index))
}

/// Position of `needle` in `haystack` at or after `from`, in characters
fn find_chars(haystack: &[char], needle: &[char], from: usize) -> Option<usize> {
    if needle.is_empty() {
        return Some(from.min(haystack.len()));
    }
    if needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&start| haystack[start..].starts_with(needle))
}

fn string_char_at(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let index = to_integer(arg(&args, 0).to_number());
    let found = (index >= 0.0)
        .then(|| text.chars().nth(index as usize))
        .flatten()
        .map(|c| c.to_string())
        .unwrap_or_default();
    Ok(Value::from(found))
}

fn string_char_code_at(
    interpreter: &mut Interpreter,
    this: Value,
    args: Vec<Value>,
) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let index = to_integer(arg(&args, 0).to_number());
    let code = (index >= 0.0)
        .then(|| text.chars().nth(index as usize))
        .flatten()
        .map(|c| f64::from(u32::from(c)))
        .unwrap_or(f64::NAN);
    Ok(Value::from(code))
}

fn string_index_of(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let text: Vec<char> = this_string(interpreter, &this)?.chars().collect();
    let needle: Vec<char> = string_argument(interpreter, &args, 0)?.chars().collect();
    let from = to_integer(arg(&args, 1).to_number()).max(0.0) as usize;
    let position = find_chars(&text, &needle, from)
        .map(|index| index as f64)
        .unwrap_or(-1.0);
    Ok(Value::from(position))
}

fn string_includes(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let needle = string_argument(interpreter, &args, 0)?;
    Ok(Value::from(text.contains(needle.as_str())))
}

fn string_slice(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let chars: Vec<char> = this_string(interpreter, &this)?.chars().collect();
    let start = relative_index(&arg(&args, 0), chars.len(), 0);
    let end = relative_index(&arg(&args, 1), chars.len(), chars.len());
    let sliced: String = if start < end {
        chars[start..end].iter().collect()
    } else {
        String::new()
    };
    Ok(Value::from(sliced))
}

fn string_substring(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let chars: Vec<char> = this_string(interpreter, &this)?.chars().collect();
    let clamp = |value: Value, default: usize| match value {
        Value::Undefined => default,
        other => to_integer(other.to_number()).clamp(0.0, chars.len() as f64) as usize,
    };
    let a = clamp(arg(&args, 0), 0);
    let b = clamp(arg(&args, 1), chars.len());
    let (start, end) = if a <= b { (a, b) } else { (b, a) };
    Ok(Value::from(chars[start..end].iter().collect::<String>()))
}

fn string_to_upper_case(
    interpreter: &mut Interpreter,
    this: Value,
    _: Vec<Value>,
) -> Result<Value> {
    Ok(Value::from(this_string(interpreter, &this)?.to_uppercase()))
}

fn string_to_lower_case(
    interpreter: &mut Interpreter,
    this: Value,
    _: Vec<Value>,
) -> Result<Value> {
    Ok(Value::from(this_string(interpreter, &this)?.to_lowercase()))
}

fn string_trim(interpreter: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    Ok(Value::from(this_string(interpreter, &this)?.trim()))
}

fn string_trim_start(interpreter: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    Ok(Value::from(this_string(interpreter, &this)?.trim_start()))
}

fn string_trim_end(interpreter: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    Ok(Value::from(this_string(interpreter, &this)?.trim_end()))
}

fn string_split(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let limit = match arg(&args, 1) {
        Value::Undefined => usize::MAX,
        other => crate::operators::to_uint32(other.to_number()) as usize,
    };

    let parts: Vec<Value> = match arg(&args, 0) {
        Value::Undefined => vec![Value::from(text)],
        separator => {
            let separator = interpreter.to_string(&separator)?;
            if separator.is_empty() {
                text.chars().map(|c| Value::from(c.to_string())).collect()
            } else {
                text.split(separator.as_str()).map(Value::from).collect()
            }
        }
    };
    Ok(Value::array(parts.into_iter().take(limit).collect()))
}

fn string_starts_with(
    interpreter: &mut Interpreter,
    this: Value,
    args: Vec<Value>,
) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let prefix = string_argument(interpreter, &args, 0)?;
    let from = to_integer(arg(&args, 1).to_number()).max(0.0) as usize;
    let rest: String = text.chars().skip(from).collect();
    Ok(Value::from(rest.starts_with(prefix.as_str())))
}

fn string_ends_with(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let suffix = string_argument(interpreter, &args, 0)?;
    Ok(Value::from(text.ends_with(suffix.as_str())))
}

fn string_repeat(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let count = to_integer(arg(&args, 0).to_number());
    if count < 0.0 || count.is_infinite() {
        return Err(RuntimeError::range_error(format!(
            "Invalid count value: {}",
            format_number(count)
        )));
    }
    if text.len() as f64 * count > MAX_STRING_LENGTH as f64 {
        return Err(RuntimeError::range_error("Invalid string length"));
    }
    Ok(Value::from(text.repeat(count as usize)))
}

fn pad(
    interpreter: &mut Interpreter,
    this: Value,
    args: Vec<Value>,
    at_start: bool,
) -> Result<Value> {
    let text = this_string(interpreter, &this)?;
    let target = to_integer(arg(&args, 0).to_number()).max(0.0) as usize;
    let filler = match arg(&args, 1) {
        Value::Undefined => " ".to_string(),
        other => interpreter.to_string(&other)?,
    };
    let current = text.chars().count();
    if target <= current || filler.is_empty() {
        return Ok(Value::from(text));
    }
    check_string_length(target)?;
    let padding: String = filler.chars().cycle().take(target - current).collect();
    Ok(Value::from(if at_start {
        padding + &text
    } else {
        text + &padding
    }))
}

fn string_pad_start(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    pad(interpreter, this, args, true)
}

fn string_pad_end(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    pad(interpreter, this, args, false)
}

fn string_concat(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let mut text = this_string(interpreter, &this)?;
    for value in &args {
        text.push_str(&interpreter.to_string(value)?);
    }
    Ok(Value::from(text))
}

// Numbers

fn this_number(this: &Value) -> Result<f64> {
    this.as_number()
        .ok_or_else(|| RuntimeError::type_error("Number.prototype method called on a non-number"))
}

fn number_to_fixed(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let value = this_number(&this)?;
    let digits = to_integer(arg(&args, 0).to_number());
    if !(0.0..=100.0).contains(&digits) {
        return Err(RuntimeError::range_error(
            "toFixed() digits argument must be between 0 and 100",
        ));
    }
    if !value.is_finite() || value.abs() >= 1e21 {
        return Ok(Value::from(format_number(value)));
    }
    Ok(Value::from(format!("{:.*}", digits as usize, value)))
}

fn number_to_string(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let value = this_number(&this)?;
    let radix = match arg(&args, 0) {
        Value::Undefined => 10.0,
        other => to_integer(other.to_number()),
    };
    if !(2.0..=36.0).contains(&radix) {
        return Err(RuntimeError::range_error(
            "toString() radix must be between 2 and 36",
        ));
    }
    if radix == 10.0 || !value.is_finite() || value.fract() != 0.0 {
        return Ok(Value::from(format_number(value)));
    }
    Ok(Value::from(integer_to_radix(value, radix as u32)))
}

fn integer_to_radix(value: f64, radix: u32) -> String {
    let mut magnitude = value.abs();
    let mut digits = Vec::new();
    while magnitude >= 1.0 {
        let digit = (magnitude % f64::from(radix)) as u32;
        digits.push(std::char::from_digit(digit, radix).unwrap_or('0'));
        magnitude = (magnitude / f64::from(radix)).trunc();
    }
    if digits.is_empty() {
        digits.push('0');
    }
    if value < 0.0 {
        digits.push('-');
    }
    digits.iter().rev().collect()
}

// Functions

fn function_call(
    interpreter: &mut Interpreter,
    this: Value,
    mut args: Vec<Value>,
) -> Result<Value> {
    let receiver = if args.is_empty() {
        Value::Undefined
    } else {
        args.remove(0)
    };
    interpreter.call(&this, receiver, args)
}

fn function_apply(interpreter: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let arguments = match arg(&args, 1) {
        Value::Undefined | Value::Null => Vec::new(),
        Value::Array(elements) => elements.borrow().clone(),
        _ => {
            return Err(RuntimeError::type_error(
                "CreateListFromArrayLike called on non-object",
            ))
        }
    };
    interpreter.call(&this, arg(&args, 0), arguments)
}

fn function_bind(_: &mut Interpreter, this: Value, args: Vec<Value>) -> Result<Value> {
    let Value::Function(target) = &this else {
        return Err(RuntimeError::type_error("Bind must be called on a function"));
    };
    let receiver = arg(&args, 0);
    let bound: Vec<Value> = args.into_iter().skip(1).collect();
    let arity = target.arity().saturating_sub(bound.len());
    let name = format!("bound {}", target.name);
    let target = this.clone();

    Ok(Value::function(FunctionObject::native(
        name,
        arity,
        move |interpreter, _, rest| {
            let mut arguments = bound.clone();
            arguments.extend(rest);
            interpreter.call(&target, receiver.clone(), arguments)
        },
    )))
}

fn function_to_string(_: &mut Interpreter, this: Value, _: Vec<Value>) -> Result<Value> {
    Ok(Value::from(this.to_js_string()))
}

// Objects

fn object_has_own_property(
    interpreter: &mut Interpreter,
    this: Value,
    args: Vec<Value>,
) -> Result<Value> {
    let key = interpreter.property_key(&arg(&args, 0))?;
    let found = match &this {
        Value::Object(object) => object.borrow().properties.contains_key(&key),
        _ => false,
    };
    Ok(Value::from(found))
}

fn object_to_string(_: &mut Interpreter, _: Value, _: Vec<Value>) -> Result<Value> {
    Ok(Value::from("[object Object]"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_index() {
        assert_eq!(relative_index(&Value::from(-2), 5, 0), 3);
        assert_eq!(relative_index(&Value::from(-10), 5, 0), 0);
        assert_eq!(relative_index(&Value::from(10), 5, 0), 5);
        assert_eq!(relative_index(&Value::Undefined, 5, 5), 5);
    }

    #[test]
    fn test_find_chars() {
        let haystack: Vec<char> = "héllo héllo".chars().collect();
        let needle: Vec<char> = "llo".chars().collect();

        assert_eq!(find_chars(&haystack, &needle, 0), Some(2));
        assert_eq!(find_chars(&haystack, &needle, 3), Some(8));
        assert_eq!(find_chars(&haystack, &['z'], 0), None);
    }

    #[test]
    fn test_integer_to_radix() {
        assert_eq!(integer_to_radix(255.0, 16), "ff");
        assert_eq!(integer_to_radix(-5.0, 2), "-101");
        assert_eq!(integer_to_radix(0.0, 8), "0");
    }

    #[test]
    fn test_tables_resolve_by_receiver_type() {
        let intrinsics = Intrinsics::new();

        assert!(intrinsics.lookup(&Value::array(vec![]), "push").is_some());
        assert!(intrinsics.lookup(&Value::from("s"), "push").is_none());
        assert!(intrinsics.lookup(&Value::from("s"), "split").is_some());
        assert!(intrinsics.lookup(&Value::Boolean(true), "toString").is_none());
    }
}
