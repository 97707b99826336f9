//! Primitive methods and the standard global API

use crate::ScriptSession;
use serde_json::json;

#[test]
fn test_array_mutators() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const xs = [2, 3];
            const pushed = xs.push(4, 5);
            const popped = xs.pop();
            const shifted = xs.shift();
            const unshifted = xs.unshift(0, 1);
            [pushed, popped, shifted, unshifted, xs, xs.reverse()]
            "#,
            json!([4, 5, 2, 4, [4, 3, 1, 0], [4, 3, 1, 0]]),
        )
        .unwrap();
}

#[test]
fn test_array_queries() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const xs = [1, 2, 3, 4, NaN];
            [
                xs.slice(1, 3),
                xs.slice(-2, -1),
                xs.indexOf(3),
                xs.indexOf(NaN),
                xs.includes(NaN),
                [1].concat([2, 3], 4),
                xs.slice(0, 4).join('-'),
                String([1, [2, 3]]),
            ]
            "#,
            json!([[2, 3], [4], 2, -1, true, [1, 2, 3, 4], "1-2-3-4", "1,2,3"]),
        )
        .unwrap();
}

#[test]
fn test_array_higher_order_methods() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const xs = [1, 2, 3, 4];
            let visited = 0;
            xs.forEach((x, i) => { visited += i; });
            [
                xs.map(x => x * x),
                xs.filter(x => x % 2 === 0),
                xs.reduce((sum, x) => sum + x, 0),
                xs.reduce((acc, x) => acc + x),
                xs.some(x => x > 3),
                xs.every(x => x > 3),
                xs.find(x => x > 2),
                xs.findIndex(x => x > 9),
                visited,
            ]
            "#,
            json!([[1, 4, 9, 16], [2, 4], 10, 10, true, false, 3, -1, 6]),
        )
        .unwrap();
}

#[test]
fn test_array_sort() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[[10, 9, 1].sort(), [10, 9, 1].sort((a, b) => a - b), ['b', undefined, 'a'].sort()]",
            json!([[1, 10, 9], [1, 9, 10], ["a", "b", null]]),
        )
        .unwrap();
}

#[test]
fn test_reduce_of_empty_array_fails() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with(
            "[].reduce((a, b) => a + b)",
            "TypeError: Reduce of empty array with no initial value",
        )
        .unwrap();
}

#[test]
fn test_string_methods() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const s = '  Hello, World  ';
            const t = s.trim();
            [
                t,
                t.charAt(1),
                t.indexOf('o'),
                t.includes('World'),
                t.slice(-5),
                t.substring(7, 5),
                t.toUpperCase(),
                t.toLowerCase(),
                t.split(', '),
                'a-b-c'.split('-', 2),
                'abc'.split(''),
                t.startsWith('Hell'),
                t.endsWith('!'),
                'ab'.repeat(3),
                '7'.padStart(3, '0'),
            ]
            "#,
            json!([
                "Hello, World",
                "e",
                4,
                true,
                "World",
                ", ",
                "HELLO, WORLD",
                "hello, world",
                ["Hello", "World"],
                ["a", "b"],
                ["a", "b", "c"],
                true,
                false,
                "ababab",
                "007"
            ]),
        )
        .unwrap();
}

#[test]
fn test_number_methods() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[(3.14159).toFixed(2), (255).toString(16), (0.5).toString(), 1e21 + '', 0.1 + 0.2 + '']",
            json!(["3.14", "ff", "0.5", "1e+21", "0.30000000000000004"]),
        )
        .unwrap();
}

#[test]
fn test_json_stringify_and_parse() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_string(
            "JSON.stringify({ a: [1, 'x', null, undefined], b: undefined, c: { d: true } })",
            r#"{"a":[1,"x",null,null],"c":{"d":true}}"#,
        )
        .unwrap();
    harness
        .assert_evaluates_to_string(
            "JSON.stringify([1, { a: 2 }], null, 2)",
            "[\n  1,\n  {\n    \"a\": 2\n  }\n]",
        )
        .unwrap();
    harness
        .assert_evaluates_to_undefined("JSON.stringify(undefined)")
        .unwrap();
    harness
        .assert_evaluates_to_json(
            r#"JSON.parse('{"x": [1, 2.5, "y"], "z": null}')"#,
            json!({ "x": [1, 2.5, "y"], "z": null }),
        )
        .unwrap();
    harness
        .assert_evaluates_to_string(
            "try { JSON.parse('{bad'); } catch (e) { e.name }",
            "SyntaxError",
        )
        .unwrap();
}

#[test]
fn test_json_stringify_rejects_cycles() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with(
            "const o = {}; o.self = o; JSON.stringify(o)",
            "TypeError: Converting circular structure to JSON",
        )
        .unwrap();
}

#[test]
fn test_math() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[Math.abs(-2), Math.floor(1.7), Math.ceil(1.2), Math.round(2.5), Math.round(-2.5), Math.max(1, 9, 3), Math.min(), Math.pow(2, 8), Math.sqrt(81), Math.trunc(-4.7), Math.sign(-3), Math.PI > 3.14]",
            json!([2, 1, 2, 3, -2, 9, null, 256, 9, -4, -1, true]),
        )
        .unwrap();
}

#[test]
fn test_object_and_array_namespaces() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const o = { a: 1, b: 'two' };
            const merged = Object.assign({ z: 0 }, o, null, { a: 3 });
            [Object.keys(o), Object.values(o), Object.entries(o), merged, Array.isArray([]), Array.isArray(o)]
            "#,
            json!([
                ["a", "b"],
                [1, "two"],
                [["a", 1], ["b", "two"]],
                { "z": 0, "a": 3, "b": "two" },
                true,
                false
            ]),
        )
        .unwrap();
}

#[test]
fn test_conversion_functions() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[String(12), String(null), Number('3.5'), Number(''), Boolean('x'), Boolean(0), parseInt('42px'), parseInt('ff', 16), parseFloat('2.5kg'), isNaN('abc'), isFinite('12'), isFinite(Infinity)]",
            json!(["12", "null", 3.5, 0, true, false, 42, 255, 2.5, true, true, false]),
        )
        .unwrap();
}

#[test]
fn test_error_constructors() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const e = new TypeError('bad input');
            const plain = Error('no new');
            [e.name, e.message, String(e), e instanceof TypeError, e instanceof Error, plain.message, plain instanceof Error, new RangeError().message]
            "#,
            json!([
                "TypeError",
                "bad input",
                "TypeError: bad input",
                true,
                true,
                "no new",
                true,
                "",
            ]),
        )
        .unwrap();
}

#[test]
fn test_console_log_returns_undefined() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_undefined("console.log('value:', 1, [1, 2], { a: 'b' })")
        .unwrap();
}

#[test]
fn test_has_own_property() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "function F() { this.own = 1; } F.prototype.inherited = 2; const f = new F(); [f.hasOwnProperty('own'), f.hasOwnProperty('inherited'), f.inherited]",
            json!([true, false, 2]),
        )
        .unwrap();
}

#[test]
fn test_oversized_arrays_are_range_errors() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with(
            "const a = []; a.length = 4294967295;",
            "RangeError: Invalid array length",
        )
        .unwrap();
    harness
        .assert_fails_with(
            "const b = []; b[4294967294] = 1;",
            "RangeError: Invalid array length",
        )
        .unwrap();
    harness
        .assert_evaluates_to_json(
            "const c = [1]; let name; try { c.length = 1e9; } catch (e) { name = e.name; } [name, c]",
            json!(["RangeError", [1]]),
        )
        .unwrap();
}

#[test]
fn test_oversized_strings_are_range_errors() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with("'x'.repeat(1e10)", "RangeError: Invalid string length")
        .unwrap();
    harness
        .assert_fails_with("'x'.padStart(1e10)", "RangeError: Invalid string length")
        .unwrap();
    harness
        .assert_fails_with("'x'.padEnd(Infinity, 'ab')", "RangeError: Invalid string length")
        .unwrap();
    harness
        .assert_evaluates_to_json(
            "[''.repeat(1e10), 'ab'.padStart(1e10, ''), 'ab'.repeat(2)]",
            json!(["", "ab", "abab"]),
        )
        .unwrap();
}
