//! Operators, literals, destructuring and spread

use crate::ScriptSession;
use serde_json::json;

#[test]
fn test_arithmetic_and_coercion() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[(1 + 2) * 3 / 3 - 1, 7 % 3, 2 ** 10, 1 + '2', '3' * '4', 10 / 4, -'5']",
            json!([2, 1, 1024, "12", 12, 2.5, -5]),
        )
        .unwrap();
    harness.assert_evaluates_to_string("[] + []", "").unwrap();
    harness.assert_evaluates_to_string("[1, 2] + 3", "1,23").unwrap();
    harness.assert_evaluates_to_number("0 / 0", f64::NAN).unwrap();
}

#[test]
fn test_bitwise_operators() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[5 & 3, 5 | 3, 5 ^ 3, ~5, 1 << 4, -7 >> 1, -1 >>> 28]",
            json!([1, 7, 6, -6, 16, -4, 15]),
        )
        .unwrap();
}

#[test]
fn test_equality_operators() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[1 == '1', 1 === '1', null == undefined, null === undefined, null == 0, NaN == NaN, 0 == false, 'a' != 'b']",
            json!([true, false, true, false, false, false, true, true]),
        )
        .unwrap();
    harness
        .assert_evaluates_to_json(
            "const a = [1]; const b = [1]; [a === a, a === b, a == '1']",
            json!([true, false, true]),
        )
        .unwrap();
}

#[test]
fn test_relational_operators() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[1 < 2, 'b' < 'a', '10' < '9', '10' < 9, 2 >= 2, NaN <= 1]",
            json!([true, false, true, false, true, false]),
        )
        .unwrap();
}

#[test]
fn test_typeof_and_unary_operators() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "[typeof 1, typeof 'a', typeof true, typeof undefined, typeof null, typeof {}, typeof [], typeof (() => 1), !0, +'3', void 7]",
            json!([
                "number",
                "string",
                "boolean",
                "undefined",
                "object",
                "object",
                "object",
                "function",
                true,
                3,
                null,
            ]),
        )
        .unwrap();
}

#[test]
fn test_in_and_delete() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const o = { a: 1, b: 2 }; const had = 'a' in o; delete o.a; [had, 'a' in o, Object.keys(o), 0 in [5]]",
            json!([true, false, ["b"], true]),
        )
        .unwrap();
}

#[test]
fn test_update_expressions() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "let i = 5; const j = i++; [i, j, ++i, i--, --i]",
            json!([6, 5, 7, 7, 5]),
        )
        .unwrap();
    harness
        .assert_evaluates_to_json("const o = { n: 1 }; o.n++; o['n'] += 10; o", json!({ "n": 12 }))
        .unwrap();
}

#[test]
fn test_logical_operators_short_circuit() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            let calls = 0;
            const touch = v => { calls++; return v; };
            const results = [0 && touch(1), 1 || touch(2), null ?? touch(3), 0 ?? touch(4), 'x' && touch('y')];
            [results, calls]
            "#,
            json!([[0, 1, 3, 0, "y"], 2]),
        )
        .unwrap();
}

#[test]
fn test_logical_and_compound_assignment() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "let a = null; a ??= 5; let b = 0; b ||= 7; let c = 1; c &&= 9; let d = 2; d **= 3; d -= 1; [a, b, c, d]",
            json!([5, 7, 9, 7]),
        )
        .unwrap();
}

#[test]
fn test_conditional_and_sequence() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "let x = 0; const y = (x++, x++, x); [x > 1 ? 'big' : 'small', y]",
            json!(["big", 2]),
        )
        .unwrap();
}

#[test]
fn test_template_literals_interleave() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_string("const name = 'x'; `a${name}b${1 + 1}c${[1, 2]}`", "axb2c1,2")
        .unwrap();
    harness.assert_evaluates_to_string("`${'only'}`", "only").unwrap();
    harness.assert_evaluates_to_string("`line\\nbreak`", "line\nbreak").unwrap();
}

#[test]
fn test_object_literal_keys() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const k = 'dyn'; const short = 1; ({ plain: 1, 'quoted key': 2, 3: 'three', [k + 'amic']: 4, short })",
            json!({ "plain": 1, "quoted key": 2, "3": "three", "dynamic": 4, "short": 1 }),
        )
        .unwrap();
}

#[test]
fn test_object_spread_merges_in_order() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const base = { a: 1, b: 2 }; ({ ...base, b: 3, c: 4, ...{ c: 5 } })",
            json!({ "a": 1, "b": 3, "c": 5 }),
        )
        .unwrap();
}

#[test]
fn test_array_spread_and_holes() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const mid = [2, 3]; [[1, ...mid, 4], [...'ab'], [1, , 3].length, Math.max(...mid)]",
            json!([[1, 2, 3, 4], ["a", "b"], 3, 3]),
        )
        .unwrap();
}

#[test]
fn test_array_destructuring() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const [a, , b = 10, ...rest] = [1, 2, undefined, 4, 5]; [a, b, rest]",
            json!([1, 10, [4, 5]]),
        )
        .unwrap();
}

#[test]
fn test_object_destructuring() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const { a, b: [c, d = 4], missing = 'dflt', ...others } = { a: 1, b: [3], e: 5, f: 6 }; [a, c, d, missing, others]",
            json!([1, 3, 4, "dflt", { "e": 5, "f": 6 }]),
        )
        .unwrap();
    harness
        .assert_fails_with(
            "const { x } = null;",
            "TypeError: Cannot destructure 'null' as it is null.",
        )
        .unwrap();
}

#[test]
fn test_destructuring_assignment() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json("let x = 1, y = 2; [x, y] = [y, x]; [x, y]", json!([2, 1]))
        .unwrap();
    harness
        .assert_evaluates_to_json(
            "const target = {}; let n; ({ n, m: target.m } = { n: 1, m: 2 }); [n, target]",
            json!([1, { "m": 2 }]),
        )
        .unwrap();
}

#[test]
fn test_member_assignment_on_arrays_and_functions() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const xs = [1]; xs[3] = 4; const len = xs.length; xs.length = 2; [len, xs]",
            json!([4, [1, null]]),
        )
        .unwrap();
    harness
        .assert_evaluates_to_number("function f() {} f.calls = 3; f.calls", 3.0)
        .unwrap();
    harness
        .assert_fails_with("const arr = []; arr.length = -1;", "RangeError: Invalid array length")
        .unwrap();
}

#[test]
fn test_reading_from_undefined_fails() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with(
            "const o = {}; o.deep.value",
            "TypeError: Cannot read properties of undefined (reading 'value')",
        )
        .unwrap();
}

#[test]
fn test_string_indexing() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const s = 'héllo'; [s.length, s[1], s[10]]",
            json!([5, "é", null]),
        )
        .unwrap();
}
