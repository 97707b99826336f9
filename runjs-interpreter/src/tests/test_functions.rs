//! Calls, parameters, closures, `this` and construction

use crate::{ErrorKind, RunOptions, ScriptSession};
use serde_json::json;

#[test]
fn test_default_parameter_with_explicit_undefined() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "function f(x, y = 5, z) { return [x, y, z]; } f(2, undefined, 3)",
            json!([2, 5, 3]),
        )
        .unwrap();
}

#[test]
fn test_defaults_see_earlier_parameters() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "function area(w, h = w * 2) { return w * h; } [area(3), area(3, 1)]",
            json!([18, 3]),
        )
        .unwrap();
}

#[test]
fn test_rest_parameter_and_arguments() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "function g(first, ...values) { return [first, values, arguments.length, arguments[2]]; } g(1, 2, 3)",
            json!([1, [2, 3], 3, 3]),
        )
        .unwrap();
    harness
        .assert_evaluates_to_json("const h = (...all) => all; h()", json!([]))
        .unwrap();
}

#[test]
fn test_arrow_functions_do_not_bind_arguments() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_number(
            "function outer() { const inner = () => arguments[0]; return inner(9); } outer(4)",
            4.0,
        )
        .unwrap();
}

#[test]
fn test_destructured_parameters() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_string(
            "function greet({ name, greeting = 'hi' }, [punct]) { return `${greeting} ${name}${punct}`; } greet({ name: 'Ann' }, ['!'])",
            "hi Ann!",
        )
        .unwrap();
}

#[test]
fn test_expression_bodied_arrows() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json("const pair = (a, b) => [a, b]; pair(1, 2)", json!([1, 2]))
        .unwrap();
    harness
        .assert_evaluates_to_json("const wrap = v => ({ v }); wrap(3)", json!({ "v": 3 }))
        .unwrap();
}

#[test]
fn test_missing_return_yields_undefined() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_undefined("function nothing() { 1 + 1; } nothing()")
        .unwrap();
}

#[test]
fn test_closures_share_captured_bindings() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .evaluate(
            r#"
            function counter() {
                let count = 0;
                return { inc: () => ++count, get: () => count };
            }
            const c = counter();
            "#,
        )
        .unwrap();

    harness.assert_evaluates_to_number("c.inc(); c.inc(); c.get()", 2.0).unwrap();
    harness
        .assert_evaluates_to_number("const d = counter(); d.inc(); c.get() + d.get()", 3.0)
        .unwrap();
}

#[test]
fn test_named_function_expression_can_recurse() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "const fact = function self(n) { return n <= 1 ? 1 : n * self(n - 1); }; [fact(5), typeof self]",
            json!([120, "undefined"]),
        )
        .unwrap();
}

#[test]
fn test_function_names() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "function decl() {} const arrow = () => {}; const o = { method() {} }; [decl.name, arrow.name, o.method.name, decl.length]",
            json!(["decl", "arrow", "method", 0]),
        )
        .unwrap();
}

#[test]
fn test_method_calls_bind_this() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const o = {
                n: 3,
                get() { return this.n; },
                later() { return [1, 2].map(x => x * this.n); },
            };
            [o.get(), o.later()]
            "#,
            json!([3, [3, 6]]),
        )
        .unwrap();
}

#[test]
fn test_call_apply_bind() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .evaluate("function describe(greeting, mark) { return greeting + ' ' + this.name + mark; }")
        .unwrap();
    harness
        .assert_evaluates_to_json(
            r#"
            const who = { name: 'Ada' };
            [
                describe.call(who, 'hello', '!'),
                describe.apply(who, ['hey', '?']),
                describe.bind(who, 'yo')('.'),
            ]
            "#,
            json!(["hello Ada!", "hey Ada?", "yo Ada."]),
        )
        .unwrap();
}

#[test]
fn test_new_with_prototype_methods() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            function Point(x, y) { this.x = x; this.y = y; }
            Point.prototype.sum = function () { return this.x + this.y; };
            const p = new Point(2, 3);
            [p.sum(), p instanceof Point, {} instanceof Point, p]
            "#,
            json!([5, true, false, { "x": 2, "y": 3 }]),
        )
        .unwrap();
}

#[test]
fn test_constructor_returning_object_replaces_instance() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "function Box() { this.ignored = true; return { replaced: true }; } new Box()",
            json!({ "replaced": true }),
        )
        .unwrap();
}

#[test]
fn test_arrow_is_not_a_constructor() {
    let mut harness = ScriptSession::new().unwrap();

    let error = harness.evaluate_error("const A = () => {}; new A();").unwrap();
    assert_eq!(error.kind(), ErrorKind::TypeError);
}

#[test]
fn test_calling_a_non_function() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with("const o = { n: 1 }; o.n();", "TypeError: o.n is not a function")
        .unwrap();
    harness
        .assert_fails_with("o.missing();", "TypeError: o.missing is not a function")
        .unwrap();
}

#[test]
fn test_call_depth_limit_is_catchable() {
    let mut harness = ScriptSession::with_options(RunOptions {
        max_call_depth: 50,
        ..RunOptions::default()
    })
    .unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            function dive(n) { return dive(n + 1); }
            let outcome;
            try { dive(0); } catch (e) { outcome = [e.name, e.message]; }
            outcome
            "#,
            json!(["RangeError", "Maximum call stack size exceeded"]),
        )
        .unwrap();

    harness
        .assert_evaluates_to_number(
            "function down(n) { return n === 0 ? 0 : 1 + down(n - 1); } down(40)",
            40.0,
        )
        .unwrap();
}

#[test]
fn test_deep_recursion_within_default_limit() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_number(
            "function sum(n) { return n === 0 ? 0 : n + sum(n - 1); } sum(800)",
            320_400.0,
        )
        .unwrap();
}
