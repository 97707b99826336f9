//! Declarations, shadowing and hoisting

use crate::{run_source, ErrorKind, RuntimeError, ScriptSession};
use serde_json::json;

#[test]
fn test_duplicate_let_in_same_scope_fails() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with(
            "let a = 1; let a = 2;",
            "SyntaxError: Identifier 'a' has already been declared",
        )
        .unwrap();
}

#[test]
fn test_shadowing_in_nested_block() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            "let a = 1; let seen; { let a = 2; seen = a; } [a, seen]",
            json!([1, 2]),
        )
        .unwrap();
}

#[test]
fn test_var_is_visible_after_block() {
    let mut harness = ScriptSession::new().unwrap();

    harness.assert_evaluates_to_number("{ var a = 1; } a", 1.0).unwrap();
    harness.assert_evaluates_to_number("a = a + 1; a", 2.0).unwrap();
}

#[test]
fn test_var_inside_function_stays_local() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .evaluate("function f() { if (true) { var inner = 5; } return inner; }")
        .unwrap();
    harness.assert_evaluates_to_number("f()", 5.0).unwrap();

    let error = harness.evaluate_error("inner").unwrap();
    assert_eq!(error.kind(), ErrorKind::ReferenceError);
}

#[test]
fn test_var_redeclaration_keeps_value() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json("var v = 1; var v; var w = 2; var w = 3; [v, w]", json!([1, 3]))
        .unwrap();
}

#[test]
fn test_block_scoped_let_is_not_visible_outside() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with("{ let hidden = 1; } hidden", "ReferenceError: hidden is not defined")
        .unwrap();
}

#[test]
fn test_assignment_to_const_fails() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with("const a = 1; a = 2;", "TypeError: Assignment to constant variable.")
        .unwrap();
}

#[test]
fn test_const_objects_stay_mutable() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json("const o = { n: 1 }; o.n += 1; o", json!({ "n": 2 }))
        .unwrap();
}

#[test]
fn test_assignment_to_undeclared_fails() {
    let mut harness = ScriptSession::new().unwrap();

    let error = harness.evaluate_error("ghost = 1;").unwrap();
    assert_eq!(error.kind(), ErrorKind::ReferenceError);
}

#[test]
fn test_function_declarations_are_hoisted() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_number(
            "const r = twice(4); function twice(n) { return n * 2; } r",
            8.0,
        )
        .unwrap();
}

#[test]
fn test_globals_can_be_shadowed_and_reassigned() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_number("{ const Math = 3; Math + 1 }", 4.0)
        .unwrap();
    harness
        .assert_evaluates_to_string("parseInt = () => 'replaced'; parseInt('1')", "replaced")
        .unwrap();
}

#[test]
fn test_typeof_undeclared_identifier() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_string("typeof notDeclared", "undefined")
        .unwrap();
    harness
        .assert_fails_with("notDeclared", "ReferenceError: notDeclared is not defined")
        .unwrap();
}

#[test]
fn test_top_level_this_is_undefined() {
    let mut harness = ScriptSession::new().unwrap();

    harness.assert_evaluates_to_undefined("this").unwrap();
    harness
        .assert_evaluates_to_string("function f() { return typeof this; } f()", "undefined")
        .unwrap();
}

#[test]
fn test_function_declaration_cannot_replace_lexical_bindings() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_fails_with(
            "const c = 1; function c() {}",
            "SyntaxError: Identifier 'c' has already been declared",
        )
        .unwrap();

    harness.evaluate("let counter = 1;").unwrap();
    let error = harness.evaluate_error("function counter() {}").unwrap();
    assert_eq!(error.kind(), ErrorKind::SyntaxError);
    harness.assert_evaluates_to_number("counter", 1.0).unwrap();
}

#[test]
fn test_function_declaration_cannot_replace_host_binding() {
    let error = run_source("function $runjs() { return 1; }").unwrap_err();

    assert!(matches!(
        error,
        RuntimeError::DuplicateDeclaration { ref name, .. } if name == "$runjs"
    ));
}

#[test]
fn test_function_declaration_replaces_var_and_parameter() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            var v = 1;
            function v() {}
            function f(x) { function x() {} return typeof x; }
            [typeof v, f(1)]
            "#,
            json!(["number", "function"]),
        )
        .unwrap();
}

#[test]
fn test_closure_records_are_reclaimed_after_use() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .evaluate("for (let i = 0; i < 2000; i++) { [1].map(x => x); }")
        .unwrap();

    assert_eq!(harness.interpreter().environments().len(), 1);
}

#[test]
fn test_records_holding_their_own_closures_are_reclaimed() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .evaluate(
            r#"
            function outer(n) {
                function inner() { return n; }
                const named = function self() { return self; };
                return inner() + (named() === named ? 1 : 0);
            }
            let total = 0;
            for (let i = 0; i < 2000; i++) { total += outer(i); }
            "#,
        )
        .unwrap();

    assert!(harness.interpreter().environments().len() < 200);
    harness.assert_evaluates_to_number("total", 2_001_000.0).unwrap();
}

#[test]
fn test_captured_records_survive_their_scope() {
    let mut harness = ScriptSession::new().unwrap();

    harness
        .assert_evaluates_to_json(
            r#"
            const ids = [];
            for (let i = 0; i < 100; i++) ids.push(i);
            const kept = [];
            for (const id of ids) { kept.push(() => id); [id].map(x => x); }
            function churn() { function inner() {} return inner; }
            for (let j = 0; j < 500; j++) churn();
            kept.filter((f, index) => f() === index).length
            "#,
            json!(100),
        )
        .unwrap();

    assert!(harness.interpreter().environments().len() > 100);
}
