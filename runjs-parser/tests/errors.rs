// Parse error tests
// Syntax errors and builder-level rejections carry source text and spans

use runjs_parser::{parse_program, ParseError};

#[test]
fn test_syntax_error_carries_source() {
    let input = "let = ;";
    let error = parse_program(input).unwrap_err();

    match &error {
        ParseError::PestError { src, message, .. } => {
            assert_eq!(src, input);
            assert!(message.contains("line 1"), "message: {message}");
        }
        other => panic!("Expected syntax error, got: {:?}", other),
    }
}

#[test]
fn test_invalid_assignment_target() {
    let error = parse_program("1 = 2").unwrap_err();

    match &error {
        ParseError::InvalidAssignmentTarget { src, .. } => assert_eq!(src, "1 = 2"),
        other => panic!("Expected invalid assignment target, got: {:?}", other),
    }
    assert_eq!(error.span().start, 0);
}

#[test]
fn test_compound_assignment_cannot_destructure() {
    let error = parse_program("[a] += 1").unwrap_err();
    assert!(matches!(error, ParseError::InvalidAssignmentTarget { .. }));
}

#[test]
fn test_update_requires_reference() {
    let error = parse_program("5++").unwrap_err();
    assert!(matches!(error, ParseError::InvalidAssignmentTarget { .. }));
}

#[test]
fn test_try_without_handler_or_finalizer() {
    let error = parse_program("try { f() }").unwrap_err();
    assert!(matches!(error, ParseError::MissingCatchOrFinally { .. }));
}

#[test]
fn test_rest_parameter_must_be_last() {
    let error = parse_program("function f(...a, b) {}").unwrap_err();
    assert!(matches!(error, ParseError::InvalidRestElement { .. }));
}

#[test]
fn test_rest_binding_must_be_last() {
    let error = parse_program("let [...a, b] = c").unwrap_err();
    assert!(matches!(error, ParseError::InvalidRestElement { .. }));
}

#[test]
fn test_const_requires_initializer() {
    let error = parse_program("const a;").unwrap_err();
    assert!(matches!(error, ParseError::MissingConstInitializer { .. }));
}

#[test]
fn test_return_outside_function_is_rejected() {
    let error = parse_program("while (true) { return 1 }").unwrap_err();
    assert!(matches!(error, ParseError::ReturnOutsideFunction { .. }));
}

#[test]
fn test_return_inside_function_is_accepted() {
    let program = parse_program("function f() { if (x) return 1; return 2 }").unwrap();
    assert_eq!(program.body.len(), 1);
}

#[test]
fn test_invalid_escape_sequence() {
    let error = parse_program(r#"'\u12'"#).unwrap_err();
    assert!(matches!(error, ParseError::InvalidStringEscape { .. }));
}

#[test]
fn test_unterminated_string() {
    let error = parse_program("'abc").unwrap_err();
    assert!(matches!(error, ParseError::PestError { .. }));
}
