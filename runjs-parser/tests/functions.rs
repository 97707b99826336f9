// Function and pattern parsing tests
// Declarations, arrows, default/rest parameters and destructuring bindings

use pretty_assertions::assert_eq;
use runjs_parser::{ast::*, parse_expression, parse_program};

fn extract_function(expr: &Expression) -> &Function {
    match &expr.kind {
        ExpressionKind::Function(function) => function,
        other => panic!("Expected function, got: {:?}", other),
    }
}

fn pattern_name(pattern: &Pattern) -> &str {
    match &pattern.kind {
        PatternKind::Identifier(identifier) => &identifier.name,
        other => panic!("Expected identifier pattern, got: {:?}", other),
    }
}

#[test]
fn test_function_declaration() {
    let program = parse_program("function add(a, b) { return a + b }").unwrap();

    let StatementKind::FunctionDeclaration(function) = &program.body[0].kind else {
        panic!("Expected function declaration");
    };
    assert_eq!(function.kind, FunctionKind::Declaration);
    assert_eq!(function.name(), Some("add"));
    assert_eq!(function.params.len(), 2);
    match &function.body {
        FunctionBody::Block(block) => {
            assert!(matches!(block.body[0].kind, StatementKind::Return(Some(_))))
        }
        other => panic!("Expected block body, got: {:?}", other),
    }
}

#[test]
fn test_default_and_rest_parameters() {
    let program = parse_program("function f(x, y = 5, ...rest) {}").unwrap();

    let StatementKind::FunctionDeclaration(function) = &program.body[0].kind else {
        panic!("Expected function declaration");
    };
    assert_eq!(pattern_name(&function.params[0]), "x");
    match &function.params[1].kind {
        PatternKind::Assignment(assignment) => {
            assert_eq!(pattern_name(&assignment.target), "y");
            assert!(matches!(assignment.default.kind, ExpressionKind::Number(n) if n == 5.0));
        }
        other => panic!("Expected default parameter, got: {:?}", other),
    }
    match &function.params[2].kind {
        PatternKind::Rest(target) => assert_eq!(pattern_name(target), "rest"),
        other => panic!("Expected rest parameter, got: {:?}", other),
    }
    assert_eq!(function.arity(), 1);
}

#[test]
fn test_named_function_expression() {
    let expr = parse_expression("(function fact(n) { return n })").unwrap();
    let function = extract_function(&expr);

    assert_eq!(function.kind, FunctionKind::Expression);
    assert_eq!(function.name(), Some("fact"));
}

#[test]
fn test_arrow_with_single_parameter_and_expression_body() {
    let expr = parse_expression("x => x * 2").unwrap();
    let function = extract_function(&expr);

    assert!(function.is_arrow());
    assert_eq!(pattern_name(&function.params[0]), "x");
    assert!(matches!(function.body, FunctionBody::Expression(_)));
}

#[test]
fn test_arrow_with_parameter_list_and_block_body() {
    let expr = parse_expression("(a, b = 1) => { return a + b }").unwrap();
    let function = extract_function(&expr);

    assert_eq!(function.params.len(), 2);
    assert!(matches!(function.body, FunctionBody::Block(_)));
}

#[test]
fn test_arrow_returning_object_literal() {
    let expr = parse_expression("() => ({ a: 1 })").unwrap();
    let function = extract_function(&expr);

    match &function.body {
        FunctionBody::Expression(body) => assert!(matches!(body.kind, ExpressionKind::Object(_))),
        other => panic!("Expected expression body, got: {:?}", other),
    }
}

#[test]
fn test_arrow_as_call_argument() {
    let expr = parse_expression("items.map((item, i) => item + i)").unwrap();

    match &expr.kind {
        ExpressionKind::Call(call) => match &call.arguments[0] {
            Argument::Expression(argument) => assert!(extract_function(argument).is_arrow()),
            other => panic!("Expected expression argument, got: {:?}", other),
        },
        other => panic!("Expected call, got: {:?}", other),
    }
}

#[test]
fn test_object_literal_members() {
    let expr =
        parse_expression("({ a: 1, 'b c': 2, 3: x, [k]: y, short, m() { return 1 }, ...rest })")
            .unwrap();

    let ExpressionKind::Object(members) = &expr.kind else {
        panic!("Expected object literal, got: {:?}", expr.kind);
    };
    assert_eq!(members.len(), 7);

    let keys: Vec<String> = members
        .iter()
        .filter_map(|member| match member {
            ObjectMember::Property { key: PropertyKey::Static(name), .. } => Some(name.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec!["a", "b c", "short", "m"]);

    assert!(matches!(
        members[2],
        ObjectMember::Property { key: PropertyKey::Number(n), .. } if n == 3.0
    ));
    assert!(matches!(
        members[3],
        ObjectMember::Property { key: PropertyKey::Computed(_), .. }
    ));
    assert!(matches!(members[6], ObjectMember::Spread(_)));
}

#[test]
fn test_array_literal_holes_and_spread() {
    let expr = parse_expression("[1, , ...xs, 4,]").unwrap();

    let ExpressionKind::Array(elements) = &expr.kind else {
        panic!("Expected array literal, got: {:?}", expr.kind);
    };
    assert_eq!(elements.len(), 4);
    assert!(matches!(elements[1], ArrayElement::Hole));
    assert!(matches!(elements[2], ArrayElement::Spread(_)));
}

#[test]
fn test_empty_array_literal() {
    let expr = parse_expression("[]").unwrap();

    match &expr.kind {
        ExpressionKind::Array(elements) => assert!(elements.is_empty()),
        other => panic!("Expected array literal, got: {:?}", other),
    }
}

#[test]
fn test_array_destructuring_declaration() {
    let program = parse_program("const [a, , [b, c] = [], ...rest] = values;").unwrap();

    let StatementKind::VariableDeclaration(declaration) = &program.body[0].kind else {
        panic!("Expected variable declaration");
    };
    let PatternKind::Array(array) = &declaration.declarations[0].id.kind else {
        panic!("Expected array pattern");
    };

    assert_eq!(array.elements.len(), 4);
    assert!(array.elements[1].is_none());
    assert!(matches!(
        array.elements[2].as_ref().unwrap().kind,
        PatternKind::Assignment(_)
    ));
    assert!(matches!(array.elements[3].as_ref().unwrap().kind, PatternKind::Rest(_)));
}

#[test]
fn test_object_destructuring_declaration() {
    let program = parse_program("let { a, b: renamed, c = 3, ...others } = source;").unwrap();

    let StatementKind::VariableDeclaration(declaration) = &program.body[0].kind else {
        panic!("Expected variable declaration");
    };
    let PatternKind::Object(object) = &declaration.declarations[0].id.kind else {
        panic!("Expected object pattern");
    };

    assert_eq!(object.properties.len(), 3);
    assert!(matches!(&object.properties[0].key, PropertyKey::Static(name) if name == "a"));
    assert_eq!(pattern_name(&object.properties[1].value), "renamed");
    assert!(matches!(object.properties[2].value.kind, PatternKind::Assignment(_)));
    assert_eq!(pattern_name(object.rest.as_ref().unwrap()), "others");
}

#[test]
fn test_template_literal_segments() {
    let expr = parse_expression("`a${1 + 1}b${`nested ${x}`}\\n`").unwrap();

    let ExpressionKind::Template(template) = &expr.kind else {
        panic!("Expected template literal, got: {:?}", expr.kind);
    };
    assert_eq!(template.quasis, vec!["a", "b", "\n"]);
    assert_eq!(template.expressions.len(), 2);
    assert!(matches!(template.expressions[1].kind, ExpressionKind::Template(_)));
}

#[test]
fn test_number_and_string_literals() {
    let cases = [("42", 42.0), ("3.5", 3.5), (".5", 0.5), ("1e3", 1000.0), ("0xff", 255.0)];

    for (input, expected) in cases {
        match parse_expression(input).unwrap().kind {
            ExpressionKind::Number(value) => assert_eq!(value, expected, "input: {input}"),
            other => panic!("Expected number for {input}, got: {:?}", other),
        }
    }

    match parse_expression(r#"'it\'s' + "A""#).unwrap().kind {
        ExpressionKind::Binary(binary) => {
            assert_eq!(binary.left.kind, ExpressionKind::String("it's".to_string()));
            assert_eq!(binary.right.kind, ExpressionKind::String("A".to_string()));
        }
        other => panic!("Expected binary, got: {:?}", other),
    }
}
