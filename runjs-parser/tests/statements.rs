// Statement parsing tests
// Declarations, loops, switch, try/catch/finally and semicolon handling

use pretty_assertions::assert_eq;
use runjs_parser::{ast::*, parse_program};

fn extract_declaration(statement: &Statement) -> &VariableDeclaration {
    match &statement.kind {
        StatementKind::VariableDeclaration(declaration) => declaration,
        other => panic!("Expected variable declaration, got: {:?}", other),
    }
}

fn pattern_name(pattern: &Pattern) -> &str {
    match &pattern.kind {
        PatternKind::Identifier(identifier) => &identifier.name,
        other => panic!("Expected identifier pattern, got: {:?}", other),
    }
}

#[test]
fn test_variable_declaration_kinds() {
    let program = parse_program("var a = 1; let b; const c = 3;").unwrap();
    assert_eq!(program.body.len(), 3);

    let kinds: Vec<DeclarationKind> = program
        .body
        .iter()
        .map(|statement| extract_declaration(statement).kind)
        .collect();
    assert_eq!(
        kinds,
        vec![DeclarationKind::Var, DeclarationKind::Let, DeclarationKind::Const]
    );

    let b = &extract_declaration(&program.body[1]).declarations[0];
    assert_eq!(pattern_name(&b.id), "b");
    assert!(b.init.is_none());
}

#[test]
fn test_multiple_declarators() {
    let program = parse_program("let a = 1, b = 2, c").unwrap();
    let declaration = extract_declaration(&program.body[0]);

    let names: Vec<&str> = declaration
        .declarations
        .iter()
        .map(|declarator| pattern_name(&declarator.id))
        .collect();
    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn test_statements_without_semicolons() {
    let input = "let a = 1\nlet b = 2\na + b";
    let program = parse_program(input).unwrap();

    assert_eq!(program.body.len(), 3);
    assert!(matches!(program.body[2].kind, StatementKind::Expression(_)));
}

#[test]
fn test_comments_are_ignored() {
    let input = "// leading\nlet a = 1; /* block\ncomment */ a";
    let program = parse_program(input).unwrap();

    assert_eq!(program.body.len(), 2);
}

#[test]
fn test_if_else_chain() {
    let program = parse_program("if (a) { b } else if (c) d; else e;").unwrap();

    let StatementKind::If(outer) = &program.body[0].kind else {
        panic!("Expected if statement");
    };
    assert!(matches!(outer.consequent.kind, StatementKind::Block(_)));
    let alternate = outer.alternate.as_ref().unwrap();
    match &alternate.kind {
        StatementKind::If(inner) => assert!(inner.alternate.is_some()),
        other => panic!("Expected nested if, got: {:?}", other),
    }
}

#[test]
fn test_classic_for_loop() {
    let program = parse_program("for (let i = 1; i <= 3; i++) { r += i }").unwrap();

    let StatementKind::For(for_statement) = &program.body[0].kind else {
        panic!("Expected for statement");
    };
    match &for_statement.init {
        Some(ForInit::Declaration(declaration)) => {
            assert_eq!(declaration.kind, DeclarationKind::Let)
        }
        other => panic!("Expected declaration init, got: {:?}", other),
    }
    assert!(for_statement.test.is_some());
    assert!(for_statement.update.is_some());
}

#[test]
fn test_for_loop_with_empty_clauses() {
    let program = parse_program("for (;;) { break; }").unwrap();

    let StatementKind::For(for_statement) = &program.body[0].kind else {
        panic!("Expected for statement");
    };
    assert!(for_statement.init.is_none());
    assert!(for_statement.test.is_none());
    assert!(for_statement.update.is_none());
}

#[test]
fn test_for_of_with_declaration() {
    let program = parse_program("for (const item of items) total += item;").unwrap();

    let StatementKind::ForOf(each) = &program.body[0].kind else {
        panic!("Expected for-of statement");
    };
    match &each.left {
        ForEachTarget::Declaration { kind, pattern } => {
            assert_eq!(*kind, DeclarationKind::Const);
            assert_eq!(pattern_name(pattern), "item");
        }
        other => panic!("Expected declaration target, got: {:?}", other),
    }
}

#[test]
fn test_for_in_with_existing_target() {
    let program = parse_program("for (key in obj) {}").unwrap();

    let StatementKind::ForIn(each) = &program.body[0].kind else {
        panic!("Expected for-in statement");
    };
    match &each.left {
        ForEachTarget::Pattern(pattern) => assert_eq!(pattern_name(pattern), "key"),
        other => panic!("Expected pattern target, got: {:?}", other),
    }
}

#[test]
fn test_for_of_with_destructuring() {
    let program = parse_program("for (const [k, v] of pairs) {}").unwrap();

    let StatementKind::ForOf(each) = &program.body[0].kind else {
        panic!("Expected for-of statement");
    };
    match &each.left {
        ForEachTarget::Declaration { pattern, .. } => {
            assert!(matches!(pattern.kind, PatternKind::Array(_)))
        }
        other => panic!("Expected declaration target, got: {:?}", other),
    }
}

#[test]
fn test_while_and_do_while() {
    let program = parse_program("while (x) x--; do { x++ } while (x < 3);").unwrap();

    assert!(matches!(program.body[0].kind, StatementKind::While(_)));
    assert!(matches!(program.body[1].kind, StatementKind::DoWhile(_)));
}

#[test]
fn test_switch_with_default_in_middle() {
    let input = "switch (x) { case 1: a(); default: b(); break; case 2: c() }";
    let program = parse_program(input).unwrap();

    let StatementKind::Switch(switch) = &program.body[0].kind else {
        panic!("Expected switch statement");
    };
    assert_eq!(switch.cases.len(), 3);
    assert!(switch.cases[0].test.is_some());
    assert!(switch.cases[1].test.is_none());
    assert_eq!(switch.cases[1].consequent.len(), 2);
    assert!(matches!(switch.cases[1].consequent[1].kind, StatementKind::Break));
}

#[test]
fn test_try_catch_finally() {
    let program = parse_program("try { f() } catch (e) { g(e) } finally { h() }").unwrap();

    let StatementKind::Try(try_statement) = &program.body[0].kind else {
        panic!("Expected try statement");
    };
    let handler = try_statement.handler.as_ref().unwrap();
    assert_eq!(pattern_name(handler.param.as_ref().unwrap()), "e");
    assert!(try_statement.finalizer.is_some());
}

#[test]
fn test_catch_without_binding() {
    let program = parse_program("try { f() } catch { g() }").unwrap();

    let StatementKind::Try(try_statement) = &program.body[0].kind else {
        panic!("Expected try statement");
    };
    assert!(try_statement.handler.as_ref().unwrap().param.is_none());
    assert!(try_statement.finalizer.is_none());
}

#[test]
fn test_throw_statement() {
    let program = parse_program("throw new Error('boom');").unwrap();

    match &program.body[0].kind {
        StatementKind::Throw(expr) => assert!(matches!(expr.kind, ExpressionKind::New(_))),
        other => panic!("Expected throw, got: {:?}", other),
    }
}

#[test]
fn test_empty_and_block_statements() {
    let program = parse_program(";{ let a = 1; }").unwrap();

    assert!(matches!(program.body[0].kind, StatementKind::Empty));
    match &program.body[1].kind {
        StatementKind::Block(block) => assert_eq!(block.body.len(), 1),
        other => panic!("Expected block, got: {:?}", other),
    }
}

#[test]
fn test_source_file_is_recorded() {
    let options = runjs_parser::ParseOptions {
        source_file: Some("script.js".to_string()),
        ..Default::default()
    };
    let program = runjs_parser::parse_program_with_options("1", &options).unwrap();

    assert_eq!(program.source_file.as_deref(), Some("script.js"));
}

#[test]
fn test_top_level_return_when_allowed() {
    let options = runjs_parser::ParseOptions {
        allow_return_outside_function: true,
        ..Default::default()
    };
    let program =
        runjs_parser::parse_program_with_options("if (x) { return 1 }", &options).unwrap();

    assert_eq!(program.body.len(), 1);
}
