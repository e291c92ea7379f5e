// Integration tests for the G0 front end

use g0c::{
    parse_source, ErrorKind, LookupMode, Node, Options, Program, Scope, SymbolKind, TokenKind,
};

fn parse(source: &str) -> Program {
    parse_source(source, Options::default()).expect("Parsing failed")
}

fn parse_err(source: &str) -> g0c::ParseError {
    parse_source(source, Options::default()).expect_err("Parsing should fail")
}

#[test]
fn test_end_to_end_success() {
    let program = parse("int f(int x){ int y; y = x; return y; }");

    // Global function entry with arity 1
    let f = program
        .symbols
        .resolve("f", LookupMode::GlobalOnly)
        .expect("f should be global");
    assert_eq!(f.kind, SymbolKind::Function);
    assert_eq!(f.arity, 1);

    // The local y is gone after the function
    assert!(program
        .symbols
        .lookup("y", LookupMode::LocalThenGlobal)
        .is_none());
    assert!(!program.symbols.in_function_scope());

    // Body is a two-statement sequence: assignment, return
    let def = program.function("f").unwrap();
    let Node::FunctionDef { params, body, .. } = program.ast.node(def) else {
        panic!("Expected function definition");
    };
    assert_eq!(params.len(), 1);

    let statements: Vec<_> = program.ast.sequence(*body).collect();
    assert_eq!(statements.len(), 2);

    let Node::Assign { target, value } = program.ast.node(statements[0]) else {
        panic!("Expected assignment");
    };
    let Node::Ident { name, symbol } = program.ast.node(*target) else {
        panic!("Expected identifier target");
    };
    assert_eq!(name, "y");
    let y = program.symbols.get(symbol.unwrap());
    assert_eq!(y.kind, SymbolKind::Variable);
    assert_eq!(y.scope, Scope::Local);

    let Node::Ident { symbol: x, .. } = program.ast.node(*value) else {
        panic!("Expected identifier value");
    };
    assert_eq!(*x, Some(params[0]));

    let Node::Return { value: Some(ret) } = program.ast.node(statements[1]) else {
        panic!("Expected return with value");
    };
    assert!(matches!(program.ast.node(*ret), Node::Ident { .. }));
}

#[test]
fn test_end_to_end_failure_undefined() {
    let err = parse_err("int main(){\n  y = 1;\n}");

    assert_eq!(
        err.kind,
        ErrorKind::UndefinedSymbol {
            name: "y".to_string()
        }
    );
    assert_eq!(err.line, 2);
    assert_eq!(err.token, TokenKind::Ident);
    assert_eq!(err.lexeme, "y");

    let message = err.to_string();
    assert!(message.contains("line 2"));
    assert!(message.contains("identifier"));
    assert!(message.contains("'y'"));
}

#[test]
fn test_scope_isolation_between_functions() {
    let err = parse_err("int a() { int v; v = 1; }\nint b() { v = 2; }");
    assert_eq!(
        err.kind,
        ErrorKind::UndefinedSymbol {
            name: "v".to_string()
        }
    );
    assert_eq!(err.line, 2);
}

#[test]
fn test_shadowing_and_duplicates() {
    assert!(parse_source("int n; int f(int q) { int n; n = q; }", Options::default()).is_ok());

    let err = parse_err("int f() { int n, n; }");
    assert_eq!(
        err.kind,
        ErrorKind::DuplicateDeclaration {
            name: "n".to_string()
        }
    );

    let err = parse_err("int n;\nint n;");
    assert!(matches!(err.kind, ErrorKind::DuplicateDeclaration { .. }));
    assert_eq!(err.line, 2);
}

#[test]
fn test_arity_in_both_directions() {
    let decl = "int one(int a) { return a; }\n";

    assert!(parse_source(&format!("{decl}int main() {{ one(1); }}"), Options::default()).is_ok());

    let under = parse_err(&format!("{decl}int main() {{ one(); }}"));
    assert_eq!(
        under.kind,
        ErrorKind::ArityMismatch {
            name: "one".to_string(),
            expected: 1,
            found: 0
        }
    );

    let over = parse_err(&format!("{decl}int main() {{ one(1, 2); }}"));
    assert_eq!(
        over.kind,
        ErrorKind::ArityMismatch {
            name: "one".to_string(),
            expected: 1,
            found: 2
        }
    );
}

#[test]
fn test_dangling_else() {
    let program = parse(
        "int s1() { } int s2() { }
         int main(int c1, int c2) { if (c1 == 1) if (c2 == 1) s1(); else s2(); }",
    );

    let main = program.function("main").unwrap();
    let Node::FunctionDef { body, .. } = program.ast.node(main) else {
        panic!("Expected function definition");
    };
    let outer = program.ast.sequence(*body).next().unwrap();
    let Node::If {
        then_branch,
        else_branch: None,
        ..
    } = program.ast.node(outer)
    else {
        panic!("Outer if must not own the else");
    };
    let Node::If {
        else_branch: Some(else_branch),
        ..
    } = program.ast.node(*then_branch)
    else {
        panic!("Inner if must own the else");
    };
    let Node::Call { name, .. } = program.ast.node(*else_branch) else {
        panic!("Expected call");
    };
    assert_eq!(name, "s2");
}

#[test]
fn test_comments_are_invisible() {
    let program = parse(
        "/* header\n   spanning\n   lines */\nint g; /* trailing */\nint main() {\n  g = 1; /* x */ return g;\n}",
    );
    let main = program.function("main").unwrap();
    assert_eq!(program.ast.line(main), 5);

    let err = parse_err("/*\n\n*/ int main() { z = 1; }");
    assert_eq!(err.line, 3);
}

#[test]
fn test_unterminated_comment_is_not_a_comment() {
    // The opener is re-read as '/' and '*', which no statement accepts.
    let err = parse_err("int main() {\n /* never closed\n}");
    assert_eq!(err.token, TokenKind::Slash);
    assert_eq!(err.line, 2);
}

#[test]
fn test_lexical_error() {
    let err = parse_err("int main() { int a; a = 1 & 2; }");
    assert_eq!(err.kind, ErrorKind::Lexical);
    assert_eq!(err.lexeme, "&");
}

#[test]
fn test_recursion_and_globals() {
    let program = parse(
        "int count;
         int fact(int n) {
             if (n <= 1) return 1;
             count = count + 1;
             return n * fact(n - 1);
         }
         int main() { count = 0; fact(5); return count; }",
    );

    let globals: Vec<_> = program
        .symbols
        .globals()
        .map(|(_, s)| (s.name.as_str(), s.kind, s.arity))
        .collect();
    assert_eq!(
        globals,
        vec![
            ("count", SymbolKind::Variable, 0),
            ("fact", SymbolKind::Function, 1),
            ("main", SymbolKind::Function, 0),
        ]
    );
    assert_eq!(program.functions().count(), 2);
}

#[test]
fn test_call_before_definition_is_undefined() {
    let err = parse_err("int main() { later(); }\nint later() { }");
    assert_eq!(
        err.kind,
        ErrorKind::UndefinedSymbol {
            name: "later".to_string()
        }
    );
}

#[test]
fn test_semantic_checks_disabled() {
    let options = Options {
        check_semantics: false,
    };
    let program = parse_source(
        "int main() { y = 1; y(1, 2, 3); main(7); }\nint main() { }",
        options,
    )
    .expect("grammar-only parse should accept");
    assert_eq!(program.functions().count(), 2);

    // Syntax is still enforced
    let err = parse_source("int main() { y = ; }", options).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Syntax { .. }));
}

#[test]
fn test_deep_nesting_is_a_diagnostic() {
    let depth = 3000;
    let source = format!(
        "int f(int r) {{ r = {}1{}; }}",
        "(".repeat(depth),
        ")".repeat(depth)
    );
    let err = parse_err(&source);
    assert_eq!(
        err.kind,
        ErrorKind::NestingTooDeep {
            limit: g0c::MAX_NESTING_DEPTH
        }
    );
    assert_eq!(
        err.to_string(),
        format!(
            "error at line 1, token '(', lexeme '(': nesting deeper than {} levels",
            g0c::MAX_NESTING_DEPTH
        )
    );
}
