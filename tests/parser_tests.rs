// tests/parser_tests.rs

use sqi::ast::Symbol;
use sqi::lexer::lex;
use serde_json::json;
use sqi::parser::{MAX_DEPTH, ParseError, parse};
use sqi::{CompileError, EvalOptions, compile};

fn tree(input: &str) -> Result<String, ParseError> {
    let tokens = lex(input).unwrap_or_else(|e| panic!("lex {:?}: {}", input, e));
    parse(tokens).map(|tree| tree.to_string())
}

// ============================================================================
// Shapes
// ============================================================================

#[test]
fn test_parse_shapes() {
    let test_cases = vec![
        ("a", "a"),
        ("/a/b", "(/ (/ a) b)"),
        ("/a/b/c", "(/ (/ (/ a) b) c)"),
        ("/a/b == c", "(== (/ (/ a) b) c)"),
        ("(a)", "(group a)"),
        ("(/a/b) == c", "(== (group (/ (/ a) b)) c)"),
        ("/a/b == 10", "(== (/ (/ a) b) 10)"),
        ("/a/b == 5.5", "(== (/ (/ a) b) 5.5)"),
        ("a == b || c == d", "(|| (== a b) (== c d))"),
        (
            "(a == b) || (c == d)",
            "(|| (group (== a b)) (group (== c d)))",
        ),
        (
            "/a == /b || /c == /d",
            "(|| (== (/ a) (/ b)) (== (/ c) (/ d)))",
        ),
        ("a[0]", "(index a 0)"),
        ("/a[0]", "(index (/ a) 0)"),
        ("/a[0]/b", "(/ (index (/ a) 0) b)"),
        ("/a/b[0]", "(index (/ (/ a) b) 0)"),
        ("/a/(/b == c)", "(/ (/ a) (group (== (/ b) c)))"),
        ("[1]", "(index 1)"),
        (r#"([1]) == "b""#, r#"(== (group (index 1)) "b")"#),
        (r#"/"a/b""#, r#"(/ "a/b")"#),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tree(input).unwrap(), expected, "input: {:?}", input);
    }
}

// ============================================================================
// Precedence and Associativity
// ============================================================================

#[test]
fn test_precedence() {
    let test_cases = vec![
        // Path binds tighter than index, index tighter than comparison
        ("/a/b[0] == 1", "(== (index (/ (/ a) b) 0) 1)"),
        ("a = 1", "(= a 1)"),
        ("a = b == c", "(== (= a b) c)"),
        ("a == b && c != d", "(&& (== a b) (!= c d))"),
        // Equal binding power is left-associative
        ("a == b == c", "(== (== a b) c)"),
        ("a || b && c", "(&& (|| a b) c)"),
        ("a && (b || c)", "(&& a (group (|| b c)))"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tree(input).unwrap(), expected, "input: {:?}", input);
    }
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_parse_errors() {
    let test_cases = vec![
        ("", ParseError::Empty),
        ("/", ParseError::PrematureEnd),
        ("a ==", ParseError::PrematureEnd),
        (
            "(a[0]",
            ParseError::MissingClose {
                open: Symbol::Open,
                found: None,
            },
        ),
        (
            "(a]",
            ParseError::MissingClose {
                open: Symbol::Open,
                found: Some("]".to_string()),
            },
        ),
        (
            "[a",
            ParseError::MissingClose {
                open: Symbol::OpenArray,
                found: None,
            },
        ),
        (")", ParseError::UnmatchedClose { close: Symbol::Close }),
        ("a)", ParseError::UnmatchedClose { close: Symbol::Close }),
        (
            "/a]",
            ParseError::UnmatchedClose {
                close: Symbol::CloseArray,
            },
        ),
        (
            "a b",
            ParseError::UnexpectedToken {
                text: "b".to_string(),
            },
        ),
        (
            "== a",
            ParseError::UnexpectedToken {
                text: "==".to_string(),
            },
        ),
    ];

    for (input, expected) in test_cases {
        assert_eq!(tree(input), Err(expected), "input: {:?}", input);
    }
}

#[test]
fn test_error_messages() {
    assert_eq!(
        tree("(a[0]").unwrap_err().to_string(),
        "Missing ')' for '('"
    );
    assert_eq!(
        tree("(a]").unwrap_err().to_string(),
        "Missing ')' for '(', found ']'"
    );
    assert_eq!(tree("a)").unwrap_err().to_string(), "Unmatched ')'");
    assert_eq!(tree("").unwrap_err().to_string(), "Empty expression");
}

// ============================================================================
// Nesting limit
// ============================================================================

#[test]
fn test_nesting_limit() {
    let too_deep = ParseError::TooDeep { limit: MAX_DEPTH };

    let groups = format!("{}/a{}", "(".repeat(3000), ")".repeat(3000));
    assert_eq!(tree(&groups), Err(too_deep.clone()));

    let long_path = "/a".repeat(3000);
    assert_eq!(tree(&long_path), Err(too_deep.clone()));

    let filters = format!("{}/a == 1{}", "/b/(".repeat(2000), ")".repeat(2000));
    assert_eq!(
        compile(&filters),
        Err(CompileError::Parse(too_deep.clone()))
    );

    assert_eq!(
        tree(&groups).unwrap_err().to_string(),
        "Expression nested too deeply (limit 256)"
    );
}

#[test]
fn test_moderate_nesting_evaluates() {
    let expression = format!("{}/a{}", "(".repeat(100), ")".repeat(100));
    let input = json!({"a": 7});
    let expr = compile(&expression).unwrap();
    assert_eq!(
        expr.eval(&input, &EvalOptions::default()).unwrap().as_int(),
        Some(7)
    );

    let long_path = format!("/a{}", "/b".repeat(100));
    assert!(compile(&long_path).is_ok());
}
