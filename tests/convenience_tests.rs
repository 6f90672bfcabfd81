// tests/convenience_tests.rs

use std::collections::HashMap;

use serde_json::json;
use sqi::convenience::Error;
use sqi::{
    CompileError, EvalError, EvalOptions, ParseError, eval, eval_bool, eval_float, eval_int,
    eval_string, eval_string_map, record,
};

struct Metric {
    level: f64,
}

record!(Metric { Level => level });

#[derive(Default)]
struct Person {
    name: String,
    age: i64,
}

record!(Person { Name => name, Age => age });

fn no_options() -> EvalOptions {
    EvalOptions::default()
}

// ============================================================================
// Typed helpers
// ============================================================================

#[test]
fn test_eval_float() {
    let input = Metric { level: 46.8 };
    let test_cases = vec![
        ("/Level", no_options(), 46.8),
        ("/NoLevel", no_options(), 0.0),
        ("/ErrorLevel", no_options().with_on_error(10.0), 10.0),
    ];

    for (expr, options, expected) in test_cases {
        assert_eq!(eval_float(expr, &input, &options), expected, "{}", expr);
    }

    // Integers widen
    assert_eq!(eval_float("/Age", &json!({"Age": 3}), &no_options()), 3.0);
}

#[test]
fn test_eval_int() {
    let input = Person {
        age: 32,
        ..Person::default()
    };
    let test_cases = vec![
        ("/Age", no_options(), 32),
        ("/NoAge", no_options(), 0),
        ("/ErrorAge", no_options().with_on_error(10), 10),
    ];

    for (expr, options, expected) in test_cases {
        assert_eq!(eval_int(expr, &input, &options), expected, "{}", expr);
    }

    // Floats are not truncated
    let metric = Metric { level: 2.5 };
    assert_eq!(eval_int("/Level", &metric, &no_options().with_on_error(-1)), -1);
}

#[test]
fn test_eval_string() {
    let input = Person {
        name: "Ana".into(),
        ..Person::default()
    };
    let test_cases = vec![
        ("/Name", no_options(), "Ana"),
        ("/NoName", no_options(), ""),
        ("/ErrorName", no_options().with_on_error("zip"), "zip"),
        ("/Age", no_options().with_on_error("zip"), "zip"),
        ("/Name ==", no_options().with_on_error("bad"), "bad"),
    ];

    for (expr, options, expected) in test_cases {
        assert_eq!(eval_string(expr, &input, &options), expected, "{}", expr);
    }
}

#[test]
fn test_eval_bool() {
    let input = json!({"Name": "Ana", "Age": 22});
    assert!(eval_bool(r#"/Name == "Ana" && /Age == 22"#, &input, &no_options()));
    assert!(!eval_bool("/Age == 23", &input, &no_options()));
    assert!(!eval_bool("/Name", &input, &no_options()));
    assert!(eval_bool("/Name == 22", &input, &no_options().with_strict(true).with_on_error(true)));
}

#[test]
fn test_eval_string_map() {
    let names = HashMap::from([
        ("Ana".to_string(), "Belle".to_string()),
        ("Cera".to_string(), "Sayed".to_string()),
    ]);

    let typed = HashMap::from([("Names".to_string(), names.clone())]);
    assert_eq!(eval_string_map("/Names", &typed, &no_options()), names);

    let untyped = json!({"Names": {"Ana": "Belle", "Cera": "Sayed"}});
    assert_eq!(eval_string_map("/Names", &untyped, &no_options()), names);

    let mixed = json!({"Names": {"Ana": "Belle", "Age": 3}});
    assert!(eval_string_map("/Names", &mixed, &no_options()).is_empty());

    let fallback = no_options().with_on_error(json!({"x": "y"}));
    assert_eq!(
        eval_string_map("/Missing", &untyped, &fallback),
        HashMap::from([("x".to_string(), "y".to_string())])
    );
}

#[test]
fn test_fallback_of_wrong_type_uses_zero_value() {
    let input = json!({});
    assert_eq!(eval_int("/Missing", &input, &no_options().with_on_error("ten")), 0);
    assert_eq!(eval_string("/Missing", &input, &no_options().with_on_error(10)), "");
}

// ============================================================================
// eval
// ============================================================================

#[test]
fn test_eval_returns_json() {
    let parent = json!({"Name": "Katie", "Children": [{"Name": "Eleanor"}, {"Name": "Jason"}]});

    assert_eq!(eval("/Name", &parent, &no_options()), Ok(json!("Katie")));
    assert_eq!(
        eval("/Children[0]/Name", &parent, &no_options()),
        Ok(json!("Eleanor"))
    );
    assert_eq!(
        eval("/Children", &parent, &no_options()),
        Ok(json!([{"Name": "Eleanor"}, {"Name": "Jason"}]))
    );
}

#[test]
fn test_eval_reports_errors() {
    let input = json!({"Name": "Ana"});

    assert_eq!(
        eval("", &input, &no_options()),
        Err(Error::Compile(CompileError::Parse(ParseError::Empty)))
    );
    assert!(matches!(
        eval("/Name == 1", &input, &no_options().with_strict(true)),
        Err(Error::Eval(EvalError::Mismatch { .. }))
    ));
}
