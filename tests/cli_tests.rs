// tests/cli_tests.rs
#![cfg(feature = "cli")]

use serde_json::json;
use sqi::cli::{CheckOptions, CheckResult, CliError, execute_check, explain};
use sqi::{CompileError, EvalError, ParseError};

fn check(expression: &str, input: Option<&str>) -> CheckOptions {
    CheckOptions {
        expression: expression.to_string(),
        input: input.map(str::to_string),
        ..CheckOptions::default()
    }
}

#[test]
fn test_check_evaluates_against_json() {
    let input = r#"{"Children": [{"Name": "a"}, {"Name": "c"}]}"#;

    let result = execute_check(&check(r#"/Children/(/Name == "c")"#, Some(input))).unwrap();
    assert_eq!(result, CheckResult::Success(json!([{"Name": "c"}])));

    let result = execute_check(&check("/Missing", Some(input))).unwrap();
    assert_eq!(result, CheckResult::Success(json!(null)));
}

#[test]
fn test_check_syntax_only_needs_no_input() {
    let options = CheckOptions {
        syntax_only: true,
        ..check("/a/b == 1", None)
    };
    assert_eq!(execute_check(&options).unwrap(), CheckResult::SyntaxValid);
}

#[test]
fn test_check_strict_mode() {
    let input = r#"{"Name": "Ana"}"#;

    let lax = check("/Name == 22", Some(input));
    assert_eq!(execute_check(&lax).unwrap(), CheckResult::Success(json!(false)));

    let strict = CheckOptions {
        strict: true,
        ..lax
    };
    assert!(matches!(
        execute_check(&strict),
        Err(CliError::Eval(EvalError::Mismatch { .. }))
    ));
}

#[test]
fn test_check_errors() {
    assert!(matches!(
        execute_check(&check("/a", None)),
        Err(CliError::NoInput)
    ));
    assert!(matches!(
        execute_check(&check("/a", Some("{not json"))),
        Err(CliError::Json(_))
    ));
    assert!(matches!(
        execute_check(&check("(/a", Some("{}"))),
        Err(CliError::Compile(CompileError::Parse(
            ParseError::MissingClose { .. }
        )))
    ));
}

#[test]
fn test_error_display() {
    let err = execute_check(&check("/a", None)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "No input provided. Use --input or pipe JSON to stdin."
    );

    let err = execute_check(&check("", Some("{}"))).unwrap_err();
    assert_eq!(err.to_string(), "Parse error: Empty expression");
}

#[test]
fn test_explain_shows_every_stage() {
    let explanation = explain(r#"/Children/(/Name == "c")"#).unwrap();

    assert_eq!(explanation.tokens.len(), 9);
    assert_eq!(
        explanation.parsed,
        r#"(/ (/ Children) (group (== (/ Name) "c")))"#
    );
    assert_eq!(
        explanation.contextualized,
        r#"(/ (/ Children) (group (predicate (== (/ Name) "c"))))"#
    );

    let rendered = explanation.to_string();
    assert!(rendered.starts_with("tokens:\n"));
    assert!(rendered.contains("contextualized: (/ (/ Children)"));
}

#[test]
fn test_explain_reports_compile_errors() {
    assert_eq!(
        explain("a b"),
        Err(CompileError::Parse(ParseError::UnexpectedToken {
            text: "b".to_string()
        }))
    );
}
