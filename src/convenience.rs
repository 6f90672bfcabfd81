//! One-shot evaluation helpers.
//!
//! Each function compiles the expression, evaluates it once and converts the
//! result. The typed helpers never fail: on a compile or evaluation error,
//! an absent result, or a result of the wrong type they return
//! [`EvalOptions::on_error`] converted to the target type, or the type's
//! zero value when no fallback is set (or it does not convert).
//!
//! ```
//! use sqi::{eval_int, eval_string, EvalOptions};
//! use serde_json::json;
//!
//! let input = json!({"Name": "Ana", "Age": 32});
//! let options = EvalOptions::default();
//!
//! assert_eq!(eval_string("/Name", &input, &options), "Ana");
//! assert_eq!(eval_int("/Age", &input, &options), 32);
//! assert_eq!(eval_int("/Height", &input, &options.with_on_error(10)), 10);
//! ```

use std::collections::HashMap;
use std::fmt;

use crate::{
    evaluator::{EvalError, EvalOptions},
    expression::{CompileError, compile},
    host::{Introspect, Kind},
    value::Value,
};

/// Failure of [`eval`].
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Compile(CompileError),
    Eval(EvalError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Compile(e) => write!(f, "{}", e),
            Error::Eval(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Compile(e) => Some(e),
            Error::Eval(e) => Some(e),
        }
    }
}

impl From<CompileError> for Error {
    fn from(e: CompileError) -> Self {
        Error::Compile(e)
    }
}

impl From<EvalError> for Error {
    fn from(e: EvalError) -> Self {
        Error::Eval(e)
    }
}

/// Compiles and evaluates `expr`, returning the result as JSON.
pub fn eval(
    expr: &str,
    input: &dyn Introspect,
    options: &EvalOptions,
) -> Result<serde_json::Value, Error> {
    let compiled = compile(expr)?;
    let result = compiled.eval(input, options)?;
    Ok(result.to_json())
}

pub fn eval_bool(expr: &str, input: &dyn Introspect, options: &EvalOptions) -> bool {
    typed(expr, input, options, |v| v.as_bool(), serde_json::Value::as_bool)
}

/// Integer result; floats are not truncated and fall back instead.
pub fn eval_int(expr: &str, input: &dyn Introspect, options: &EvalOptions) -> i64 {
    typed(expr, input, options, |v| v.as_int(), serde_json::Value::as_i64)
}

/// Floating result; integers are widened.
pub fn eval_float(expr: &str, input: &dyn Introspect, options: &EvalOptions) -> f64 {
    typed(expr, input, options, |v| v.as_float(), serde_json::Value::as_f64)
}

pub fn eval_string(expr: &str, input: &dyn Introspect, options: &EvalOptions) -> String {
    typed(
        expr,
        input,
        options,
        |v| v.as_str().map(str::to_string),
        |v| v.as_str().map(str::to_string),
    )
}

/// Map or record whose values are all strings.
pub fn eval_string_map(
    expr: &str,
    input: &dyn Introspect,
    options: &EvalOptions,
) -> HashMap<String, String> {
    typed(expr, input, options, string_map, |fallback| {
        fallback.as_object().and_then(|map| {
            map.iter()
                .map(|(k, v)| v.as_str().map(|s| (k.clone(), s.to_string())))
                .collect()
        })
    })
}

fn string_map(value: &Value<'_>) -> Option<HashMap<String, String>> {
    let Value::Host(host) = value else {
        return None;
    };
    if !matches!(host.kind(), Kind::Map | Kind::Record) {
        return None;
    }
    host.entries()
        .into_iter()
        .map(|(name, entry)| {
            Value::from_host(entry)
                .as_str()
                .map(|s| (name.into_owned(), s.to_string()))
        })
        .collect()
}

fn typed<T: Default>(
    expr: &str,
    input: &dyn Introspect,
    options: &EvalOptions,
    convert: impl Fn(&Value<'_>) -> Option<T>,
    from_fallback: impl Fn(&serde_json::Value) -> Option<T>,
) -> T {
    let reason = match compile(expr) {
        Ok(compiled) => match compiled.eval(input, options) {
            Ok(result) => match convert(&result) {
                Some(converted) => return converted,
                None => format!("result is {}", result.type_name()),
            },
            Err(e) => e.to_string(),
        },
        Err(e) => e.to_string(),
    };

    tracing::trace!(expression = expr, %reason, "substituting fallback value");
    options
        .on_error
        .as_ref()
        .and_then(from_fallback)
        .unwrap_or_default()
}
