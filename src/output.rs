//! JSON rendering of evaluation results.
//!
//! Results and host values are converted to [`serde_json::Value`], which
//! keeps object keys sorted, so rendering is deterministic regardless of the
//! iteration order of the host collections.
//!
//! # Examples
//!
//! ```
//! use sqi::{compile, EvalOptions};
//! use sqi::output::{to_json, to_json_string};
//! use serde_json::json;
//!
//! let input = json!({"Mom": {"Name": "Ana", "Age": 40}});
//! let expr = compile("/Mom").unwrap();
//! let result = expr.eval(&input, &EvalOptions::default()).unwrap();
//!
//! assert_eq!(to_json(&result), json!({"Age": 40, "Name": "Ana"}));
//! assert_eq!(to_json_string(&result, false), r#"{"Age":40,"Name":"Ana"}"#);
//! ```

use serde_json::{Map, Number};

use crate::host::{Introspect, Kind, Scalar};
use crate::value::Value;

/// Converts an evaluation result to JSON. Absent results become `null`.
pub fn to_json(value: &Value<'_>) -> serde_json::Value {
    match value {
        Value::Absent => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Const(literal) => scalar_to_json(literal.as_scalar()),
        Value::Host(host) => host_to_json(*host),
        Value::Seq(items) => {
            serde_json::Value::Array(items.iter().map(|item| host_to_json(*item)).collect())
        }
    }
}

/// Converts any host value to JSON.
pub fn host_to_json(host: &dyn Introspect) -> serde_json::Value {
    match host.kind() {
        Kind::Null => serde_json::Value::Null,
        Kind::Scalar => host
            .scalar()
            .map_or(serde_json::Value::Null, scalar_to_json),
        Kind::Sequence => serde_json::Value::Array(
            (0..host.len())
                .map(|i| host.index(i).map_or(serde_json::Value::Null, host_to_json))
                .collect(),
        ),
        Kind::Map | Kind::Record => {
            let mut map = Map::new();
            for (name, value) in host.entries() {
                map.insert(name.into_owned(), host_to_json(value));
            }
            serde_json::Value::Object(map)
        }
    }
}

fn scalar_to_json(scalar: Scalar<'_>) -> serde_json::Value {
    match scalar {
        Scalar::Bool(b) => serde_json::Value::Bool(b),
        Scalar::Int(n) => serde_json::Value::Number(n.into()),
        // JSON has no NaN or infinity
        Scalar::Float(n) => Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number),
        Scalar::Str(s) => serde_json::Value::String(s.to_string()),
    }
}

/// Renders a result as a JSON string, pretty-printed with two-space
/// indentation when `pretty` is set.
pub fn to_json_string(value: &Value<'_>, pretty: bool) -> String {
    let json = to_json(value);
    if pretty {
        format!("{:#}", json)
    } else {
        json.to_string()
    }
}
