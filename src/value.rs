use std::fmt;

use crate::ast::Literal;
use crate::host::{Introspect, Kind, Scalar};

/// The result of evaluating an expression.
///
/// Results borrow from the expression (constants) and from the input value
/// (everything reached by navigation). Nothing is copied out of the input:
/// a filtered sequence holds references to the original elements, so their
/// identity and concrete type survive the filter.
///
/// # Examples
///
/// ```
/// use sqi::{compile, EvalOptions, Value};
/// use serde_json::json;
///
/// let input = json!({"Children": [{"Name": "a"}, {"Name": "c"}]});
/// let expr = compile(r#"/Children/(/Name == "c")"#).unwrap();
///
/// match expr.eval(&input, &EvalOptions::default()).unwrap() {
///     Value::Seq(items) => assert_eq!(items.len(), 1),
///     other => panic!("expected a filtered sequence, got {:?}", other),
/// }
/// ```
#[derive(Clone)]
pub enum Value<'a> {
    /// Nothing found; a lookup missed or the input was null
    Absent,

    /// Outcome of a comparison or boolean combinator
    Bool(bool),

    /// A literal written in the expression
    Const(&'a Literal),

    /// A value reached inside the input
    Host(&'a dyn Introspect),

    /// Elements of an input sequence that passed a predicate, in order
    Seq(Vec<&'a dyn Introspect>),
}

impl<'a> Value<'a> {
    /// Wraps a host value, mapping null-like values to [`Value::Absent`].
    pub fn from_host(host: &'a dyn Introspect) -> Self {
        match host.kind() {
            Kind::Null => Value::Absent,
            _ => Value::Host(host),
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Value::Absent)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Absent => Kind::Null,
            Value::Bool(_) | Value::Const(_) => Kind::Scalar,
            Value::Host(host) => host.kind(),
            Value::Seq(_) => Kind::Sequence,
        }
    }

    /// The scalar this value holds, if it is one.
    pub fn scalar(&self) -> Option<Scalar<'a>> {
        match *self {
            Value::Bool(b) => Some(Scalar::Bool(b)),
            Value::Const(literal) => Some(literal.as_scalar()),
            Value::Host(host) => host.scalar(),
            Value::Absent | Value::Seq(_) => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self.scalar() {
            Some(Scalar::Bool(b)) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self.scalar() {
            Some(Scalar::Int(n)) => Some(n),
            _ => None,
        }
    }

    /// Floating view of a numeric value; integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self.scalar() {
            Some(Scalar::Float(n)) => Some(n),
            Some(Scalar::Int(n)) => Some(n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self.scalar() {
            Some(Scalar::Str(s)) => Some(s),
            _ => None,
        }
    }

    /// Number of elements of a sequence result, or entries of a map.
    pub fn len(&self) -> usize {
        match self {
            Value::Seq(items) => items.len(),
            Value::Host(host) => host.len(),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element `index` of a sequence result.
    pub fn get(&self, index: usize) -> Option<&'a dyn Introspect> {
        match *self {
            Value::Seq(ref items) => items.get(index).copied(),
            Value::Host(host) if host.kind() == Kind::Sequence => host.index(index),
            _ => None,
        }
    }

    /// Name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self.scalar() {
            Some(scalar) => scalar.type_name(),
            None if self.is_absent() => "absent",
            None => self.kind().name(),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        crate::output::to_json(self)
    }
}

impl fmt::Debug for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Absent => write!(f, "Absent"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Const(literal) => write!(f, "Const({})", literal),
            Value::Host(_) => write!(f, "Host({})", self.to_json()),
            Value::Seq(_) => write!(f, "Seq({})", self.to_json()),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<bool> for Value<'_> {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn null_host_is_absent() {
        let doc = json!(null);
        assert!(Value::from_host(&doc).is_absent());

        let none: Option<String> = None;
        assert!(Value::from_host(&none).is_absent());
    }

    #[test]
    fn accessors_read_through_host_values() {
        let doc = json!({"n": 3, "s": "x", "f": 1.5});
        let n = Value::from_host(doc.key("n").unwrap());
        let s = Value::from_host(doc.key("s").unwrap());
        let f = Value::from_host(doc.key("f").unwrap());

        assert_eq!(n.as_int(), Some(3));
        assert_eq!(n.as_float(), Some(3.0));
        assert_eq!(s.as_str(), Some("x"));
        assert_eq!(f.as_int(), None);
        assert_eq!(f.type_name(), "float");
    }

    #[test]
    fn constant_strings_borrow_from_the_literal() {
        let literal = Literal::Str("abc".into());
        let value = Value::Const(&literal);
        assert_eq!(value.as_str(), Some("abc"));
        assert_eq!(value.kind(), Kind::Scalar);
    }
}
