use crate::{
    ast::{Ast, BinOp},
    compare::equal,
    host::{Introspect, Kind},
    value::Value,
};

/// Options for a single evaluation.
///
/// # Examples
///
/// ```
/// use sqi::EvalOptions;
///
/// let options = EvalOptions::default().with_strict(true).with_on_error("n/a");
/// assert!(options.strict);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EvalOptions {
    /// Report comparisons between mismatched kinds as errors instead of `false`
    pub strict: bool,

    /// Result substituted by the convenience functions when evaluation fails
    pub on_error: Option<serde_json::Value>,
}

impl EvalOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_on_error(mut self, fallback: impl Into<serde_json::Value>) -> Self {
        self.on_error = Some(fallback.into());
        self
    }
}

/// Errors that can occur during evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A boolean was required (`&&`, `||`, predicates) or a field was read
    /// from a sequence
    Condition(String),

    /// Strict-mode comparison between values of different kinds
    Mismatch {
        lhs: &'static str,
        rhs: &'static str,
    },

    /// Strict-mode index past the end of a sequence
    IndexOutOfRange { index: usize, len: usize },

    /// Strict-mode index applied to something that is not a sequence
    NotIndexable { index: usize, kind: &'static str },

    /// The evaluation tree itself is unusable
    Malformed(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::Condition(msg) => write!(f, "Condition error: {}", msg),
            EvalError::Mismatch { lhs, rhs } => {
                write!(f, "Mismatch error: cannot compare {} with {}", lhs, rhs)
            }
            EvalError::IndexOutOfRange { index, len } => write!(
                f,
                "Index error: index {} out of range for sequence of length {}",
                index, len
            ),
            EvalError::NotIndexable { index, kind } => {
                write!(f, "Index error: cannot apply [{}] to {}", index, kind)
            }
            EvalError::Malformed(msg) => write!(f, "Malformed expression: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

/// Walks an evaluation tree against an input value.
///
/// The evaluator holds no state besides the options, so one instance can
/// run any number of trees. Results borrow from both the tree and the input.
pub struct Evaluator<'o> {
    options: &'o EvalOptions,
}

impl<'o> Evaluator<'o> {
    pub fn new(options: &'o EvalOptions) -> Self {
        Evaluator { options }
    }

    /// Evaluates `ast` with `input` as the current value.
    pub fn eval<'a>(&self, ast: &'a Ast, input: &Value<'a>) -> Result<Value<'a>, EvalError> {
        match ast {
            Ast::Field(name) => self.field(name, input),
            Ast::Path { source, field } => match source {
                Some(source) => {
                    let current = self.eval(source, input)?;
                    self.eval(field, &current)
                }
                None => self.eval(field, input),
            },
            Ast::Binary { op, lhs, rhs } => {
                let left = self.eval(lhs, input)?;
                let right = self.eval(rhs, input)?;
                self.binary(*op, &left, &right)
            }
            Ast::Group(child) => self.eval(child, input),
            Ast::Constant(literal) => Ok(Value::Const(literal)),
            Ast::Index { source, index } => match source {
                Some(source) => {
                    let current = self.eval(source, input)?;
                    self.index(current, *index)
                }
                None => self.index(input.clone(), *index),
            },
            Ast::Predicate(child) => self.predicate(child, input),
        }
    }

    fn field<'a>(&self, name: &str, input: &Value<'a>) -> Result<Value<'a>, EvalError> {
        if name.is_empty() {
            return Err(EvalError::Malformed("empty field name".to_string()));
        }

        let host = match input {
            Value::Host(host) => *host,
            Value::Seq(_) => return Err(sequence_field(name)),
            _ => return Ok(Value::Absent),
        };

        let found = match host.kind() {
            Kind::Record => host.field(name),
            Kind::Map => host.key(name),
            Kind::Sequence => return Err(sequence_field(name)),
            Kind::Scalar | Kind::Null => None,
        };
        Ok(found.map_or(Value::Absent, Value::from_host))
    }

    fn binary<'a>(
        &self,
        op: BinOp,
        left: &Value<'a>,
        right: &Value<'a>,
    ) -> Result<Value<'a>, EvalError> {
        let strict = self.options.strict;
        match op {
            BinOp::Eql => equal(left, right, strict).map(Value::from),
            BinOp::Neq => equal(left, right, strict).map(|eq| Value::from(!eq)),
            BinOp::And | BinOp::Or => {
                let (l, r) = (boolean(op, left)?, boolean(op, right)?);
                Ok(Value::from(if op == BinOp::And { l && r } else { l || r }))
            }
        }
    }

    fn index<'a>(&self, current: Value<'a>, index: usize) -> Result<Value<'a>, EvalError> {
        if current.is_absent() {
            return Ok(Value::Absent);
        }

        if current.kind() == Kind::Sequence {
            let len = current.len();
            if len == 0 {
                return Ok(Value::Absent);
            }
            if let Some(element) = current.get(index) {
                return Ok(Value::from_host(element));
            }
            if self.options.strict {
                return Err(EvalError::IndexOutOfRange { index, len });
            }
        } else if self.options.strict {
            return Err(EvalError::NotIndexable {
                index,
                kind: current.type_name(),
            });
        }

        tracing::trace!(index, kind = current.type_name(), "index not applicable, keeping input");
        Ok(current)
    }

    fn predicate<'a>(&self, child: &'a Ast, input: &Value<'a>) -> Result<Value<'a>, EvalError> {
        let elements: Vec<&'a dyn Introspect> = match *input {
            Value::Seq(ref items) => items.clone(),
            Value::Host(host) if host.kind() == Kind::Sequence => {
                (0..host.len()).filter_map(|i| host.index(i)).collect()
            }
            _ => return self.test(child, input).map(Value::from),
        };

        let mut kept = Vec::new();
        for element in elements {
            if self.test(child, &Value::from_host(element))? {
                kept.push(element);
            }
        }
        Ok(Value::Seq(kept))
    }

    fn test<'a>(&self, child: &'a Ast, input: &Value<'a>) -> Result<bool, EvalError> {
        let result = self.eval(child, input)?;
        result.as_bool().ok_or_else(|| {
            EvalError::Condition(format!(
                "predicate must evaluate to boolean, got {}",
                result.type_name()
            ))
        })
    }
}

fn boolean(op: BinOp, value: &Value<'_>) -> Result<bool, EvalError> {
    value.as_bool().ok_or_else(|| {
        EvalError::Condition(format!(
            "operands of '{}' must evaluate to boolean, got {}",
            op,
            value.type_name()
        ))
    })
}

fn sequence_field(name: &str) -> EvalError {
    EvalError::Condition(format!(
        "cannot read field '{}' from a sequence; filter or index it first",
        name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;
    use serde_json::json;

    fn field(name: &str) -> Ast {
        Ast::Field(name.to_string())
    }

    #[test]
    fn field_on_scalar_is_absent() {
        let options = EvalOptions::default();
        let doc = json!(5);
        let ast = field("Name");
        let result = Evaluator::new(&options)
            .eval(&ast, &Value::from_host(&doc))
            .unwrap();
        assert!(result.is_absent());
    }

    #[test]
    fn empty_field_name_is_malformed() {
        let options = EvalOptions::default();
        let doc = json!({"": 1});
        let err = Evaluator::new(&options)
            .eval(&field(""), &Value::from_host(&doc))
            .unwrap_err();
        assert!(matches!(err, EvalError::Malformed(_)));
    }

    #[test]
    fn and_rejects_non_booleans() {
        let options = EvalOptions::default();
        let ast = Ast::Binary {
            op: BinOp::And,
            lhs: Box::new(Ast::Constant(Literal::Int(1))),
            rhs: Box::new(Ast::Constant(Literal::Int(1))),
        };
        let err = Evaluator::new(&options)
            .eval(&ast, &Value::Absent)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Condition error: operands of '&&' must evaluate to boolean, got integer"
        );
    }

    #[test]
    fn predicate_rejects_non_booleans() {
        let options = EvalOptions::default();
        let evaluator = Evaluator::new(&options);
        let ast = Ast::Predicate(Box::new(Ast::Constant(Literal::Int(1))));
        let list = json!([1, 2]);
        let scalar = json!("a");

        for doc in [&list, &scalar] {
            let err = evaluator.eval(&ast, &Value::from_host(doc)).unwrap_err();
            assert_eq!(
                err,
                EvalError::Condition("predicate must evaluate to boolean, got integer".to_string())
            );
        }
    }

    #[test]
    fn comparisons_yield_plain_booleans() {
        let options = EvalOptions::default();
        let ast = Ast::Binary {
            op: BinOp::Neq,
            lhs: Box::new(Ast::Constant(Literal::Int(1))),
            rhs: Box::new(Ast::Constant(Literal::Int(2))),
        };
        let result = Evaluator::new(&options).eval(&ast, &Value::Absent).unwrap();
        assert!(matches!(result, Value::Bool(true)));
    }

    #[test]
    fn strict_index_errors() {
        let options = EvalOptions::default().with_strict(true);
        let evaluator = Evaluator::new(&options);
        let list = json!(["a"]);
        let scalar = json!("a");
        let ast = Ast::Index {
            source: None,
            index: 3,
        };

        assert_eq!(
            evaluator.eval(&ast, &Value::from_host(&list)).unwrap_err(),
            EvalError::IndexOutOfRange { index: 3, len: 1 }
        );
        assert_eq!(
            evaluator.eval(&ast, &Value::from_host(&scalar)).unwrap_err(),
            EvalError::NotIndexable {
                index: 3,
                kind: "string"
            }
        );
    }
}
