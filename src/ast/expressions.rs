use std::fmt;

use crate::ast::BinOp;
use crate::host::Scalar;

/// Constant value written in an expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Str(String),
}

impl Literal {
    pub fn as_scalar(&self) -> Scalar<'_> {
        match self {
            Literal::Int(n) => Scalar::Int(*n),
            Literal::Float(n) => Scalar::Float(*n),
            Literal::Str(s) => Scalar::Str(s),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(n) => write!(f, "{}", n),
            Literal::Str(s) => write!(f, "{:?}", s),
        }
    }
}

/// Evaluation tree node.
///
/// Built once from a contextualized [`crate::ast::SyntaxTree`] and never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub enum Ast {
    /// Field or key lookup on the current value
    ///
    /// # Example
    /// ```text
    /// Name
    /// ```
    Field(String),

    /// Evaluate `source` (or keep the current value), then `field` against it
    ///
    /// # Examples
    /// ```text
    /// /Name
    /// /Mom/Name
    /// ```
    Path {
        source: Option<Box<Ast>>,
        field: Box<Ast>,
    },

    /// Comparison or boolean combinator; both sides see the same input
    Binary {
        op: BinOp,
        lhs: Box<Ast>,
        rhs: Box<Ast>,
    },

    /// Parenthesised sub-expression
    Group(Box<Ast>),

    /// Literal value
    Constant(Literal),

    /// Positional element of a sequence
    ///
    /// # Examples
    /// ```text
    /// /Children[0]
    /// [1]
    /// ```
    Index {
        source: Option<Box<Ast>>,
        index: usize,
    },

    /// Boolean filter: broadcast over sequences, applied directly otherwise
    ///
    /// Inserted implicitly for `/Children/(/Name == "c")`.
    Predicate(Box<Ast>),
}

impl fmt::Display for Ast {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ast::Field(name) => write!(f, "{}", name),
            Ast::Path { source, field } => match source.as_deref() {
                Some(Ast::Field(name)) => write!(f, "/{}/{}", name, field),
                Some(source) => write!(f, "{}/{}", source, field),
                None => write!(f, "/{}", field),
            },
            Ast::Binary { op, lhs, rhs } => write!(f, "{} {} {}", lhs, op, rhs),
            Ast::Group(child) => write!(f, "({})", child),
            Ast::Constant(literal) => write!(f, "{}", literal),
            Ast::Index { source, index } => match source.as_deref() {
                Some(Ast::Field(name)) => write!(f, "/{}[{}]", name, index),
                Some(source) => write!(f, "{}[{}]", source, index),
                None => write!(f, "[{}]", index),
            },
            Ast::Predicate(child) => write!(f, "?{{{}}}", child),
        }
    }
}
