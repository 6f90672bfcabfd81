//! Compiling expression text into a reusable evaluation tree.
//!
//! [`compile`] runs the four front-end stages in order:
//!
//! 1. [`lex`](crate::lexer::lex) splits the text into tokens
//! 2. [`parse`](crate::parser::parse) builds a syntax tree by precedence
//! 3. [`contextualize`](crate::contextualizer::contextualize) marks filters
//! 4. [`build`](crate::builder::build) produces the evaluation tree
//!
//! The resulting [`CompiledExpression`] is immutable and can be evaluated
//! from many threads at once.

use std::fmt;
use std::str::FromStr;

use crate::{
    ast::Ast,
    builder::{BuildError, build},
    contextualizer::contextualize,
    evaluator::{EvalError, EvalOptions, Evaluator},
    host::Introspect,
    lexer::{LexError, lex},
    parser::{ParseError, parse},
    value::Value,
};

/// A failure in one of the compile stages.
#[derive(Debug, Clone, PartialEq)]
pub enum CompileError {
    Lex(LexError),
    Parse(ParseError),
    Build(BuildError),
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Lex(e) => write!(f, "Lex error: {}", e),
            CompileError::Parse(e) => write!(f, "Parse error: {}", e),
            CompileError::Build(e) => write!(f, "Build error: {}", e),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Lex(e) => Some(e),
            CompileError::Parse(e) => Some(e),
            CompileError::Build(e) => Some(e),
        }
    }
}

impl From<LexError> for CompileError {
    fn from(e: LexError) -> Self {
        CompileError::Lex(e)
    }
}

impl From<ParseError> for CompileError {
    fn from(e: ParseError) -> Self {
        CompileError::Parse(e)
    }
}

impl From<BuildError> for CompileError {
    fn from(e: BuildError) -> Self {
        CompileError::Build(e)
    }
}

/// Compiles expression text.
///
/// # Examples
///
/// ```
/// use sqi::{compile, EvalOptions};
/// use serde_json::json;
///
/// let expr = compile(r#"/Age == 22 && /Name == "Ana""#).unwrap();
/// let input = json!({"Age": 22, "Name": "Ana"});
///
/// let result = expr.eval(&input, &EvalOptions::default()).unwrap();
/// assert_eq!(result.as_bool(), Some(true));
/// ```
pub fn compile(text: &str) -> Result<CompiledExpression, CompileError> {
    let tokens = lex(text)?;
    let tree = contextualize(parse(tokens)?)?;
    let ast = build(&tree)?;
    tracing::debug!(expression = text, ast = %ast, "compiled expression");
    Ok(CompiledExpression {
        source: text.to_string(),
        ast,
    })
}

/// A compiled expression, ready to evaluate.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledExpression {
    source: String,
    ast: Ast,
}

impl CompiledExpression {
    /// The text this expression was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Evaluates against `input`. The result borrows from both the expression
    /// and the input.
    pub fn eval<'a>(
        &'a self,
        input: &'a dyn Introspect,
        options: &EvalOptions,
    ) -> Result<Value<'a>, EvalError> {
        Evaluator::new(options).eval(&self.ast, &Value::from_host(input))
    }
}

impl FromStr for CompiledExpression {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        compile(s)
    }
}

impl fmt::Display for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
