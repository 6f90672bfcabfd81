pub mod ast;
pub mod builder;
pub mod compare;
pub mod contextualizer;
pub mod convenience;
pub mod evaluator;
pub mod expression;
pub mod host;
pub mod lexer;
pub mod output;
pub mod parser;
pub mod value;

#[cfg(feature = "cli")]
pub mod cli;

pub use ast::{Ast, BinOp, Literal, Symbol, Token};
pub use builder::BuildError;
pub use convenience::{eval, eval_bool, eval_float, eval_int, eval_string, eval_string_map};
pub use evaluator::{EvalError, EvalOptions, Evaluator};
pub use expression::{CompileError, CompiledExpression, compile};
pub use host::{Introspect, Kind, Scalar};
pub use lexer::{LexError, Lexer, Position};
pub use output::{to_json, to_json_string};
pub use parser::{MAX_DEPTH, ParseError, Parser};
pub use value::Value;
