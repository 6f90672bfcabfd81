//! Show how an expression is compiled, stage by stage

use std::fmt;

use crate::{
    CompileError,
    ast::{Ast, Token},
    builder::build,
    contextualizer::contextualize,
    lexer::lex,
    parser::parse,
};

/// Output of every compile stage for one expression
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub tokens: Vec<Token>,
    /// Syntax tree straight from the parser
    pub parsed: String,
    /// Syntax tree after implicit predicates were inserted
    pub contextualized: String,
    pub ast: Ast,
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "tokens:")?;
        for token in &self.tokens {
            writeln!(f, "  {:<10} {}", token.symbol.label(), token.text)?;
        }
        writeln!(f, "parsed:         {}", self.parsed)?;
        writeln!(f, "contextualized: {}", self.contextualized)?;
        write!(f, "ast:            {}", self.ast)
    }
}

/// Run the compile stages one at a time, keeping each intermediate form
pub fn explain(expression: &str) -> Result<Explanation, CompileError> {
    let tokens = lex(expression)?;
    let tree = parse(tokens.clone())?;
    let parsed = tree.to_string();
    let tree = contextualize(tree)?;
    let contextualized = tree.to_string();
    let ast = build(&tree)?;

    Ok(Explanation {
        tokens,
        parsed,
        contextualized,
        ast,
    })
}
