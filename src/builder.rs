use std::fmt;

use crate::ast::{Ast, BinOp, Literal, NodeId, Symbol, SyntaxTree};
use crate::lexer::unquote;

/// Errors raised when a syntax tree does not have the shape its symbols need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A node has the wrong number of children for its symbol
    Malformed { symbol: Symbol, children: usize },

    /// An index that is not an integer literal
    InvalidIndex { found: String },

    /// A numeric literal that does not parse
    InvalidLiteral { text: String },

    /// A symbol with no evaluation rule
    Unhandled { symbol: Symbol },

    /// The tree has no root
    EmptyTree,
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildError::Malformed { symbol, children } => write!(
                f,
                "Malformed {} node: wrong number of children ({})",
                symbol, children
            ),
            BuildError::InvalidIndex { found } => {
                write!(f, "Index must be an integer, found '{}'", found)
            }
            BuildError::InvalidLiteral { text } => write!(f, "Invalid literal '{}'", text),
            BuildError::Unhandled { symbol } => {
                write!(f, "No evaluation rule for symbol '{}'", symbol)
            }
            BuildError::EmptyTree => write!(f, "Syntax tree has no root"),
        }
    }
}

impl std::error::Error for BuildError {}

/// Converts a contextualized syntax tree into an evaluation tree.
pub fn build(tree: &SyntaxTree) -> Result<Ast, BuildError> {
    let root = tree.root().ok_or(BuildError::EmptyTree)?;
    Builder { tree }.node(root)
}

struct Builder<'t> {
    tree: &'t SyntaxTree,
}

impl Builder<'_> {
    fn node(&self, id: NodeId) -> Result<Ast, BuildError> {
        let node = self.tree.node(id);
        let symbol = node.symbol;

        if let Some(op) = BinOp::from_symbol(symbol) {
            let [lhs, rhs] = self.arity::<2>(id)?;
            return Ok(Ast::Binary {
                op,
                lhs: Box::new(self.node(lhs)?),
                rhs: Box::new(self.node(rhs)?),
            });
        }

        match symbol {
            Symbol::Int | Symbol::Float | Symbol::String => {
                self.arity::<0>(id)?;
                Ok(Ast::Constant(self.literal(id)?))
            }
            Symbol::Open => {
                let [child] = self.arity::<1>(id)?;
                Ok(Ast::Group(Box::new(self.node(child)?)))
            }
            Symbol::Predicate => {
                let [child] = self.arity::<1>(id)?;
                Ok(Ast::Predicate(Box::new(self.node(child)?)))
            }
            Symbol::OpenArray => self.index(id),
            Symbol::Path => self.path(id),
            _ => Err(BuildError::Unhandled { symbol }),
        }
    }

    fn arity<const N: usize>(&self, id: NodeId) -> Result<[NodeId; N], BuildError> {
        let children = self.tree.children(id);
        <[NodeId; N]>::try_from(children).map_err(|_| BuildError::Malformed {
            symbol: self.tree.symbol(id),
            children: children.len(),
        })
    }

    fn literal(&self, id: NodeId) -> Result<Literal, BuildError> {
        let node = self.tree.node(id);
        let invalid = || BuildError::InvalidLiteral {
            text: node.text.clone(),
        };
        match node.symbol {
            Symbol::Int => node.text.parse().map(Literal::Int).map_err(|_| invalid()),
            Symbol::Float => node.text.parse().map(Literal::Float).map_err(|_| invalid()),
            _ => Ok(Literal::Str(unquote(&node.text))),
        }
    }

    /// `[i]` (one child) or `source[i]` (two children).
    fn index(&self, id: NodeId) -> Result<Ast, BuildError> {
        let (source, index) = match self.tree.children(id) {
            [index] => (None, *index),
            [source, index] => (Some(Box::new(self.segment(*source)?)), *index),
            children => {
                return Err(BuildError::Malformed {
                    symbol: Symbol::OpenArray,
                    children: children.len(),
                });
            }
        };

        let node = self.tree.node(index);
        if node.symbol != Symbol::Int || !node.children.is_empty() {
            return Err(BuildError::InvalidIndex {
                found: node.text.clone(),
            });
        }
        let index = node.text.parse().map_err(|_| BuildError::InvalidIndex {
            found: node.text.clone(),
        })?;

        Ok(Ast::Index { source, index })
    }

    /// `/field` (one child) or `source/field` (two children).
    fn path(&self, id: NodeId) -> Result<Ast, BuildError> {
        match self.tree.children(id) {
            [field] => Ok(Ast::Path {
                source: None,
                field: Box::new(self.segment(*field)?),
            }),
            [source, field] => Ok(Ast::Path {
                source: Some(Box::new(self.segment(*source)?)),
                field: Box::new(self.segment(*field)?),
            }),
            children => Err(BuildError::Malformed {
                symbol: Symbol::Path,
                children: children.len(),
            }),
        }
    }

    /// A node in a navigation position. Groups and single-segment paths are
    /// looked through; a literal leaf names a field.
    fn segment(&self, mut id: NodeId) -> Result<Ast, BuildError> {
        loop {
            match (self.tree.symbol(id), self.tree.children(id)) {
                (Symbol::Open | Symbol::Path, [inner]) => id = *inner,
                _ => break,
            }
        }

        let node = self.tree.node(id);
        if node.symbol.is_literal() && node.children.is_empty() {
            return Ok(Ast::Field(unquote(&node.text)));
        }
        self.node(id)
    }
}
