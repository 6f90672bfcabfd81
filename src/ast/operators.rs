use std::fmt;

use crate::ast::Symbol;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Comparison
    /// Equal (`==`)
    Eql,
    /// Not equal (`!=`)
    Neq,

    // Logical
    /// Logical AND (`&&`)
    And,
    /// Logical OR (`||`)
    Or,
}

impl BinOp {
    pub fn from_symbol(symbol: Symbol) -> Option<BinOp> {
        match symbol {
            Symbol::Eql => Some(BinOp::Eql),
            Symbol::Neq => Some(BinOp::Neq),
            Symbol::And => Some(BinOp::And),
            Symbol::Or => Some(BinOp::Or),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Eql => "==",
            BinOp::Neq => "!=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
