use std::fmt;

use crate::ast::{InfixRule, NodeId, PrefixRule, Symbol, SyntaxTree, Token};

/// Errors raised while building or rewriting the syntax tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The expression has no tokens
    Empty,

    /// Input ended where an operand was expected
    PrematureEnd,

    /// `(` or `[` without its closing partner
    MissingClose { open: Symbol, found: Option<String> },

    /// `)` or `]` without an opener
    UnmatchedClose { close: Symbol },

    /// A token that cannot appear where it was found
    UnexpectedToken { text: String },

    /// A symbol with no parse behaviour (sentinels, synthetic nodes)
    UnknownToken { symbol: Symbol },

    /// A predicate subtree that also contains an assignment
    ConflictingPredicate,

    /// Nesting deeper than [`MAX_DEPTH`]
    TooDeep { limit: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "Empty expression"),
            ParseError::PrematureEnd => write!(f, "Unexpected end of expression"),
            ParseError::MissingClose { open, found } => {
                let close = match open {
                    Symbol::OpenArray => "]",
                    _ => ")",
                };
                match found {
                    Some(text) => write!(
                        f,
                        "Missing '{}' for '{}', found '{}'",
                        close,
                        open.info().text,
                        text
                    ),
                    None => write!(f, "Missing '{}' for '{}'", close, open.info().text),
                }
            }
            ParseError::UnmatchedClose { close } => {
                write!(f, "Unmatched '{}'", close.info().text)
            }
            ParseError::UnexpectedToken { text } => write!(f, "Unexpected token '{}'", text),
            ParseError::UnknownToken { symbol } => write!(f, "Unknown token kind: {:?}", symbol),
            ParseError::ConflictingPredicate => {
                write!(f, "Conflicting predicate: filter condition contains an assignment")
            }
            ParseError::TooDeep { limit } => {
                write!(f, "Expression nested too deeply (limit {})", limit)
            }
        }
    }
}

impl std::error::Error for ParseError {}

/// Deepest syntax tree the parser accepts.
///
/// Later stages walk the tree recursively, so this also bounds their depth.
pub const MAX_DEPTH: usize = 256;

/// Builds a syntax tree from a token list.
pub fn parse(tokens: Vec<Token>) -> Result<SyntaxTree, ParseError> {
    Parser::new(tokens).parse()
}

/// Operator-precedence parser.
///
/// Each token's [`PrefixRule`] starts a subtree and its [`InfixRule`]
/// extends one; binding powers from the token table decide how far an
/// operator's right operand reaches.
pub struct Parser {
    tokens: std::vec::IntoIter<Token>,
    current: Option<Token>,
    tree: SyntaxTree,
    depth: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens.into_iter();
        let current = tokens.next();
        Parser {
            tokens,
            current,
            tree: SyntaxTree::new(),
            depth: 0,
        }
    }

    /// Consumes the next token.
    fn next(&mut self) -> Option<Token> {
        let token = self.current.take();
        self.current = self.tokens.next();
        token
    }

    /// Symbol of the next token; [`Symbol::Illegal`] once input is exhausted.
    fn peek(&self) -> Symbol {
        self.current
            .as_ref()
            .map_or(Symbol::Illegal, |token| token.symbol)
    }

    fn expect_close(&mut self, open: Symbol, close: Symbol) -> Result<(), ParseError> {
        match self.next() {
            Some(token) if token.symbol == close => Ok(()),
            Some(token) => Err(ParseError::MissingClose {
                open,
                found: Some(token.to_string()),
            }),
            None => Err(ParseError::MissingClose { open, found: None }),
        }
    }

    /// Parses a complete expression. Every token must be consumed.
    pub fn parse(mut self) -> Result<SyntaxTree, ParseError> {
        if self.current.is_none() {
            return Err(ParseError::Empty);
        }

        let root = self.expression(0)?;

        if let Some(token) = self.next() {
            return Err(match token.symbol {
                Symbol::Close | Symbol::CloseArray => ParseError::UnmatchedClose {
                    close: token.symbol,
                },
                _ => ParseError::UnexpectedToken {
                    text: token.to_string(),
                },
            });
        }

        self.tree.set_root(root);
        if self.tree.depth() > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(self.tree)
    }

    /// Parses while the next operator binds tighter than `min_bp`.
    pub fn expression(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        let result = self.operand_chain(min_bp);
        self.depth -= 1;
        result
    }

    fn operand_chain(&mut self, min_bp: u8) -> Result<NodeId, ParseError> {
        let token = self.next().ok_or(ParseError::PrematureEnd)?;
        let mut left = self.prefix(token)?;

        while self.peek().binding_power() > min_bp {
            let token = self.next().ok_or(ParseError::PrematureEnd)?;
            left = self.infix(token, left)?;
        }

        Ok(left)
    }

    fn prefix(&mut self, token: Token) -> Result<NodeId, ParseError> {
        let symbol = token.symbol;
        match symbol.prefix() {
            PrefixRule::Literal => Ok(self.tree.push(token)),
            PrefixRule::Path => {
                let node = self.tree.push(token);
                let segment = self.expression(symbol.binding_power())?;
                self.tree.add_child(node, segment);
                Ok(node)
            }
            PrefixRule::Group => {
                let node = self.tree.push(token);
                let inner = self.expression(0)?;
                self.expect_close(Symbol::Open, Symbol::Close)?;
                self.tree.add_child(node, inner);
                Ok(node)
            }
            PrefixRule::Index => {
                let node = self.tree.push(token);
                let index = self.expression(symbol.binding_power())?;
                self.expect_close(Symbol::OpenArray, Symbol::CloseArray)?;
                self.tree.add_child(node, index);
                Ok(node)
            }
            PrefixRule::Unmatched => Err(ParseError::UnmatchedClose { close: symbol }),
            PrefixRule::Operator => Err(ParseError::UnexpectedToken {
                text: token.to_string(),
            }),
            PrefixRule::Unknown => Err(ParseError::UnknownToken { symbol }),
        }
    }

    fn infix(&mut self, token: Token, left: NodeId) -> Result<NodeId, ParseError> {
        let symbol = token.symbol;
        match symbol.infix() {
            InfixRule::Binary => {
                let node = self.tree.push(token);
                self.tree.add_child(node, left);
                let right = self.expression(symbol.binding_power())?;
                self.tree.add_child(node, right);
                Ok(node)
            }
            InfixRule::Index => {
                let node = self.tree.push(token);
                let index = self.expression(symbol.binding_power())?;
                self.expect_close(Symbol::OpenArray, Symbol::CloseArray)?;
                self.tree.add_child(node, left);
                self.tree.add_child(node, index);
                Ok(node)
            }
            InfixRule::None => Err(ParseError::UnknownToken { symbol }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn tree(input: &str) -> String {
        parse(lex(input).unwrap()).unwrap().to_string()
    }

    #[test]
    fn paths_are_left_associative() {
        assert_eq!(tree("/a/b/c"), "(/ (/ (/ a) b) c)");
    }

    #[test]
    fn equality_binds_tighter_than_boolean() {
        assert_eq!(tree("a == b || c == d"), "(|| (== a b) (== c d))");
    }

    #[test]
    fn nesting_limit_counts_groups() {
        let ok = format!("{}a{}", "(".repeat(50), ")".repeat(50));
        assert!(parse(lex(&ok).unwrap()).is_ok());

        let deep = format!("{}a{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert_eq!(
            parse(lex(&deep).unwrap()).unwrap_err(),
            ParseError::TooDeep { limit: MAX_DEPTH }
        );
    }

    #[test]
    fn missing_close_paren() {
        let err = parse(lex("(a[0]").unwrap()).unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingClose {
                open: Symbol::Open,
                found: None
            }
        );
    }
}
