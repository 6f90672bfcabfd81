use std::fmt;

/// Token kinds.
///
/// The lexer produces every symbol except [`Symbol::Illegal`] (the parser's
/// end-of-input sentinel) and [`Symbol::Predicate`] (inserted by the
/// contextualizer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// Sentinel returned when peeking past the last token
    Illegal,

    // Literals
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 0
    /// 42
    /// ```
    Int,

    /// Floating point literal
    ///
    /// # Examples
    /// ```text
    /// 5.5
    /// 1e-3
    /// ```
    Float,

    /// Bare word or quoted string
    ///
    /// Quoted strings keep their delimiters until the AST is built.
    ///
    /// # Examples
    /// ```text
    /// Name
    /// "a/b"
    /// ```
    String,

    // Operators
    /// Assignment (`=`). Parsed but never evaluated.
    Assign,

    /// Path separator (`/`)
    ///
    /// # Examples
    /// ```text
    /// /Children/Name
    /// ```
    Path,

    /// Equality (`==`)
    Eql,

    /// Inequality (`!=`)
    Neq,

    /// Logical AND (`&&`)
    And,

    /// Logical OR (`||`)
    Or,

    // Enclosures
    /// Left parenthesis for grouping
    Open,

    /// Right parenthesis
    Close,

    /// Left bracket for indexing
    ///
    /// # Examples
    /// ```text
    /// /Children[0]
    /// [1]
    /// ```
    OpenArray,

    /// Right bracket
    CloseArray,

    /// Implicit filter inserted above a comparison that sits under a path
    Predicate,
}

/// How a token starts an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefixRule {
    /// The token is its own subtree
    Literal,
    /// `/field`: parse one segment as the only child
    Path,
    /// `( expr )`
    Group,
    /// `[ int ]` applied to the current input
    Index,
    /// A closing enclosure with no opener
    Unmatched,
    /// A binary operator with no left operand
    Operator,
    /// Never valid in source position
    Unknown,
}

/// How a token continues an expression whose left side is already parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfixRule {
    None,
    /// `left op right`, right side parsed at the operator's binding power
    Binary,
    /// `left [ int ]`
    Index,
}

/// Static per-symbol parse metadata.
#[derive(Debug)]
pub struct TokenInfo {
    pub symbol: Symbol,
    pub text: &'static str,
    pub binding_power: u8,
    pub prefix: PrefixRule,
    pub infix: InfixRule,
}

const fn info(
    symbol: Symbol,
    text: &'static str,
    binding_power: u8,
    prefix: PrefixRule,
    infix: InfixRule,
) -> TokenInfo {
    TokenInfo {
        symbol,
        text,
        binding_power,
        prefix,
        infix,
    }
}

/// One entry per symbol, in declaration order.
static TOKEN_TABLE: [TokenInfo; 15] = [
    info(Symbol::Illegal, "", 0, PrefixRule::Unknown, InfixRule::None),
    info(Symbol::Int, "", 0, PrefixRule::Literal, InfixRule::None),
    info(Symbol::Float, "", 0, PrefixRule::Literal, InfixRule::None),
    info(Symbol::String, "", 0, PrefixRule::Literal, InfixRule::None),
    info(Symbol::Assign, "=", 80, PrefixRule::Operator, InfixRule::Binary),
    info(Symbol::Path, "/", 90, PrefixRule::Path, InfixRule::Binary),
    info(Symbol::Eql, "==", 70, PrefixRule::Operator, InfixRule::Binary),
    info(Symbol::Neq, "!=", 70, PrefixRule::Operator, InfixRule::Binary),
    info(Symbol::And, "&&", 60, PrefixRule::Operator, InfixRule::Binary),
    info(Symbol::Or, "||", 60, PrefixRule::Operator, InfixRule::Binary),
    info(Symbol::Open, "(", 0, PrefixRule::Group, InfixRule::None),
    info(Symbol::Close, ")", 0, PrefixRule::Unmatched, InfixRule::None),
    info(Symbol::OpenArray, "[", 85, PrefixRule::Index, InfixRule::Index),
    info(Symbol::CloseArray, "]", 0, PrefixRule::Unmatched, InfixRule::None),
    info(Symbol::Predicate, "", 100, PrefixRule::Unknown, InfixRule::None),
];

/// Operator spellings recognised inside runs of punctuation.
const KEYWORDS: [(&str, Symbol); 10] = [
    ("=", Symbol::Assign),
    ("/", Symbol::Path),
    ("==", Symbol::Eql),
    ("!=", Symbol::Neq),
    ("&&", Symbol::And),
    ("||", Symbol::Or),
    ("(", Symbol::Open),
    (")", Symbol::Close),
    ("[", Symbol::OpenArray),
    ("]", Symbol::CloseArray),
];

impl Symbol {
    pub const ALL: [Symbol; 15] = [
        Symbol::Illegal,
        Symbol::Int,
        Symbol::Float,
        Symbol::String,
        Symbol::Assign,
        Symbol::Path,
        Symbol::Eql,
        Symbol::Neq,
        Symbol::And,
        Symbol::Or,
        Symbol::Open,
        Symbol::Close,
        Symbol::OpenArray,
        Symbol::CloseArray,
        Symbol::Predicate,
    ];

    pub fn info(self) -> &'static TokenInfo {
        &TOKEN_TABLE[self as usize]
    }

    pub fn binding_power(self) -> u8 {
        self.info().binding_power
    }

    pub fn prefix(self) -> PrefixRule {
        self.info().prefix
    }

    pub fn infix(self) -> InfixRule {
        self.info().infix
    }

    /// Short label used when printing syntax trees.
    pub fn label(self) -> &'static str {
        match self {
            Symbol::Illegal => "illegal",
            Symbol::Int => "int",
            Symbol::Float => "float",
            Symbol::String => "string",
            Symbol::Open => "group",
            Symbol::OpenArray => "index",
            Symbol::Predicate => "predicate",
            other => other.info().text,
        }
    }

    /// True for the symbols that become [`crate::ast::BinOp`]s.
    pub fn is_comparison(self) -> bool {
        matches!(self, Symbol::Eql | Symbol::Neq | Symbol::And | Symbol::Or)
    }

    pub fn is_literal(self) -> bool {
        matches!(self, Symbol::Int | Symbol::Float | Symbol::String)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Exact keyword lookup for a complete word.
pub fn keyword(text: &str) -> Option<Symbol> {
    KEYWORDS
        .iter()
        .find(|(spelling, _)| *spelling == text)
        .map(|(_, symbol)| *symbol)
}

/// Longest keyword that `text` starts with, and its length in bytes.
pub fn longest_keyword_prefix(text: &str) -> Option<(Symbol, usize)> {
    KEYWORDS
        .iter()
        .filter(|(spelling, _)| text.starts_with(*spelling))
        .max_by_key(|(spelling, _)| spelling.len())
        .map(|(spelling, symbol)| (*symbol, spelling.len()))
}

/// A lexed token: its kind plus the source text it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub symbol: Symbol,
    pub text: String,
}

impl Token {
    pub fn new(symbol: Symbol, text: impl Into<String>) -> Self {
        Token {
            symbol,
            text: text.into(),
        }
    }

    /// A token for a bare word, promoted to a keyword when it spells one.
    pub fn word(text: impl Into<String>) -> Self {
        let text = text.into();
        let symbol = keyword(&text).unwrap_or(Symbol::String);
        Token { symbol, text }
    }

    pub fn binding_power(&self) -> u8 {
        self.symbol.binding_power()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol {
            Symbol::Int | Symbol::Float | Symbol::String => f.write_str(&self.text),
            other => f.write_str(other.info().text),
        }
    }
}
