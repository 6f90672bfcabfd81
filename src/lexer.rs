use std::fmt;

use crate::ast::{Symbol, Token, tokens::longest_keyword_prefix};

/// Character offset into the source expression.
pub type Position = usize;

/// Errors raised while scanning literals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// A quoted string with no closing quote
    UnterminatedString { position: Position },

    /// A backslash followed by a character that has no escape meaning
    InvalidEscape { escape: char, position: Position },

    /// A number that cannot be represented (bad exponent, overflow)
    MalformedNumber { text: String, position: Position },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnterminatedString { position } => {
                write!(f, "Unterminated string starting at position {}", position)
            }
            LexError::InvalidEscape { escape, position } => {
                write!(f, "Invalid escape sequence '\\{}' at position {}", escape, position)
            }
            LexError::MalformedNumber { text, position } => {
                write!(f, "Malformed number '{}' at position {}", text, position)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Converts expression text into a flat token list.
pub fn lex(input: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(input).tokenize()
}

/// Strips the quotes from a quoted string token and resolves its escapes.
///
/// Text that is not quoted is returned unchanged.
pub fn unquote(text: &str) -> String {
    let inner = match text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => inner,
        None => return text.to_string(),
    };

    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            result.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some(other) => result.push(other),
            None => result.push('\\'),
        }
    }
    result
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    // Punctuation collected since the last flush
    pending: String,
    tokens: Vec<Token>,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            pending: String::new(),
            tokens: Vec::new(),
        }
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    /// Scans the whole input.
    pub fn tokenize(mut self) -> Result<Vec<Token>, LexError> {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.flush();
                self.advance();
            } else if ch == '"' {
                self.flush();
                let text = self.read_string()?;
                self.tokens.push(Token::new(Symbol::String, text));
            } else if ch.is_ascii_digit()
                || (ch == '.' && self.peek_char(1).is_some_and(|c| c.is_ascii_digit()))
            {
                self.flush();
                let token = self.read_number()?;
                self.tokens.push(token);
            } else if ch.is_alphabetic() || ch == '_' {
                self.flush();
                let ident = self.read_identifier();
                self.tokens.push(Token::word(ident));
            } else if ch == '/' {
                // Path separators never join a punctuation run
                self.flush();
                self.tokens.push(Token::new(Symbol::Path, "/"));
                self.advance();
            } else {
                self.pending.push(ch);
                self.advance();
            }
        }
        self.flush();
        Ok(self.tokens)
    }

    /// Splits the pending punctuation run into operators, longest match first.
    /// Whatever cannot be matched becomes a bare string.
    fn flush(&mut self) {
        let pending = std::mem::take(&mut self.pending);
        let mut rest = pending.as_str();
        while !rest.is_empty() {
            match longest_keyword_prefix(rest) {
                Some((symbol, len)) => {
                    self.tokens.push(Token::new(symbol, &rest[..len]));
                    rest = &rest[len..];
                }
                None => {
                    self.tokens.push(Token::new(Symbol::String, rest));
                    rest = "";
                }
            }
        }
    }

    fn read_identifier(&mut self) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if ch.is_alphanumeric() || ch == '_' {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    /// Reads a quoted string, keeping the quotes and escapes verbatim.
    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::from('"');
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '"' => {
                    result.push(ch);
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    let escape_position = self.position;
                    self.advance(); // Consume backslash
                    match self.current_char() {
                        Some(esc @ ('n' | 't' | 'r' | '"' | '\\' | '/')) => {
                            result.push('\\');
                            result.push(esc);
                            self.advance();
                        }
                        Some(escape) => {
                            return Err(LexError::InvalidEscape {
                                escape,
                                position: escape_position,
                            });
                        }
                        None => return Err(LexError::UnterminatedString { position: start }),
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Result<Token, LexError> {
        let start = self.position;
        let mut number = String::new();
        let mut is_float = false;

        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else if ch == '.' && !is_float {
                // Either side of the point may be empty: `.5`, `1.`
                is_float = true;
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if let Some(e @ ('e' | 'E')) = self.current_char() {
            is_float = true;
            number.push(e);
            self.advance();
            if let Some(sign @ ('+' | '-')) = self.current_char() {
                number.push(sign);
                self.advance();
            }
            let mut digits = 0;
            while let Some(ch) = self.current_char().filter(|c| c.is_ascii_digit()) {
                number.push(ch);
                self.advance();
                digits += 1;
            }
            if digits == 0 {
                return Err(LexError::MalformedNumber {
                    text: number,
                    position: start,
                });
            }
        }

        let valid = if is_float {
            number.parse::<f64>().is_ok_and(f64::is_finite)
        } else {
            number.parse::<i64>().is_ok()
        };
        if !valid {
            return Err(LexError::MalformedNumber {
                text: number,
                position: start,
            });
        }

        let symbol = if is_float { Symbol::Float } else { Symbol::Int };
        Ok(Token::new(symbol, number))
    }
}

#[test]
fn test_operators_split_from_runs() {
    let tokens = lex("a/b==\"c\"").unwrap();
    let symbols: Vec<Symbol> = tokens.iter().map(|t| t.symbol).collect();
    assert_eq!(
        symbols,
        vec![Symbol::String, Symbol::Path, Symbol::String, Symbol::Eql, Symbol::String]
    );
    assert_eq!(tokens[4].text, "\"c\"");
}

#[test]
fn test_unquote() {
    assert_eq!(unquote("\"a/b\""), "a/b");
    assert_eq!(unquote("\"say \\\"hi\\\"\""), "say \"hi\"");
    assert_eq!(unquote("\"tab\\there\""), "tab\there");
    assert_eq!(unquote("plain"), "plain");
    assert_eq!(unquote("\""), "\"");
}
