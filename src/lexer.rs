use std::fmt;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::ast::{Token, TokenKind};

/// Errors produced while tokenizing; each carries the char offset of the
/// offending input.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// Character outside the expression grammar
    UnexpectedChar { ch: char, pos: usize },

    /// String or typed literal missing its closing quote
    UnterminatedString { pos: usize },

    /// Malformed numeric literal (bad digits, bad suffix, out of range)
    InvalidNumber { lexeme: String, pos: usize },

    /// Malformed datetime/guid/binary literal body
    InvalidLiteral {
        kind: &'static str,
        body: String,
        pos: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnexpectedChar { ch, pos } => {
                write!(f, "unexpected character '{}' at offset {}", ch, pos)
            }
            LexError::UnterminatedString { pos } => {
                write!(f, "unterminated string literal starting at offset {}", pos)
            }
            LexError::InvalidNumber { lexeme, pos } => {
                write!(f, "invalid numeric literal '{}' at offset {}", lexeme, pos)
            }
            LexError::InvalidLiteral { kind, body, pos } => {
                write!(f, "invalid {} literal '{}' at offset {}", kind, body, pos)
            }
        }
    }
}

impl std::error::Error for LexError {}

/// Parse the body of a `datetime'...'` literal. Seconds and fractional
/// seconds are optional.
pub(crate) fn parse_datetime_body(body: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M:%S"))
        .or_else(|_| NaiveDateTime::parse_from_str(body, "%Y-%m-%dT%H:%M"))
        .ok()
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
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

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
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

    /// Read a single-quoted string body. An embedded quote is escaped by
    /// doubling it ('O''Brien').
    fn read_quoted(&mut self) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // consume opening quote

        while let Some(ch) = self.current_char() {
            if ch == '\'' {
                if self.peek_char(1) == Some('\'') {
                    result.push('\'');
                    self.advance();
                    self.advance();
                } else {
                    self.advance();
                    return Ok(result);
                }
            } else {
                result.push(ch);
                self.advance();
            }
        }

        Err(LexError::UnterminatedString { pos: start })
    }

    /// Read a numeric literal. The subtype is fixed by the lexical form:
    /// `L` -> Int64, `F` -> Single, `M` -> Decimal, `D` -> Double; a bare
    /// decimal point or exponent -> Double; bare digits -> Int32.
    fn read_number(&mut self, negative: bool) -> Result<TokenKind, LexError> {
        let start = if negative {
            self.position - 1
        } else {
            self.position
        };
        let mut lexeme = String::new();
        if negative {
            lexeme.push('-');
        }

        let mut has_point = false;
        let mut has_exp = false;
        while let Some(ch) = self.current_char() {
            if ch.is_ascii_digit() {
                lexeme.push(ch);
                self.advance();
            } else if ch == '.' && !has_point && !has_exp {
                if !self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    return Err(LexError::InvalidNumber {
                        lexeme: format!("{}.", lexeme),
                        pos: start,
                    });
                }
                has_point = true;
                lexeme.push(ch);
                self.advance();
            } else if (ch == 'e' || ch == 'E') && !has_exp {
                let mut ahead = 1;
                if matches!(self.peek_char(1), Some('+') | Some('-')) {
                    ahead = 2;
                }
                if !self.peek_char(ahead).is_some_and(|c| c.is_ascii_digit()) {
                    break; // not an exponent; leave for suffix handling
                }
                has_exp = true;
                lexeme.push(ch);
                self.advance();
                if let Some(sign) = self.current_char()
                    && (sign == '+' || sign == '-')
                {
                    lexeme.push(sign);
                    self.advance();
                }
            } else {
                break;
            }
        }

        let suffix = match self.current_char() {
            Some(c @ ('L' | 'l' | 'F' | 'f' | 'D' | 'd' | 'M' | 'm')) => {
                self.advance();
                Some(c.to_ascii_uppercase())
            }
            _ => None,
        };

        // The literal must end at a word boundary; '6LX' is not a token.
        if self.current_char().is_some_and(|c| c.is_alphanumeric() || c == '_') {
            return Err(LexError::InvalidNumber {
                lexeme,
                pos: start,
            });
        }

        let invalid = |lexeme: String| LexError::InvalidNumber { lexeme, pos: start };

        match suffix {
            Some('L') => {
                if has_point || has_exp {
                    return Err(invalid(lexeme));
                }
                lexeme
                    .parse::<i64>()
                    .map(TokenKind::Int64)
                    .map_err(|_| invalid(lexeme))
            }
            Some('F') => lexeme
                .parse::<f32>()
                .map(TokenKind::Single)
                .map_err(|_| invalid(lexeme)),
            Some('D') => lexeme
                .parse::<f64>()
                .map(TokenKind::Double)
                .map_err(|_| invalid(lexeme)),
            Some('M') => {
                let parsed = if has_exp {
                    Decimal::from_scientific(&lexeme)
                } else {
                    lexeme.parse::<Decimal>()
                };
                parsed.map(TokenKind::Decimal).map_err(|_| invalid(lexeme))
            }
            _ if has_point || has_exp => lexeme
                .parse::<f64>()
                .map(TokenKind::Double)
                .map_err(|_| invalid(lexeme)),
            _ => lexeme
                .parse::<i32>()
                .map(TokenKind::Int32)
                .map_err(|_| invalid(lexeme)),
        }
    }

    /// Read the quoted body following a datetime/guid/binary keyword and
    /// parse it into the typed literal.
    fn read_typed_literal(&mut self, kind: &'static str, start: usize) -> Result<TokenKind, LexError> {
        let body = self.read_quoted()?;
        let invalid = || LexError::InvalidLiteral {
            kind,
            body: body.clone(),
            pos: start,
        };
        match kind {
            "datetime" => parse_datetime_body(&body)
                .map(TokenKind::DateTime)
                .ok_or_else(invalid),
            "guid" => Uuid::parse_str(&body)
                .map(TokenKind::Guid)
                .map_err(|_| invalid()),
            "binary" => hex::decode(&body)
                .map(TokenKind::Binary)
                .map_err(|_| invalid()),
            _ => unreachable!(),
        }
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        let pos = self.position;

        let kind = match self.current_char() {
            None => TokenKind::Eof,
            Some('/') => {
                self.advance();
                TokenKind::Slash
            }
            Some('(') => {
                self.advance();
                TokenKind::LParen
            }
            Some(')') => {
                self.advance();
                TokenKind::RParen
            }
            Some(',') => {
                self.advance();
                TokenKind::Comma
            }
            Some('-') => {
                // a sign directly attached to digits is part of the literal;
                // the arithmetic operator is the word 'sub'
                if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) {
                    self.advance();
                    self.read_number(true)?
                } else {
                    self.advance();
                    TokenKind::Minus
                }
            }
            Some('\'') => TokenKind::String(self.read_quoted()?),
            Some(ch) if ch.is_alphabetic() || ch == '_' => {
                let ident = self.read_identifier();

                match ident.as_str() {
                    "and" => TokenKind::And,
                    "or" => TokenKind::Or,
                    "not" => TokenKind::Not,
                    "eq" => TokenKind::Eq,
                    "ne" => TokenKind::Ne,
                    "lt" => TokenKind::Lt,
                    "le" => TokenKind::Le,
                    "gt" => TokenKind::Gt,
                    "ge" => TokenKind::Ge,
                    "add" => TokenKind::Add,
                    "sub" => TokenKind::Sub,
                    "mul" => TokenKind::Mul,
                    "div" => TokenKind::Div,
                    "mod" => TokenKind::Mod,
                    "true" => TokenKind::Boolean(true),
                    "false" => TokenKind::Boolean(false),
                    "null" => TokenKind::Null,
                    "datetime" if self.current_char() == Some('\'') => {
                        self.read_typed_literal("datetime", pos)?
                    }
                    "guid" if self.current_char() == Some('\'') => {
                        self.read_typed_literal("guid", pos)?
                    }
                    "binary" | "X" if self.current_char() == Some('\'') => {
                        self.read_typed_literal("binary", pos)?
                    }
                    _ => TokenKind::Identifier(ident),
                }
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(false)?,
            Some(ch) => return Err(LexError::UnexpectedChar { ch, pos }),
        };

        Ok(Token::new(kind, pos))
    }

    /// Tokenize the whole input eagerly.
    pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(input);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token()?;
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                return Ok(tokens);
            }
        }
    }
}

#[test]
fn test_keywords() {
    let mut lexer = Lexer::new("and or not eq ne lt le gt ge add sub mul div mod");
    let expected = [
        TokenKind::And,
        TokenKind::Or,
        TokenKind::Not,
        TokenKind::Eq,
        TokenKind::Ne,
        TokenKind::Lt,
        TokenKind::Le,
        TokenKind::Gt,
        TokenKind::Ge,
        TokenKind::Add,
        TokenKind::Sub,
        TokenKind::Mul,
        TokenKind::Div,
        TokenKind::Mod,
    ];
    for kind in expected {
        assert_eq!(lexer.next_token().unwrap().kind, kind);
    }
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eof);
}

#[test]
fn test_property_path() {
    let mut lexer = Lexer::new("Order/Customer/CustomerID eq 'ANU'");
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier("Order".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Slash);
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier("Customer".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Slash);
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::Identifier("CustomerID".to_string())
    );
    assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Eq);
    assert_eq!(
        lexer.next_token().unwrap().kind,
        TokenKind::String("ANU".to_string())
    );
}
