//! Formula lexer

use std::iter::Peekable;
use std::str::CharIndices;

use super::token::{Attribute, Token, TokenKind};
use super::FormulaError;

/// Characters allowed after the first letter of a scope item name.
fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.' || c.is_whitespace()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

pub struct Lexer<'a> {
    source: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            chars: source.char_indices().peekable(),
        }
    }

    /// Tokenize the whole formula. The last token is always `Eof`.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, FormulaError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        Ok(tokens)
    }

    fn next_token(&mut self) -> Result<Token, FormulaError> {
        self.skip_whitespace();

        let Some(&(offset, c)) = self.chars.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                offset: self.source.len(),
            });
        };

        let kind = match c {
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            '+' => self.single(TokenKind::Plus),
            '-' => self.single(TokenKind::Minus),
            '*' => self.single(TokenKind::Star),
            '/' => self.single(TokenKind::Slash),
            '=' => {
                self.advance();
                self.eat('=');
                TokenKind::Eq
            }
            '!' => {
                self.advance();
                if !self.eat('=') {
                    return Err(FormulaError::UnexpectedCharacter { ch: '!', offset });
                }
                TokenKind::Ne
            }
            '<' => {
                self.advance();
                if self.eat('=') {
                    TokenKind::Le
                } else if self.eat('>') {
                    TokenKind::Ne
                } else {
                    TokenKind::Lt
                }
            }
            '>' => {
                self.advance();
                if self.eat('=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            '"' | '\'' => self.scan_text(offset, c)?,
            c if c.is_ascii_digit() || c == '.' => self.scan_number(offset)?,
            c if c.is_ascii_alphabetic() => self.scan_name(offset)?,
            other => {
                return Err(FormulaError::UnexpectedCharacter { ch: other, offset });
            }
        };

        Ok(Token { kind, offset })
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    fn advance(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn eat(&mut self, expected: char) -> bool {
        match self.chars.peek() {
            Some(&(_, c)) if c == expected => {
                self.advance();
                true
            }
            _ => false,
        }
    }

    fn position(&mut self) -> usize {
        self.chars
            .peek()
            .map(|&(i, _)| i)
            .unwrap_or(self.source.len())
    }

    fn skip_whitespace(&mut self) {
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_text(&mut self, start: usize, quote: char) -> Result<TokenKind, FormulaError> {
        self.advance();
        let body_start = self.position();

        while let Some((i, c)) = self.chars.next() {
            if c == quote {
                return Ok(TokenKind::Text(self.source[body_start..i].to_string()));
            }
        }

        Err(FormulaError::UnterminatedString { offset: start })
    }

    fn scan_number(&mut self, start: usize) -> Result<TokenKind, FormulaError> {
        let mut seen_dot = false;
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                self.advance();
            } else {
                break;
            }
        }

        let end = self.position();
        let text = &self.source[start..end];
        text.parse::<f64>()
            .map(TokenKind::Number)
            .map_err(|_| FormulaError::InvalidNumber {
                text: text.to_string(),
                offset: start,
            })
    }

    /// A letter starts either a `Name[Attribute]` reference or a plain word.
    ///
    /// The longest run of name characters is tried first; when it is not
    /// followed by `[` only the leading word is consumed.
    fn scan_name(&mut self, start: usize) -> Result<TokenKind, FormulaError> {
        let rest = &self.source[start..];
        let run_len = rest
            .char_indices()
            .find(|&(_, c)| !is_name_char(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());

        if rest[run_len..].starts_with('[') {
            let after_bracket = &rest[run_len + 1..];
            let Some(close) = after_bracket.find(']') else {
                return Err(FormulaError::UnexpectedCharacter {
                    ch: '[',
                    offset: start + run_len,
                });
            };
            let item = rest[..run_len].trim().to_string();
            let raw_attribute = &after_bracket[..close];
            let Some(attribute) = Attribute::parse(raw_attribute) else {
                return Err(FormulaError::UnknownAttribute {
                    item,
                    attribute: raw_attribute.to_string(),
                });
            };

            let end = start + run_len + 1 + close + 1;
            while self.position() < end {
                self.advance();
            }
            return Ok(TokenKind::Reference { item, attribute });
        }

        let word_len = rest
            .char_indices()
            .find(|&(_, c)| !is_word_char(c))
            .map(|(i, _)| i)
            .unwrap_or(rest.len());
        let end = start + word_len;
        while self.position() < end {
            self.advance();
        }
        Ok(TokenKind::Identifier(rest[..word_len].to_string()))
    }
}
