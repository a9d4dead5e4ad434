use super::token::{Literal, Token, TokenKind};
use crate::error::Error;

/// Scanner for treelox source text
///
/// Works over the raw bytes of the source. Lexical errors are collected and
/// scanning continues past them, so one pass reports every problem.
pub struct Scanner<'src> {
    /// Source code
    source: &'src str,
    /// Accumulated tokens
    tokens: Vec<Token>,
    /// Accumulated lexical errors
    errors: Vec<Error>,
    /// Start offset of current lexeme
    start: usize,
    /// Current offset in source
    current: usize,
    /// Current line number (1-indexed)
    line: usize,
}

/// Scans `source` into tokens, collecting every lexical error
pub fn scan(source: &str) -> (Vec<Token>, Vec<Error>) {
    Scanner::new(source).scan_tokens()
}

impl<'src> Scanner<'src> {
    /// Creates a new scanner from source code
    pub fn new(source: &'src str) -> Self {
        Scanner {
            source,
            tokens: Vec::new(),
            errors: Vec::new(),
            start: 0,
            current: 0,
            line: 1,
        }
    }

    /// Scans all tokens from source code.
    ///
    /// The token list always ends with an `Eof` token, even when errors were
    /// reported.
    pub fn scan_tokens(&mut self) -> (Vec<Token>, Vec<Error>) {
        while !self.is_at_end() {
            self.start = self.current;
            self.scan_token();
        }

        self.tokens
            .push(Token::new(TokenKind::Eof, String::new(), None, self.line));

        (
            std::mem::take(&mut self.tokens),
            std::mem::take(&mut self.errors),
        )
    }

    fn scan_token(&mut self) {
        let c = self.advance();

        match c {
            b' ' | b'\r' | b'\t' => {}
            b'\n' => self.line += 1,

            b'(' => self.add_token(TokenKind::LeftParen),
            b')' => self.add_token(TokenKind::RightParen),
            b'{' => self.add_token(TokenKind::LeftBrace),
            b'}' => self.add_token(TokenKind::RightBrace),
            b',' => self.add_token(TokenKind::Comma),
            b'.' => self.add_token(TokenKind::Dot),
            b'-' => self.add_token(TokenKind::Minus),
            b'+' => self.add_token(TokenKind::Plus),
            b';' => self.add_token(TokenKind::Semicolon),
            b'*' => self.add_token(TokenKind::Star),

            b'!' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::BangEqual
                } else {
                    TokenKind::Bang
                };
                self.add_token(kind);
            }
            b'=' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::EqualEqual
                } else {
                    TokenKind::Equal
                };
                self.add_token(kind);
            }
            b'<' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::LessEqual
                } else {
                    TokenKind::Less
                };
                self.add_token(kind);
            }
            b'>' => {
                let kind = if self.match_byte(b'=') {
                    TokenKind::GreaterEqual
                } else {
                    TokenKind::Greater
                };
                self.add_token(kind);
            }

            b'/' => {
                if self.match_byte(b'/') {
                    self.skip_line_comment();
                } else {
                    self.add_token(TokenKind::Slash);
                }
            }

            b'"' => self.scan_string(),

            c if c.is_ascii_digit() => self.scan_number(),

            c if is_alpha(c) => self.scan_identifier_or_keyword(),

            _ => {
                // Swallow the rest of a multi-byte character so it is reported once
                while !self.is_at_end() && is_utf8_continuation(self.peek()) {
                    self.current += 1;
                }
                self.errors.push(Error::lex(self.line, "unexpected character"));
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.is_at_end() && self.peek() != b'\n' {
            self.advance();
        }
    }

    fn scan_string(&mut self) {
        while !self.is_at_end() && self.peek() != b'"' {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            self.errors.push(Error::lex(self.line, "unterminated string"));
            return;
        }

        self.advance(); // Closing "

        let value = self.source[self.start + 1..self.current - 1].to_string();
        self.add_literal_token(TokenKind::String, Some(Literal::String(value)));
    }

    fn scan_number(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // A trailing '.' stays out of the number unless a digit follows it
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        let text = &self.source[self.start..self.current];
        match text.parse::<f64>() {
            Ok(value) => self.add_literal_token(TokenKind::Number, Some(Literal::Number(value))),
            Err(_) => self
                .errors
                .push(Error::lex(self.line, format!("invalid number '{}'", text))),
        }
    }

    fn scan_identifier_or_keyword(&mut self) {
        while is_alpha_numeric(self.peek()) {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let kind = TokenKind::keyword(text).unwrap_or(TokenKind::Identifier);
        self.add_token(kind);
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source.as_bytes()[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> u8 {
        if self.is_at_end() {
            b'\0'
        } else {
            self.source.as_bytes()[self.current]
        }
    }

    fn peek_next(&self) -> u8 {
        if self.current + 1 >= self.source.len() {
            b'\0'
        } else {
            self.source.as_bytes()[self.current + 1]
        }
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.source.as_bytes()[self.current] != expected {
            false
        } else {
            self.current += 1;
            true
        }
    }

    fn add_token(&mut self, kind: TokenKind) {
        self.add_literal_token(kind, None);
    }

    fn add_literal_token(&mut self, kind: TokenKind, literal: Option<Literal>) {
        let lexeme = self.source[self.start..self.current].to_string();
        self.tokens
            .push(Token::new(kind, lexeme, literal, self.line));
    }
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_alpha_numeric(c: u8) -> bool {
    is_alpha(c) || c.is_ascii_digit()
}

fn is_utf8_continuation(c: u8) -> bool {
    c & 0xC0 == 0x80
}
