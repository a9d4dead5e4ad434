use serde::{Deserialize, Serialize};

/// A single token from the source code
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The type of token
    pub kind: TokenKind,
    /// Original text of the token
    pub lexeme: String,
    /// Decoded literal value for number and string tokens
    pub literal: Option<Literal>,
    /// Line number where token appears (1-indexed)
    pub line: usize,
}

impl Token {
    /// Creates a new token with the given properties
    pub fn new(kind: TokenKind, lexeme: String, literal: Option<Literal>, line: usize) -> Self {
        Token {
            kind,
            lexeme,
            literal,
            line,
        }
    }
}

/// Literal payload decoded by the scanner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    /// Numeric literal
    Number(f64),
    /// String literal, without the surrounding quotes
    String(String),
}

/// All possible token types in treelox
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    // Single-character tokens
    /// Left parenthesis (
    LeftParen,
    /// Right parenthesis )
    RightParen,
    /// Left brace {
    LeftBrace,
    /// Right brace }
    RightBrace,
    /// Comma delimiter
    Comma,
    /// Dot
    Dot,
    /// Minus operator (-)
    Minus,
    /// Plus operator (+)
    Plus,
    /// Semicolon statement terminator
    Semicolon,
    /// Slash operator (/)
    Slash,
    /// Star operator (*)
    Star,

    // One or two character tokens
    /// Logical not (!)
    Bang,
    /// Inequality operator (!=)
    BangEqual,
    /// Assignment (=)
    Equal,
    /// Equality operator (==)
    EqualEqual,
    /// Greater than (>)
    Greater,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessEqual,

    // Literals
    /// Identifier
    Identifier,
    /// String literal
    String,
    /// Number literal
    Number,

    // Keywords
    /// AND keyword
    And,
    /// CLASS keyword (reserved)
    Class,
    /// ELSE keyword
    Else,
    /// FALSE literal
    False,
    /// FUN keyword (reserved)
    Fun,
    /// FOR keyword
    For,
    /// IF keyword
    If,
    /// NIL literal
    Nil,
    /// OR keyword
    Or,
    /// PRINT keyword
    Print,
    /// RETURN keyword (reserved)
    Return,
    /// SUPER keyword (reserved)
    Super,
    /// THIS keyword (reserved)
    This,
    /// TRUE literal
    True,
    /// VAR keyword
    Var,
    /// WHILE keyword
    While,

    // Special
    /// End of file marker
    Eof,
}

impl TokenKind {
    /// Get keyword from string, `None` for plain identifiers
    pub fn keyword(s: &str) -> Option<TokenKind> {
        let kind = match s {
            "and" => TokenKind::And,
            "class" => TokenKind::Class,
            "else" => TokenKind::Else,
            "false" => TokenKind::False,
            "fun" => TokenKind::Fun,
            "for" => TokenKind::For,
            "if" => TokenKind::If,
            "nil" => TokenKind::Nil,
            "or" => TokenKind::Or,
            "print" => TokenKind::Print,
            "return" => TokenKind::Return,
            "super" => TokenKind::Super,
            "this" => TokenKind::This,
            "true" => TokenKind::True,
            "var" => TokenKind::Var,
            "while" => TokenKind::While,
            _ => return None,
        };
        Some(kind)
    }

    /// Check if token is a keyword
    pub fn is_keyword(&self) -> bool {
        matches!(
            self,
            TokenKind::And
                | TokenKind::Class
                | TokenKind::Else
                | TokenKind::False
                | TokenKind::Fun
                | TokenKind::For
                | TokenKind::If
                | TokenKind::Nil
                | TokenKind::Or
                | TokenKind::Print
                | TokenKind::Return
                | TokenKind::Super
                | TokenKind::This
                | TokenKind::True
                | TokenKind::Var
                | TokenKind::While
        )
    }

    /// Keywords that begin a declaration or statement.
    ///
    /// The parser stops discarding tokens at one of these after an error.
    pub fn starts_statement(&self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return
        )
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
