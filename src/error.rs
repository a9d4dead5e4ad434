//! Error types for the treelox interpreter

use thiserror::Error;

use crate::lexer::{Token, TokenKind};

/// Treelox diagnostics
///
/// Every variant renders as `[line <n>] Error<where>: <message>`, where
/// `<where>` is empty for lexical errors, `" at end"` for the end-of-input
/// token, or `" at '<lexeme>'"` otherwise.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Lexical error raised by the scanner
    ///
    /// **Triggered by:** an unterminated string or an unexpected character
    /// **Example:** `"foo` (no closing quote), `&`
    /// **Recovery:** the scanner skips the offending input and keeps going
    #[error("[line {line}] Error: {message}")]
    Lex {
        /// Line number where the error occurred (1-indexed)
        line: usize,
        /// Error description
        message: String,
    },

    /// Syntax error raised by the parser
    ///
    /// **Triggered by:** a missing token, a missing expression, or an
    /// invalid assignment target
    /// **Example:** `(3;` (missing closing parenthesis)
    /// **Recovery:** the parser synchronizes to the next statement boundary
    #[error("[line {line}] Error{location}: {message}")]
    Parse {
        /// Line number of the offending token
        line: usize,
        /// Location description (`" at end"` or `" at '<lexeme>'"`)
        location: String,
        /// Error description
        message: String,
    },

    /// Runtime error raised by the interpreter
    ///
    /// **Triggered by:** undefined variables, operands of the wrong type, or a
    /// failing output sink
    /// **Example:** `-"abc";`, `a = 5;` when `a` was never declared
    /// **Recovery:** aborts the current top-level statement only
    #[error("[line {line}] Error{location}: {message}")]
    Runtime {
        /// Line number of the offending token
        line: usize,
        /// Location description (`" at end"` or `" at '<lexeme>'"`)
        location: String,
        /// Error description
        message: String,
    },
}

/// Stage of the pipeline that produced an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPhase {
    /// Scanning
    Lex,
    /// Parsing
    Parse,
    /// Evaluation
    Runtime,
}

/// Location description for a diagnostic attached to `token`
fn location_of(token: &Token) -> String {
    match token.kind {
        TokenKind::Eof => " at end".to_string(),
        _ => format!(" at '{}'", token.lexeme),
    }
}

impl Error {
    /// Create a lexical error on the given line
    pub fn lex(line: usize, message: impl Into<String>) -> Self {
        Error::Lex {
            line,
            message: message.into(),
        }
    }

    /// Create a syntax error located at `token`
    pub fn at_token(token: &Token, message: impl Into<String>) -> Self {
        Error::Parse {
            line: token.line,
            location: location_of(token),
            message: message.into(),
        }
    }

    /// Create a runtime error located at `token`
    pub fn runtime(token: &Token, message: impl Into<String>) -> Self {
        Error::Runtime {
            line: token.line,
            location: location_of(token),
            message: message.into(),
        }
    }

    /// Create a runtime error for a failed write to the output sink
    pub fn output(line: usize, source: &std::io::Error) -> Self {
        Error::Runtime {
            line,
            location: String::new(),
            message: format!("Failed to write output: {}", source),
        }
    }

    /// Line the diagnostic points at
    pub fn line(&self) -> usize {
        match self {
            Error::Lex { line, .. } | Error::Parse { line, .. } | Error::Runtime { line, .. } => {
                *line
            }
        }
    }

    /// The bare message, without line or location
    pub fn message(&self) -> &str {
        match self {
            Error::Lex { message, .. }
            | Error::Parse { message, .. }
            | Error::Runtime { message, .. } => message,
        }
    }

    /// Classify which stage produced the error
    pub fn phase(&self) -> ErrorPhase {
        match self {
            Error::Lex { .. } => ErrorPhase::Lex,
            Error::Parse { .. } => ErrorPhase::Parse,
            Error::Runtime { .. } => ErrorPhase::Runtime,
        }
    }
}

/// Result type for treelox operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lex_error_format() {
        let err = Error::lex(3, "unexpected character");
        assert_eq!(err.to_string(), "[line 3] Error: unexpected character");
        assert_eq!(err.phase(), ErrorPhase::Lex);
    }

    #[test]
    fn test_parse_error_at_lexeme() {
        let token = Token::new(TokenKind::Semicolon, ";".to_string(), None, 1);
        let err = Error::at_token(&token, "Expect ')' after expression.");
        assert_eq!(
            err.to_string(),
            "[line 1] Error at ';': Expect ')' after expression."
        );
        assert_eq!(err.line(), 1);
        assert_eq!(err.message(), "Expect ')' after expression.");
    }

    #[test]
    fn test_parse_error_at_end() {
        let token = Token::new(TokenKind::Eof, String::new(), None, 7);
        let err = Error::at_token(&token, "Expect expression.");
        assert_eq!(err.to_string(), "[line 7] Error at end: Expect expression.");
    }

    #[test]
    fn test_runtime_error_phase() {
        let token = Token::new(TokenKind::Identifier, "a".to_string(), None, 2);
        let err = Error::runtime(&token, "Undefined variable 'a'.");
        assert_eq!(err.phase(), ErrorPhase::Runtime);
        assert_eq!(
            err.to_string(),
            "[line 2] Error at 'a': Undefined variable 'a'."
        );
    }
}
