//! Lexical analysis for treelox
//!
//! Converts source text into a stream of tokens.

mod scanner;
mod token;

pub use scanner::{scan, Scanner};
pub use token::{Literal, Token, TokenKind};
