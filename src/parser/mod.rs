//! Treelox Parser Module
//!
//! Parses the token stream into statements and expressions.

mod ast;
#[allow(clippy::module_inception)]
mod parser;
mod printer;

pub use ast::{Expr, Stmt};
pub use parser::{parse, Parser, MAX_NESTING_DEPTH};
pub use printer::AstPrinter;
