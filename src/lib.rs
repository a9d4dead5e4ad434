//! # Treelox - A Tree-Walking Lox Interpreter
//!
//! An interpreter for a subset of the Lox language: numbers, strings,
//! booleans and `nil`, global and block-scoped variables, `print`, `if`,
//! `while` and `for`, with short-circuiting `and` / `or`.
//!
//! ## Quick Start
//!
//! ```rust
//! use treelox::Interpreter;
//!
//! let code = r#"
//!     var sum = 0;
//!     for (var i = 1; i <= 10; i = i + 1) sum = sum + i;
//!     print sum;
//! "#;
//!
//! let mut interpreter = Interpreter::with_output(Vec::new());
//! let errors = treelox::run(code, &mut interpreter);
//!
//! assert!(errors.is_empty());
//! assert_eq!(interpreter.output().as_slice(), b"55\n");
//! ```
//!
//! ### Driving the stages yourself
//!
//! ```rust
//! use treelox::{parse, scan, Interpreter, Value};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let (tokens, lex_errors) = scan("var greeting = \"hello\"; greeting + \" world\";");
//! assert!(lex_errors.is_empty());
//!
//! let (statements, parse_errors) = parse(tokens);
//! assert!(parse_errors.is_empty());
//!
//! let mut interpreter = Interpreter::with_output(Vec::new());
//! interpreter.execute(&statements[0])?;
//! let value = interpreter.execute(&statements[1])?;
//!
//! assert_eq!(value, Some(Value::String("hello world".to_string())));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Code → Scanner → Tokens → Parser → AST → Interpreter → Output
//! ```
//!
//! - [`Scanner`] - Tokenizes source code into tokens
//! - [`Parser`] - Recursive descent parser producing [`Stmt`] and [`Expr`] trees
//! - [`Interpreter`] - Executes statements and writes `print` output to a sink
//! - [`Environment`] - Variable storage with block scoping
//! - [`Value`] - Runtime value representation
//!
//! ## Error Handling
//!
//! Every stage collects diagnostics instead of stopping at the first one.
//! All of them render as `[line N] Error<where>: message`:
//!
//! ```rust
//! use treelox::Interpreter;
//!
//! let mut interpreter = Interpreter::with_output(Vec::new());
//! let errors = treelox::run("print (3;", &mut interpreter);
//!
//! assert_eq!(errors.len(), 1);
//! assert_eq!(
//!     errors[0].to_string(),
//!     "[line 1] Error at ';': Expect ')' after expression."
//! );
//! ```

/// Version of the treelox interpreter
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod runtime;

// Re-export main types
pub use config::InterpreterConfig;
pub use error::{Error, ErrorPhase, Result};
pub use lexer::{scan, Literal, Scanner, Token, TokenKind};
pub use parser::{parse, AstPrinter, Expr, Parser, Stmt};
pub use runtime::{Environment, Interpreter, Value};

/// Scans, parses and executes `source` against `interpreter`.
///
/// If scanning or parsing reports anything, all of those diagnostics are
/// returned and nothing is executed. Otherwise the program runs and one
/// diagnostic is returned per statement that failed at runtime.
pub fn run<W: std::io::Write>(source: &str, interpreter: &mut Interpreter<W>) -> Vec<Error> {
    let (tokens, mut errors) = scan(source);
    let (statements, parse_errors) = parse(tokens);
    errors.extend(parse_errors);

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "skipping execution after static errors");
        return errors;
    }

    interpreter.interpret(&statements)
}
