use std::io::{self, Stdout, Write};

use crate::config::InterpreterConfig;
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::parser::{Expr, Stmt};
use crate::runtime::{Environment, Value};

/// Tree-walking interpreter
///
/// Executes statements against a global environment that lives as long as
/// the interpreter. `print` output goes to the injected sink `W`.
pub struct Interpreter<W: Write = Stdout> {
    /// Variable environment
    env: Environment,
    /// Runtime limits
    config: InterpreterConfig,
    /// Destination of `print` statements
    out: W,
}

impl Interpreter<Stdout> {
    /// Creates an interpreter that prints to stdout
    pub fn new() -> Self {
        Interpreter::with_output(io::stdout())
    }
}

impl Default for Interpreter<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter that prints to `out`
    pub fn with_output(out: W) -> Self {
        Interpreter {
            env: Environment::new(),
            config: InterpreterConfig::default(),
            out,
        }
    }

    /// Replaces the runtime limits
    pub fn with_config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    /// Executes every top-level statement in order.
    ///
    /// A runtime error aborts only the statement it occurs in; later
    /// statements still run. Returns one diagnostic per failed statement.
    pub fn interpret(&mut self, statements: &[Stmt]) -> Vec<Error> {
        let mut errors = Vec::new();

        for statement in statements {
            if let Err(err) = self.execute(statement) {
                tracing::debug!(error = %err, "statement failed");
                errors.push(err);
            }
        }

        errors
    }

    /// Executes a single statement.
    ///
    /// Expression statements yield their value; every other statement
    /// yields `None`.
    pub fn execute(&mut self, stmt: &Stmt) -> Result<Option<Value>> {
        match stmt {
            Stmt::Expression(expr) => self.evaluate(expr).map(Some),

            Stmt::Print { keyword, value } => {
                let value = self.evaluate(value)?;
                writeln!(self.out, "{}", value).map_err(|e| Error::output(keyword.line, &e))?;
                Ok(None)
            }

            Stmt::Var { name, initializer } => {
                let value = match initializer {
                    Some(init) => self.evaluate(init)?,
                    None => Value::Nil,
                };
                self.env.define(name.lexeme.clone(), value);
                Ok(None)
            }

            Stmt::Block(statements) => {
                self.execute_block(statements)?;
                Ok(None)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                if self.evaluate(condition)?.is_truthy() {
                    self.execute(then_branch)?;
                } else if let Some(else_branch) = else_branch {
                    self.execute(else_branch)?;
                }
                Ok(None)
            }

            Stmt::While {
                keyword,
                condition,
                body,
            } => {
                self.execute_while(keyword, condition, body)?;
                Ok(None)
            }
        }
    }

    /// Runs `statements` in a fresh child scope.
    ///
    /// The scope is exited on every path, including when a statement fails.
    fn execute_block(&mut self, statements: &[Stmt]) -> Result<()> {
        self.env.enter_scope();
        let result = statements
            .iter()
            .try_for_each(|stmt| self.execute(stmt).map(|_| ()));
        self.env.exit_scope();
        result
    }

    fn execute_while(&mut self, keyword: &Token, condition: &Expr, body: &Stmt) -> Result<()> {
        let mut iterations: usize = 0;

        while self.evaluate(condition)?.is_truthy() {
            if let Some(limit) = self.config.max_loop_iterations {
                iterations += 1;
                if iterations > limit {
                    tracing::warn!(limit, line = keyword.line, "loop iteration limit exceeded");
                    return Err(Error::runtime(
                        keyword,
                        format!("Loop iteration limit of {} exceeded.", limit),
                    ));
                }
            }
            self.execute(body)?;
        }

        Ok(())
    }

    /// Evaluates an expression in the current scope
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Value> {
        match expr {
            Expr::Literal(value) => Ok(value.clone()),

            Expr::Grouping(inner) => self.evaluate(inner),

            Expr::Variable { name } => self.env.get(name),

            Expr::Assign { name, value } => {
                let value = self.evaluate(value)?;
                self.env.assign(name, value.clone())?;
                Ok(value)
            }

            Expr::Unary { operator, right } => {
                let right = self.evaluate(right)?;
                match operator.kind {
                    TokenKind::Minus => {
                        let n = number_operand(operator, &right)?;
                        Ok(Value::Number(-n))
                    }
                    TokenKind::Bang => Ok(Value::Boolean(!right.is_truthy())),
                    _ => Err(unknown_operator(operator)),
                }
            }

            Expr::Binary {
                left,
                operator,
                right,
            } => {
                // Both sides are evaluated before either result is inspected
                let left = self.evaluate(left);
                let right = self.evaluate(right);
                binary(operator, left?, right?)
            }

            Expr::Logical {
                left,
                operator,
                right,
            } => {
                let left = self.evaluate(left)?;
                let short_circuits = match operator.kind {
                    TokenKind::Or => left.is_truthy(),
                    TokenKind::And => !left.is_truthy(),
                    _ => return Err(unknown_operator(operator)),
                };
                if short_circuits {
                    Ok(left)
                } else {
                    self.evaluate(right)
                }
            }
        }
    }

    /// Discards every variable by replacing the global environment
    pub fn reset(&mut self) {
        self.env = Environment::new();
    }

    /// The variable environment
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// The runtime limits in effect
    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// The output sink
    pub fn output(&self) -> &W {
        &self.out
    }

    /// Consumes the interpreter and returns its output sink
    pub fn into_output(self) -> W {
        self.out
    }
}

fn binary(operator: &Token, left: Value, right: Value) -> Result<Value> {
    let value = match operator.kind {
        TokenKind::Plus => match (left, right) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),
            (Value::String(a), Value::String(b)) => Value::String(a + &b),
            _ => {
                return Err(Error::runtime(
                    operator,
                    "Operands must be two numbers or two strings.",
                ))
            }
        },
        TokenKind::Minus => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Value::Number(a - b)
        }
        TokenKind::Star => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Value::Number(a * b)
        }
        TokenKind::Slash => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Value::Number(a / b)
        }
        TokenKind::Greater => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Value::Boolean(a > b)
        }
        TokenKind::GreaterEqual => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Value::Boolean(a >= b)
        }
        TokenKind::Less => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Value::Boolean(a < b)
        }
        TokenKind::LessEqual => {
            let (a, b) = number_operands(operator, &left, &right)?;
            Value::Boolean(a <= b)
        }
        TokenKind::EqualEqual => Value::Boolean(left == right),
        TokenKind::BangEqual => Value::Boolean(left != right),
        _ => return Err(unknown_operator(operator)),
    };
    Ok(value)
}

fn number_operand(operator: &Token, operand: &Value) -> Result<f64> {
    operand
        .as_number()
        .ok_or_else(|| Error::runtime(operator, "Operand must be a number."))
}

fn number_operands(operator: &Token, left: &Value, right: &Value) -> Result<(f64, f64)> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(Error::runtime(operator, "Operands must be numbers.")),
    }
}

/// Only reachable with a hand-built AST
fn unknown_operator(operator: &Token) -> Error {
    Error::runtime(
        operator,
        format!("Unknown operator '{}'.", operator.lexeme),
    )
}
