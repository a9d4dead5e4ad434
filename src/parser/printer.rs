//! Parenthesized rendering of the AST, for debugging and tests

use super::ast::{Expr, Stmt};
use crate::runtime::Value;

/// Renders expressions and statements as S-expressions.
///
/// `1 + 2 * 3` prints as `(+ 1 (* 2 3))`.
#[derive(Debug, Default, Clone, Copy)]
pub struct AstPrinter;

impl AstPrinter {
    /// Creates a printer
    pub fn new() -> Self {
        AstPrinter
    }

    /// Renders a single expression
    pub fn print_expr(&self, expr: &Expr) -> String {
        match expr {
            Expr::Literal(value) => match value {
                Value::String(s) => format!("\"{}\"", s),
                other => other.to_string(),
            },
            Expr::Unary { operator, right } => self.parenthesize(&operator.lexeme, &[right.as_ref()]),
            Expr::Binary {
                left,
                operator,
                right,
            }
            | Expr::Logical {
                left,
                operator,
                right,
            } => self.parenthesize(&operator.lexeme, &[left.as_ref(), right.as_ref()]),
            Expr::Grouping(inner) => self.parenthesize("group", &[inner.as_ref()]),
            Expr::Variable { name } => name.lexeme.clone(),
            Expr::Assign { name, value } => {
                format!("(= {} {})", name.lexeme, self.print_expr(value))
            }
        }
    }

    /// Renders a single statement
    pub fn print_stmt(&self, stmt: &Stmt) -> String {
        match stmt {
            Stmt::Expression(expr) => format!("(; {})", self.print_expr(expr)),
            Stmt::Print { value, .. } => format!("(print {})", self.print_expr(value)),
            Stmt::Var { name, initializer } => match initializer {
                Some(init) => format!("(var {} {})", name.lexeme, self.print_expr(init)),
                None => format!("(var {})", name.lexeme),
            },
            Stmt::Block(statements) => {
                let mut out = String::from("(block");
                for stmt in statements {
                    out.push(' ');
                    out.push_str(&self.print_stmt(stmt));
                }
                out.push(')');
                out
            }
            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => match else_branch {
                Some(else_branch) => format!(
                    "(if {} {} {})",
                    self.print_expr(condition),
                    self.print_stmt(then_branch),
                    self.print_stmt(else_branch)
                ),
                None => format!(
                    "(if {} {})",
                    self.print_expr(condition),
                    self.print_stmt(then_branch)
                ),
            },
            Stmt::While {
                condition, body, ..
            } => format!(
                "(while {} {})",
                self.print_expr(condition),
                self.print_stmt(body)
            ),
        }
    }

    fn parenthesize(&self, name: &str, exprs: &[&Expr]) -> String {
        let mut out = String::from("(");
        out.push_str(name);
        for expr in exprs {
            out.push(' ');
            out.push_str(&self.print_expr(expr));
        }
        out.push(')');
        out
    }
}
