use serde::{Deserialize, Serialize};

use crate::lexer::Token;
use crate::runtime::Value;

/// Expressions
///
/// Each node owns its children; the tree has no sharing and no cycles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal value: `1`, `"s"`, `true`, `nil`
    Literal(Value),

    /// Prefix operator: `-x`, `!x`
    Unary {
        /// Operator token (`-` or `!`)
        operator: Token,
        /// Operand expression
        right: Box<Expr>,
    },

    /// Infix arithmetic, comparison or equality operator
    Binary {
        /// Left operand
        left: Box<Expr>,
        /// Operator token
        operator: Token,
        /// Right operand
        right: Box<Expr>,
    },

    /// Parenthesized expression
    Grouping(Box<Expr>),

    /// Variable reference
    Variable {
        /// Identifier token
        name: Token,
    },

    /// Assignment to an existing variable: `name = value`
    Assign {
        /// Identifier token of the target
        name: Token,
        /// Value expression
        value: Box<Expr>,
    },

    /// Short-circuiting `and` / `or`
    Logical {
        /// Left operand
        left: Box<Expr>,
        /// Operator token (`and` or `or`)
        operator: Token,
        /// Right operand, evaluated only when needed
        right: Box<Expr>,
    },
}

/// Statements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// Expression evaluated for its side effects
    Expression(Expr),

    /// `print expr;`
    Print {
        /// The `print` keyword, kept for diagnostics
        keyword: Token,
        /// Value to print
        value: Expr,
    },

    /// Variable declaration: `var name = initializer;`
    Var {
        /// Identifier token
        name: Token,
        /// Optional initializer; the variable is nil without one
        initializer: Option<Expr>,
    },

    /// Block with its own scope
    Block(Vec<Stmt>),

    /// If statement
    If {
        /// Condition expression to evaluate
        condition: Expr,
        /// Statement to execute if condition is truthy
        then_branch: Box<Stmt>,
        /// Optional statement to execute otherwise
        else_branch: Option<Box<Stmt>>,
    },

    /// While loop (also the target of `for` desugaring)
    While {
        /// The `while` or `for` keyword, kept for diagnostics
        keyword: Token,
        /// Loop condition expression
        condition: Expr,
        /// Loop body
        body: Box<Stmt>,
    },
}

impl Expr {
    /// Builds a binary node
    pub fn binary(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Builds a logical node
    pub fn logical(left: Expr, operator: Token, right: Expr) -> Self {
        Expr::Logical {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Builds a unary node
    pub fn unary(operator: Token, right: Expr) -> Self {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }
}
