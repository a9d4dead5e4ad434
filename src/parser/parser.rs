use super::ast::{Expr, Stmt};
use crate::error::{Error, Result};
use crate::lexer::{Token, TokenKind};
use crate::runtime::Value;

/// Deepest syntax tree the parser will build.
///
/// Parsing and evaluation both recurse once per level, so this bounds native
/// stack use. Each grouping, prefix operator, nested statement and operator
/// in a chain such as `1 + 2 + 3` counts as one level.
pub const MAX_NESTING_DEPTH: usize = 128;

/// Recursive-descent parser for treelox
///
/// Precedence, lowest to highest: assignment, `or`, `and`, equality,
/// comparison, term, factor, unary, primary.
pub struct Parser {
    tokens: Vec<Token>,
    current: usize,
    /// Errors that do not unwind the statement being parsed
    errors: Vec<Error>,
    /// Current syntax tree depth, bounded by [`MAX_NESTING_DEPTH`]
    depth: usize,
}

/// Parses `tokens` into statements, collecting every syntax error
pub fn parse(tokens: Vec<Token>) -> (Vec<Stmt>, Vec<Error>) {
    Parser::new(tokens).parse()
}

impl Parser {
    /// Creates a new parser.
    ///
    /// A missing end-of-input marker is appended so the parser never runs
    /// off the end of the token list.
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let line = tokens.last().map(|t| t.line).unwrap_or(1);
            tokens.push(Token::new(TokenKind::Eof, String::new(), None, line));
        }
        Parser {
            tokens,
            current: 0,
            errors: Vec::new(),
            depth: 0,
        }
    }

    /// Parses the tokens into a list of statements.
    ///
    /// A failed declaration is recorded and the parser resynchronizes at the
    /// next statement boundary, so independent errors all surface in one pass.
    pub fn parse(mut self) -> (Vec<Stmt>, Vec<Error>) {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            match self.declaration() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    tracing::debug!(error = %err, "recovering from parse error");
                    self.errors.push(err);
                    self.synchronize();
                }
            }
        }

        (statements, self.errors)
    }

    // =========================================================================
    // STATEMENTS
    // =========================================================================

    fn declaration(&mut self) -> Result<Stmt> {
        if self.match_kind(&[TokenKind::Var]) {
            return self.var_declaration();
        }
        self.statement()
    }

    fn var_declaration(&mut self) -> Result<Stmt> {
        let name = self.consume(TokenKind::Identifier, "Expect variable name.")?;

        let initializer = if self.match_kind(&[TokenKind::Equal]) {
            Some(self.expression()?)
        } else {
            None
        };

        self.consume(
            TokenKind::Semicolon,
            "Expect ';' after variable declaration.",
        )?;
        Ok(Stmt::Var { name, initializer })
    }

    fn statement(&mut self) -> Result<Stmt> {
        self.nested(Self::statement_inner)
    }

    fn statement_inner(&mut self) -> Result<Stmt> {
        if self.match_kind(&[TokenKind::For]) {
            return self.for_statement();
        }
        if self.match_kind(&[TokenKind::If]) {
            return self.if_statement();
        }
        if self.match_kind(&[TokenKind::Print]) {
            return self.print_statement();
        }
        if self.match_kind(&[TokenKind::While]) {
            return self.while_statement();
        }
        if self.match_kind(&[TokenKind::LeftBrace]) {
            return Ok(Stmt::Block(self.block()?));
        }
        self.expression_statement()
    }

    /// `for` has no node of its own: it becomes a `while` inside a block
    fn for_statement(&mut self) -> Result<Stmt> {
        let keyword = self.previous().clone();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'for'.")?;

        let initializer = if self.match_kind(&[TokenKind::Semicolon]) {
            None
        } else if self.match_kind(&[TokenKind::Var]) {
            Some(self.var_declaration()?)
        } else {
            Some(self.expression_statement()?)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::Semicolon, "Expect ';' after loop condition.")?;

        let increment = if self.check(TokenKind::RightParen) {
            None
        } else {
            Some(self.expression()?)
        };
        self.consume(TokenKind::RightParen, "Expect ')' after for clauses.")?;

        let mut body = self.statement()?;

        if let Some(increment) = increment {
            body = Stmt::Block(vec![body, Stmt::Expression(increment)]);
        }

        body = Stmt::While {
            keyword,
            condition: condition.unwrap_or(Expr::Literal(Value::Boolean(true))),
            body: Box::new(body),
        };

        if let Some(initializer) = initializer {
            body = Stmt::Block(vec![initializer, body]);
        }

        Ok(body)
    }

    fn if_statement(&mut self) -> Result<Stmt> {
        self.consume(TokenKind::LeftParen, "Expect '(' after 'if'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after if condition.")?;

        let then_branch = Box::new(self.statement()?);
        let else_branch = if self.match_kind(&[TokenKind::Else]) {
            Some(Box::new(self.statement()?))
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
        })
    }

    fn print_statement(&mut self) -> Result<Stmt> {
        let keyword = self.previous().clone();
        let value = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after value.")?;
        Ok(Stmt::Print { keyword, value })
    }

    fn while_statement(&mut self) -> Result<Stmt> {
        let keyword = self.previous().clone();
        self.consume(TokenKind::LeftParen, "Expect '(' after 'while'.")?;
        let condition = self.expression()?;
        self.consume(TokenKind::RightParen, "Expect ')' after condition.")?;
        let body = Box::new(self.statement()?);

        Ok(Stmt::While {
            keyword,
            condition,
            body,
        })
    }

    fn block(&mut self) -> Result<Vec<Stmt>> {
        let mut statements = Vec::new();

        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.declaration()?);
        }

        self.consume(TokenKind::RightBrace, "Expect '}' after block.")?;
        Ok(statements)
    }

    fn expression_statement(&mut self) -> Result<Stmt> {
        let expr = self.expression()?;
        self.consume(TokenKind::Semicolon, "Expect ';' after expression.")?;
        Ok(Stmt::Expression(expr))
    }

    // =========================================================================
    // EXPRESSIONS
    // =========================================================================

    fn expression(&mut self) -> Result<Expr> {
        self.nested(Self::assignment)
    }

    fn assignment(&mut self) -> Result<Expr> {
        let expr = self.or()?;

        if self.match_kind(&[TokenKind::Equal]) {
            let equals = self.previous().clone();
            let value = self.nested(Self::assignment)?;

            if let Expr::Variable { name } = expr {
                return Ok(Expr::Assign {
                    name,
                    value: Box::new(value),
                });
            }

            // Reported without unwinding: the parser is not confused here
            self.errors
                .push(Error::at_token(&equals, "Invalid assignment target."));
        }

        Ok(expr)
    }

    fn or(&mut self) -> Result<Expr> {
        self.left_assoc(&[TokenKind::Or], Self::and, Expr::logical)
    }

    fn and(&mut self) -> Result<Expr> {
        self.left_assoc(&[TokenKind::And], Self::equality, Expr::logical)
    }

    fn equality(&mut self) -> Result<Expr> {
        self.left_assoc(
            &[TokenKind::BangEqual, TokenKind::EqualEqual],
            Self::comparison,
            Expr::binary,
        )
    }

    fn comparison(&mut self) -> Result<Expr> {
        self.left_assoc(
            &[
                TokenKind::Greater,
                TokenKind::GreaterEqual,
                TokenKind::Less,
                TokenKind::LessEqual,
            ],
            Self::term,
            Expr::binary,
        )
    }

    fn term(&mut self) -> Result<Expr> {
        self.left_assoc(&[TokenKind::Minus, TokenKind::Plus], Self::factor, Expr::binary)
    }

    fn factor(&mut self) -> Result<Expr> {
        self.left_assoc(&[TokenKind::Slash, TokenKind::Star], Self::unary, Expr::binary)
    }

    /// Parses `operand (op operand)*` into a left-leaning tree.
    ///
    /// Every operator adds a level to the tree, so each one counts towards
    /// the nesting limit until the whole chain is built.
    fn left_assoc(
        &mut self,
        operators: &[TokenKind],
        operand: fn(&mut Self) -> Result<Expr>,
        build: fn(Expr, Token, Expr) -> Expr,
    ) -> Result<Expr> {
        let mut expr = operand(self)?;
        let base = self.depth;

        let result = loop {
            if !self.match_kind(operators) {
                break Ok(expr);
            }
            let operator = self.previous().clone();
            if let Err(err) = self.descend() {
                break Err(err);
            }
            match operand(self) {
                Ok(right) => expr = build(expr, operator, right),
                Err(err) => break Err(err),
            }
        };

        self.depth = base;
        result
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.match_kind(&[TokenKind::Bang, TokenKind::Minus]) {
            let operator = self.previous().clone();
            let right = self.nested(Self::unary)?;
            return Ok(Expr::unary(operator, right));
        }

        self.primary()
    }

    fn primary(&mut self) -> Result<Expr> {
        let token = self.peek().clone();

        let expr = match token.kind {
            TokenKind::False => Expr::Literal(Value::Boolean(false)),
            TokenKind::True => Expr::Literal(Value::Boolean(true)),
            TokenKind::Nil => Expr::Literal(Value::Nil),
            TokenKind::Number | TokenKind::String => match &token.literal {
                Some(literal) => Expr::Literal(Value::from(literal)),
                None => return Err(Error::at_token(&token, "Expect expression.")),
            },
            TokenKind::Identifier => Expr::Variable { name: token },
            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                return Ok(Expr::Grouping(Box::new(inner)));
            }
            _ => return Err(Error::at_token(&token, "Expect expression.")),
        };

        self.advance();
        Ok(expr)
    }

    // =========================================================================
    // NESTING LIMIT
    // =========================================================================

    /// Runs `parse` one level deeper in the tree
    fn nested<T>(&mut self, parse: fn(&mut Self) -> Result<T>) -> Result<T> {
        self.descend()?;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(Error::at_token(self.peek(), "Too much nesting."));
        }
        self.depth += 1;
        Ok(())
    }

    // =========================================================================
    // ERROR RECOVERY
    // =========================================================================

    /// Discards tokens until a likely statement boundary
    fn synchronize(&mut self) {
        self.advance();

        while !self.is_at_end() {
            if self.previous().kind == TokenKind::Semicolon {
                return;
            }
            if self.peek().kind.starts_statement() {
                return;
            }
            self.advance();
        }
    }

    // =========================================================================
    // TOKEN CURSOR
    // =========================================================================

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current - 1]
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        !self.is_at_end() && self.peek().kind == kind
    }

    fn match_kind(&mut self, kinds: &[TokenKind]) -> bool {
        if kinds.iter().any(|kind| self.check(*kind)) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) -> Result<Token> {
        if self.check(kind) {
            Ok(self.advance().clone())
        } else {
            Err(Error::at_token(self.peek(), message))
        }
    }
}
