use thiserror::Error;

use crate::ast::{BinaryOperator, Expression, Program, Statement, UnaryOperator};
use crate::token::{Keyword, Span, Token, TokenKind};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Expected {expected}, got {found} at line {line}, column {column}")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("Unexpected keyword '{keyword}' at line {line}, column {column}")]
    UnexpectedKeyword {
        keyword: String,
        line: usize,
        column: usize,
    },
    #[error("Unexpected {found} while parsing a term at line {line}, column {column}")]
    ExpectedExpression {
        found: String,
        line: usize,
        column: usize,
    },
    #[error("Expected a variable assignment in the for-loop initializer at line {line}, column {column}")]
    ForLoopInitializer { line: usize, column: usize },
}

impl ParseError {
    /// Advisory text shown by the CLI alongside the error message.
    pub fn suggestion(&self) -> Option<String> {
        match self {
            ParseError::UnexpectedToken {
                expected, found, ..
            } if expected == "'}'" && found == "end of input" => {
                Some("Missing closing brace '}'. Check for unmatched braces".to_string())
            }
            ParseError::UnexpectedToken { expected, found, .. }
                if expected.starts_with("keyword") && found.starts_with("identifier") =>
            {
                Some("Expected a keyword like 'Tuna' or 'Mustard_Leaf' here. Check the language syntax".to_string())
            }
            ParseError::ForLoopInitializer { .. } => {
                Some("Start the initializer with 'Tuna <name> Tuna <value>'".to_string())
            }
            _ => None,
        }
    }
}

/// Recursive-descent parser over a scanned token stream.
pub struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> Parser<'a> {
    /// The token vector must end with an EOF token, as `lexer::tokenize`
    /// guarantees.
    pub fn new(tokens: Vec<Token<'a>>) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();
        while !matches!(self.peek().kind, TokenKind::Eof) {
            statements.push(self.parse_statement()?);
        }
        Ok(Program { statements })
    }

    fn parse_statement(&mut self) -> Result<Statement, ParseError> {
        match self.peek().kind {
            TokenKind::Keyword(Keyword::Tuna) => self.assign_stmt(),
            TokenKind::Keyword(Keyword::TunaMayo) => self.function_stmt(),
            TokenKind::Keyword(Keyword::Return) => self.return_stmt(),
            TokenKind::Keyword(Keyword::MustardLeaf) => self.conditional_stmt(),
            TokenKind::Keyword(Keyword::Twist) => self.for_stmt(),
            TokenKind::Keyword(Keyword::Plummet) => self.while_stmt(),
            TokenKind::Keyword(Keyword::CoughSyrup) => {
                self.advance();
                Ok(Statement::ResetBudget)
            }
            TokenKind::Keyword(keyword) => {
                let span = self.peek().span;
                Err(ParseError::UnexpectedKeyword {
                    keyword: keyword.as_str().to_string(),
                    line: span.line,
                    column: span.column,
                })
            }
            _ => Ok(Statement::Expr(self.parse_expression()?)),
        }
    }

    /// `Tuna <name> <keyword> <expr>`
    fn assign_stmt(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Tuna)?;
        let name = self.expect_identifier()?;
        self.expect_any_keyword()?;
        let value = self.parse_expression()?;
        Ok(Statement::Assign { name, value })
    }

    /// `Tuna_Mayo <name> <keyword> <params...> <keyword> { body }`
    fn function_stmt(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::TunaMayo)?;
        let name = self.expect_identifier()?;
        self.expect_any_keyword()?;
        let mut params = Vec::new();
        while !matches!(self.peek().kind, TokenKind::Keyword(_)) {
            params.push(self.expect_identifier()?);
        }
        self.expect_any_keyword()?;
        let body = self.block()?;
        Ok(Statement::FunctionDef { name, params, body })
    }

    fn return_stmt(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Return)?;
        let value = self.parse_expression()?;
        Ok(Statement::Return(value))
    }

    /// `Mustard_Leaf <keyword> <expr> <keyword> { body } [Explode { body }]`
    fn conditional_stmt(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::MustardLeaf)?;
        self.expect_any_keyword()?;
        let condition = self.parse_expression()?;
        self.expect_any_keyword()?;
        let then_body = self.block()?;
        let else_body = if matches!(self.peek().kind, TokenKind::Keyword(Keyword::Explode)) {
            self.advance();
            Some(self.block()?)
        } else {
            None
        };
        Ok(Statement::If {
            condition,
            then_body,
            else_body,
        })
    }

    /// `Twist <keyword> <assign> <keyword> <expr> <keyword> <stmt> <keyword> { body }`
    fn for_stmt(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Twist)?;
        self.expect_any_keyword()?;
        let init_span = self.peek().span;
        let init = self.parse_statement()?;
        if !matches!(init, Statement::Assign { .. }) {
            return Err(ParseError::ForLoopInitializer {
                line: init_span.line,
                column: init_span.column,
            });
        }
        self.expect_any_keyword()?;
        let condition = self.parse_expression()?;
        self.expect_any_keyword()?;
        let step = self.parse_statement()?;
        self.expect_any_keyword()?;
        let body = self.block()?;
        Ok(Statement::For {
            init: Box::new(init),
            condition,
            step: Box::new(step),
            body,
        })
    }

    /// `Plummet <keyword> <expr> <keyword> { body }`
    fn while_stmt(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Plummet)?;
        self.expect_any_keyword()?;
        let condition = self.parse_expression()?;
        self.expect_any_keyword()?;
        let body = self.block()?;
        Ok(Statement::While { condition, body })
    }

    fn block(&mut self) -> Result<Vec<Statement>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut body = Vec::new();
        while !matches!(self.peek().kind, TokenKind::RBrace | TokenKind::Eof) {
            body.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(body)
    }

    /// Flat left-associative operator chaining. There are deliberately no
    /// precedence levels: `1 + 2 * 3` parses as `(1 + 2) * 3`.
    fn parse_expression(&mut self) -> Result<Expression, ParseError> {
        let mut left = self.term()?;
        while let Some(op) = binary_operator(&self.peek().kind) {
            self.advance();
            let right = self.term()?;
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok(left)
    }

    fn term(&mut self) -> Result<Expression, ParseError> {
        match self.peek().kind {
            TokenKind::Identifier(name) => {
                self.advance();
                let mut expr = Expression::Identifier(name.to_string());
                loop {
                    match self.peek().kind {
                        TokenKind::Dot => {
                            self.advance();
                            let key = self.expect_identifier()?;
                            expr = Expression::Get {
                                object: Box::new(expr),
                                key: Box::new(Expression::Str(key)),
                            };
                        }
                        TokenKind::LParen => {
                            self.advance();
                            let mut args = Vec::new();
                            while !matches!(
                                self.peek().kind,
                                TokenKind::RParen | TokenKind::Eof
                            ) {
                                args.push(self.parse_expression()?);
                                if matches!(self.peek().kind, TokenKind::Comma) {
                                    self.advance();
                                }
                            }
                            self.expect(TokenKind::RParen)?;
                            expr = Expression::Call {
                                callee: Box::new(expr),
                                args,
                            };
                        }
                        _ => break,
                    }
                }
                Ok(expr)
            }
            TokenKind::Number(value) => {
                self.advance();
                Ok(Expression::Number(value))
            }
            TokenKind::Boolean(value) => {
                self.advance();
                Ok(Expression::Boolean(value))
            }
            TokenKind::Str(value) => {
                self.advance();
                Ok(Expression::Str(value.to_string()))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Minus => {
                self.advance();
                Ok(Expression::UnaryOp {
                    op: UnaryOperator::Negate,
                    operand: Box::new(self.term()?),
                })
            }
            TokenKind::Not => {
                self.advance();
                Ok(Expression::UnaryOp {
                    op: UnaryOperator::Not,
                    operand: Box::new(self.term()?),
                })
            }
            other => {
                let span = self.peek().span;
                Err(ParseError::ExpectedExpression {
                    found: other.describe(),
                    line: span.line,
                    column: span.column,
                })
            }
        }
    }

    fn expect(&mut self, expected: TokenKind<'a>) -> Result<(), ParseError> {
        if self.peek().kind == expected {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&expected.describe()))
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        if let TokenKind::Identifier(name) = self.peek().kind {
            self.advance();
            Ok(name.to_string())
        } else {
            Err(self.error("identifier"))
        }
    }

    fn expect_keyword(&mut self, expected: Keyword) -> Result<(), ParseError> {
        if self.peek().kind == TokenKind::Keyword(expected) {
            self.advance();
            Ok(())
        } else {
            Err(self.error(&format!("keyword '{}'", expected.as_str())))
        }
    }

    /// Clause delimiters only require some keyword, not a particular one.
    fn expect_any_keyword(&mut self) -> Result<Keyword, ParseError> {
        if let TokenKind::Keyword(keyword) = self.peek().kind {
            self.advance();
            Ok(keyword)
        } else {
            Err(self.error("keyword"))
        }
    }

    fn peek(&self) -> &Token<'a> {
        // The EOF token is never consumed, so the clamp only ever re-yields it.
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> Token<'a> {
        let token = *self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn error(&self, expected: &str) -> ParseError {
        let Span { line, column, .. } = self.peek().span;
        ParseError::UnexpectedToken {
            expected: expected.to_string(),
            found: self.peek().kind.describe(),
            line,
            column,
        }
    }
}

fn binary_operator(kind: &TokenKind<'_>) -> Option<BinaryOperator> {
    match kind {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::Percent => Some(BinaryOperator::Mod),
        TokenKind::EqEq => Some(BinaryOperator::Eq),
        TokenKind::NotEq => Some(BinaryOperator::NotEq),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::LessEq => Some(BinaryOperator::LessEq),
        TokenKind::GreaterEq => Some(BinaryOperator::GreaterEq),
        TokenKind::And => Some(BinaryOperator::And),
        TokenKind::Or => Some(BinaryOperator::Or),
        _ => None,
    }
}

/// Parse a scanned token stream into a program.
pub fn parse_tokens(tokens: Vec<Token<'_>>) -> Result<Program, ParseError> {
    Parser::new(tokens).parse_program()
}
