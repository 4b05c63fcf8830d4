//! Recursive-descent parser for tag expressions.

use super::expression::{Expr, TagExprError};
use super::lexer::{Lexer, Token, TokenKind};

pub(super) struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
}

impl<'a> Parser<'a> {
    pub(super) fn new(input: &'a str) -> Result<Self, TagExprError> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current })
    }

    pub(super) fn parse_expression(&mut self) -> Result<Expr, TagExprError> {
        self.parse_chain(
            Self::parse_and,
            |kind| matches!(kind, TokenKind::Or),
            "or",
            |lhs, rhs| Expr::Or(Box::new(lhs), Box::new(rhs)),
        )
    }

    pub(super) fn expect_end(&self) -> Result<(), TagExprError> {
        match self.current.kind {
            TokenKind::End => Ok(()),
            _ => Err(TagExprError::new(
                self.current.start,
                format!("unexpected token {}", self.current.describe()),
            )),
        }
    }

    fn advance(&mut self) -> Result<(), TagExprError> {
        self.current = self.lexer.next_token()?;
        Ok(())
    }

    fn parse_and(&mut self) -> Result<Expr, TagExprError> {
        self.parse_chain(
            Self::parse_not,
            |kind| matches!(kind, TokenKind::And),
            "and",
            |lhs, rhs| Expr::And(Box::new(lhs), Box::new(rhs)),
        )
    }

    /// Left-associative chain of `operand (operator operand)*`.
    fn parse_chain<F, P, B>(
        &mut self,
        parse_operand: F,
        is_operator: P,
        operator_name: &'static str,
        build: B,
    ) -> Result<Expr, TagExprError>
    where
        F: Fn(&mut Self) -> Result<Expr, TagExprError>,
        P: Fn(&TokenKind) -> bool,
        B: Fn(Expr, Expr) -> Expr,
    {
        let mut node = parse_operand(self)?;
        while is_operator(&self.current.kind) {
            self.advance()?;
            self.ensure_operand(operator_name)?;
            let rhs = parse_operand(self)?;
            node = build(node, rhs);
        }
        Ok(node)
    }

    fn parse_not(&mut self) -> Result<Expr, TagExprError> {
        if matches!(self.current.kind, TokenKind::Not) {
            self.advance()?;
            self.ensure_operand("not")?;
            let operand = self.parse_not()?;
            return Ok(Expr::Not(Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, TagExprError> {
        let token = self.current.clone();
        match &token.kind {
            TokenKind::Tag(tag) => {
                self.advance()?;
                Ok(Expr::Tag(tag.clone()))
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                if !matches!(self.current.kind, TokenKind::RParen) {
                    return Err(TagExprError::new(token.start, "missing ')'"));
                }
                self.advance()?;
                Ok(expr)
            }
            TokenKind::End => Err(TagExprError::new(token.start, "expected tag or '('")),
            _ => Err(TagExprError::new(
                token.start,
                format!("expected tag or '(' but found {}", token.describe()),
            )),
        }
    }

    fn ensure_operand(&self, name: &str) -> Result<(), TagExprError> {
        match self.current.kind {
            TokenKind::Or | TokenKind::And | TokenKind::RParen | TokenKind::End => {
                Err(TagExprError::new(
                    self.current.start,
                    format!("expected tag or '(' after '{name}'"),
                ))
            }
            _ => Ok(()),
        }
    }
}
