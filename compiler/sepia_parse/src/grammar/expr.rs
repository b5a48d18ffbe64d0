//! Expression parsing.
//!
//! Binary operators use precedence climbing over [`BinaryOp::precedence`];
//! assignment sits above them and is right associative.

use std::rc::Rc;

use sepia_diagnostic::ErrorCode;
use sepia_ir::ast::{BinaryOp, Expr, ExprKind, InterpolationPart, UnaryOp};
use sepia_ir::{Span, TemplatePart, TokenKind};
use sepia_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

/// Loosest binary precedence (`||`).
const MIN_PRECEDENCE: u8 = 1;

impl Parser<'_> {
    pub(crate) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_assignment())
    }

    /// `IDENT assign_op assignment | logic_or`
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_binary(MIN_PRECEDENCE)?;
        let Some(op) = self.match_assign_op() else {
            return Ok(target);
        };
        let ExprKind::Ident(name) = target.kind else {
            return Err(ParseError::new(
                ErrorCode::E1006,
                "invalid assignment target",
                target.span,
            )
            .with_context("cannot assign to this expression")
            .with_help("only variables can be assigned to"));
        };
        self.cursor.advance();
        let value = self.parse_expr()?;
        let span = target.span.merge(value.span);
        Ok(Expr::new(
            ExprKind::Assign {
                target: name,
                target_span: target.span,
                op,
                value: Box::new(value),
            },
            span,
        ))
    }

    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        while let Some(op) = self.match_binary_op() {
            let prec = op.precedence();
            if prec < min_prec {
                break;
            }
            self.cursor.advance();
            let right = ensure_sufficient_stack(|| self.parse_binary(prec + 1))?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = self.match_unary_op() else {
            return self.parse_call();
        };
        let start = self.cursor.advance().span;
        let operand = ensure_sufficient_stack(|| self.parse_unary())?;
        let span = start.merge(operand.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            span,
        ))
    }

    /// `primary ( "(" args? ")" )*`
    fn parse_call(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;
        while self.cursor.check(&TokenKind::LParen) {
            let open = self.cursor.advance().span;
            let mut args = Vec::new();
            if !self.cursor.check(&TokenKind::RParen) {
                loop {
                    args.push(self.parse_expr()?);
                    if !self.cursor.eat(&TokenKind::Comma) {
                        break;
                    }
                }
            }
            let close = self.expect_closing_paren(open)?;
            let span = expr.span.merge(close);
            expr = Expr::new(
                ExprKind::Call {
                    callee: Box::new(expr),
                    args,
                },
                span,
            );
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let span = self.cursor.current_span();
        let kind = match self.cursor.current_kind() {
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::Float(bits) => ExprKind::Float(f64::from_bits(bits)),
            TokenKind::String(name) => ExprKind::Str(name),
            TokenKind::Template(index) => {
                self.cursor.advance();
                return Ok(self.parse_template(index, span));
            }
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::Null => ExprKind::Null,
            TokenKind::Ident(name) => ExprKind::Ident(name),
            TokenKind::LParen => {
                let open = self.cursor.advance().span;
                let inner = self.parse_expr()?;
                let close = self.expect_closing_paren(open)?;
                return Ok(Expr::new(
                    ExprKind::Grouping(Box::new(inner)),
                    open.merge(close),
                ));
            }
            TokenKind::Func => {
                self.cursor.advance();
                let decl = self.parse_function_rest(span, None)?;
                let span = decl.span;
                return Ok(Expr::new(ExprKind::Function(Rc::new(decl)), span));
            }
            found => return Err(ParseError::expected_expression(found, span)),
        };
        self.cursor.advance();
        Ok(Expr::new(kind, span))
    }

    fn expect_closing_paren(&mut self, open: Span) -> Result<Span, ParseError> {
        if self.cursor.is_at_end() {
            return Err(ParseError::unclosed(open, '(', self.cursor.current_span()));
        }
        Ok(self.cursor.expect(&TokenKind::RParen)?.span)
    }

    /// Build an interpolated string, parsing each `${...}` segment as an
    /// expression positioned inside the literal.
    fn parse_template(&mut self, index: u32, span: Span) -> Expr {
        let parts = self.cursor.tokens().template(index);
        let mut out = Vec::with_capacity(parts.len());
        for part in parts {
            match part {
                TemplatePart::Text(text) => out.push(InterpolationPart::Text(text.clone())),
                TemplatePart::Code { source, offset } => {
                    if let Some(expr) = self.parse_segment(source, *offset) {
                        out.push(InterpolationPart::Expr(expr));
                    }
                }
            }
        }
        Expr::new(ExprKind::Interpolated(out), span)
    }

    fn parse_segment(&mut self, source: &str, offset: u32) -> Option<Expr> {
        let interner = self.cursor.interner();
        let lexed = sepia_lexer::lex_at(source, offset, interner);
        if lexed.has_errors() {
            self.errors
                .extend(lexed.errors.into_iter().map(ParseError::from));
            return None;
        }
        let mut sub = Parser::new(&lexed.tokens, interner);
        let result = sub
            .parse_expr()
            .and_then(|expr| sub.cursor.expect(&TokenKind::Eof).map(|_| expr));
        self.errors.append(&mut sub.errors);
        match result {
            Ok(expr) => Some(expr),
            Err(err) => {
                self.errors.push(err);
                None
            }
        }
    }

    fn match_assign_op(&self) -> Option<Option<BinaryOp>> {
        let op = match self.cursor.current_kind() {
            TokenKind::Eq => None,
            TokenKind::PlusEq => Some(BinaryOp::Add),
            TokenKind::MinusEq => Some(BinaryOp::Sub),
            TokenKind::StarEq => Some(BinaryOp::Mul),
            TokenKind::SlashEq => Some(BinaryOp::Div),
            TokenKind::PercentEq => Some(BinaryOp::Mod),
            TokenKind::AmpEq => Some(BinaryOp::BitAnd),
            TokenKind::PipeEq => Some(BinaryOp::BitOr),
            TokenKind::CaretEq => Some(BinaryOp::BitXor),
            TokenKind::ShlEq => Some(BinaryOp::Shl),
            TokenKind::ShrEq => Some(BinaryOp::Shr),
            _ => return None,
        };
        Some(op)
    }

    fn match_binary_op(&self) -> Option<BinaryOp> {
        match self.cursor.current_kind() {
            TokenKind::PipePipe => Some(BinaryOp::Or),
            TokenKind::AmpAmp => Some(BinaryOp::And),
            TokenKind::Pipe => Some(BinaryOp::BitOr),
            TokenKind::Caret => Some(BinaryOp::BitXor),
            TokenKind::Amp => Some(BinaryOp::BitAnd),
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::NotEq),
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::LtEq => Some(BinaryOp::LtEq),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::GtEq => Some(BinaryOp::GtEq),
            TokenKind::Shl => Some(BinaryOp::Shl),
            TokenKind::Shr => Some(BinaryOp::Shr),
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        }
    }

    fn match_unary_op(&self) -> Option<UnaryOp> {
        match self.cursor.current_kind() {
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            _ => None,
        }
    }
}
