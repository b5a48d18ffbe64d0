//! Statement and declaration parsing.

use std::rc::Rc;

use sepia_diagnostic::ErrorCode;
use sepia_ir::ast::{FunctionDecl, Param, Stmt, StmtKind};
use sepia_ir::{Name, ResolveSlot, Span, TokenKind};
use sepia_stack::ensure_sufficient_stack;

use crate::cursor::describe;
use crate::recovery::{synchronize, STMT_BOUNDARY};
use crate::{ParseError, Parser};

impl Parser<'_> {
    /// Parse one statement, recording the error and skipping to the next
    /// statement boundary on failure.
    pub(crate) fn parse_stmt_recovering(&mut self) -> Option<Stmt> {
        let start = self.cursor.position();
        match self.parse_stmt() {
            Ok(stmt) => Some(stmt),
            Err(err) => {
                tracing::debug!(code = %err.code, span = ?err.span, "recovering from syntax error");
                // The lexer already reported invalid tokens.
                if !matches!(self.cursor.current_kind(), TokenKind::Error) {
                    self.errors.push(err);
                }
                synchronize(&mut self.cursor, start, STMT_BOUNDARY);
                None
            }
        }
    }

    pub(crate) fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        ensure_sufficient_stack(|| self.parse_stmt_inner())
    }

    fn parse_stmt_inner(&mut self) -> Result<Stmt, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Let => self.parse_let(),
            TokenKind::Func if matches!(self.cursor.peek_kind_at(1), TokenKind::Ident(_)) => {
                self.parse_function_decl()
            }
            TokenKind::Class => self.parse_class(),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Break => self.parse_keyword_stmt(StmtKind::Break),
            TokenKind::Continue => self.parse_keyword_stmt(StmtKind::Continue),
            TokenKind::Return => self.parse_return(),
            TokenKind::LBrace => {
                let (stmts, span) = self.parse_block()?;
                Ok(Stmt::new(StmtKind::Block(stmts), span))
            }
            _ => {
                let expr = self.parse_expr()?;
                let semi = self.cursor.expect(&TokenKind::Semicolon)?;
                let span = expr.span.merge(semi.span);
                Ok(Stmt::new(StmtKind::Expr(expr), span))
            }
        }
    }

    /// `{ stmt* }`, returning the statements and the span including braces.
    pub(crate) fn parse_block(&mut self) -> Result<(Vec<Stmt>, Span), ParseError> {
        let open = self.cursor.expect(&TokenKind::LBrace)?.span;
        let mut stmts = Vec::new();
        while !self.cursor.check(&TokenKind::RBrace) && !self.cursor.is_at_end() {
            if let Some(stmt) = self.parse_stmt_recovering() {
                stmts.push(stmt);
            }
        }
        if self.cursor.is_at_end() {
            return Err(ParseError::unclosed(open, '{', self.cursor.current_span()));
        }
        let close = self.cursor.advance().span;
        Ok((stmts, open.merge(close)))
    }

    /// `let name (: type)? (= expr)? ;`
    fn parse_let(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::Let)?.span;
        let (name, name_span) = self.cursor.expect_ident()?;
        let ty = if self.cursor.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let init = if self.cursor.eat(&TokenKind::Eq) {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let semi = self.cursor.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::new(
            StmtKind::Let {
                name,
                name_span,
                ty,
                init,
            },
            start.merge(semi.span),
        ))
    }

    fn parse_function_decl(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::Func)?.span;
        let (name, _) = self.cursor.expect_ident()?;
        let decl = self.parse_function_rest(start, Some(name))?;
        let span = decl.span;
        Ok(Stmt::new(StmtKind::Function(Rc::new(decl)), span))
    }

    /// Everything after `func name` or `func`: parameters, return type, body.
    pub(crate) fn parse_function_rest(
        &mut self,
        start: Span,
        name: Option<Name>,
    ) -> Result<FunctionDecl, ParseError> {
        let open = self.cursor.expect(&TokenKind::LParen)?.span;
        let mut params = Vec::new();
        if !self.cursor.check(&TokenKind::RParen) {
            loop {
                let (param, param_span) = self.cursor.expect_ident()?;
                self.cursor.expect(&TokenKind::Colon)?;
                let ty = self.parse_type()?;
                params.push(Param {
                    name: param,
                    span: param_span.merge(ty.span),
                    ty,
                });
                if !self.cursor.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        if self.cursor.is_at_end() {
            return Err(ParseError::unclosed(open, '(', self.cursor.current_span()));
        }
        self.cursor.expect(&TokenKind::RParen)?;
        let return_type = if self.cursor.eat(&TokenKind::Colon) {
            Some(self.parse_type()?)
        } else {
            None
        };
        let (body, body_span) = self.parse_block()?;
        Ok(FunctionDecl {
            name,
            params,
            return_type,
            body,
            span: start.merge(body_span),
            info: ResolveSlot::default(),
        })
    }

    /// `class Name { (let | func)* }`
    fn parse_class(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::Class)?.span;
        let (name, _) = self.cursor.expect_ident()?;
        let open = self.cursor.expect(&TokenKind::LBrace)?.span;
        let mut members = Vec::new();
        loop {
            match self.cursor.current_kind() {
                TokenKind::RBrace => break,
                TokenKind::Eof => {
                    return Err(ParseError::unclosed(open, '{', self.cursor.current_span()));
                }
                TokenKind::Let => members.push(self.parse_let()?),
                TokenKind::Func => members.push(self.parse_function_decl()?),
                other => {
                    return Err(ParseError::new(
                        ErrorCode::E1001,
                        format!(
                            "expected `let` or `func` in class body, found {}",
                            describe(&other)
                        ),
                        self.cursor.current_span(),
                    )
                    .with_context("not a class member"));
                }
            }
        }
        let close = self.cursor.advance().span;
        Ok(Stmt::new(StmtKind::Class { name, members }, start.merge(close)))
    }

    /// `( expr )` after `if` or `while`.
    fn parse_condition(&mut self) -> Result<sepia_ir::ast::Expr, ParseError> {
        self.cursor.expect(&TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::If)?.span;
        let cond = self.parse_condition()?;
        let then_branch = Box::new(self.parse_stmt()?);
        let else_branch = if self.cursor.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_stmt()?))
        } else {
            None
        };
        let end = else_branch.as_ref().map_or(then_branch.span, |e| e.span);
        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start.merge(end),
        ))
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::While)?.span;
        let cond = self.parse_condition()?;
        let body = Box::new(self.parse_stmt()?);
        let span = start.merge(body.span);
        Ok(Stmt::new(StmtKind::While { cond, body }, span))
    }

    /// `for ( init? ; cond? ; post? ) stmt`
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::For)?.span;
        self.cursor.expect(&TokenKind::LParen)?;

        let init = match self.cursor.current_kind() {
            TokenKind::Semicolon => {
                self.cursor.advance();
                None
            }
            TokenKind::Let => Some(Box::new(self.parse_let()?)),
            _ => {
                let expr = self.parse_expr()?;
                let semi = self.cursor.expect(&TokenKind::Semicolon)?;
                let span = expr.span.merge(semi.span);
                Some(Box::new(Stmt::new(StmtKind::Expr(expr), span)))
            }
        };

        let cond = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect(&TokenKind::Semicolon)?;

        let post = if self.cursor.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.cursor.expect(&TokenKind::RParen)?;

        let body = Box::new(self.parse_stmt()?);
        let span = start.merge(body.span);
        Ok(Stmt::new(
            StmtKind::For {
                init,
                cond,
                post,
                body,
            },
            span,
        ))
    }

    /// `break ;` and `continue ;`
    fn parse_keyword_stmt(&mut self, kind: StmtKind) -> Result<Stmt, ParseError> {
        let start = self.cursor.advance().span;
        let semi = self.cursor.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::new(kind, start.merge(semi.span)))
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        let start = self.cursor.expect(&TokenKind::Return)?.span;
        let value = if self.cursor.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        let semi = self.cursor.expect(&TokenKind::Semicolon)?;
        Ok(Stmt::new(StmtKind::Return(value), start.merge(semi.span)))
    }
}
