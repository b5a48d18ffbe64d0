//! Core formatting engine.
//!
//! Statements are rendered here; expressions in [`expr`](self::expr).

mod expr;

use sepia_ir::ast::{Expr, FunctionDecl, ParsedType, ParsedTypeKind, Stmt, StmtKind};
use sepia_ir::StringInterner;

use crate::emitter::{Emitter, StringEmitter};

/// Format a whole program.
pub fn format_program(stmts: &[Stmt], interner: &StringInterner) -> String {
    let mut formatter = Formatter::new(interner, StringEmitter::with_capacity(stmts.len() * 32));
    for stmt in stmts {
        formatter.format_stmt(stmt);
    }
    let mut emitter = formatter.into_emitter();
    emitter.finish_lines();
    emitter.into_string()
}

/// Format a single expression, without a trailing `;`.
pub fn format_expr(expr: &Expr, interner: &StringInterner) -> String {
    let mut formatter = Formatter::new(interner, StringEmitter::new());
    formatter.emit_expr(expr);
    formatter.into_emitter().into_string()
}

/// Renders statements and expressions into an [`Emitter`].
pub struct Formatter<'a, E: Emitter> {
    interner: &'a StringInterner,
    emitter: E,
    indent: usize,
}

impl<'a, E: Emitter> Formatter<'a, E> {
    pub fn new(interner: &'a StringInterner, emitter: E) -> Self {
        Formatter {
            interner,
            emitter,
            indent: 0,
        }
    }

    pub fn into_emitter(self) -> E {
        self.emitter
    }

    /// Format one statement on its own line(s) at the current indentation.
    pub fn format_stmt(&mut self, stmt: &Stmt) {
        self.emitter.emit_indent(self.indent);
        self.emit_stmt(stmt);
        self.emitter.emit_newline();
    }

    /// Render a statement starting at the current column, without the
    /// trailing newline.
    fn emit_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.emit_expr(expr);
                self.emitter.emit(";");
            }
            StmtKind::Let { name, ty, init, .. } => {
                self.emitter.emit("let ");
                self.emitter.emit(self.interner.lookup(*name));
                if let Some(ty) = ty {
                    self.emitter.emit(": ");
                    self.emit_type(ty);
                }
                if let Some(init) = init {
                    self.emitter.emit(" = ");
                    self.emit_expr(init);
                }
                self.emitter.emit(";");
            }
            StmtKind::Function(decl) => self.emit_function(decl),
            StmtKind::Class { name, members } => {
                self.emitter.emit("class ");
                self.emitter.emit(self.interner.lookup(*name));
                self.emitter.emit(" ");
                self.emit_block(members);
            }
            StmtKind::Block(stmts) => self.emit_block(stmts),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.emitter.emit("if (");
                self.emit_expr(cond);
                self.emitter.emit(")");
                match else_branch {
                    Some(else_branch) => {
                        // An else-less `if` as the then branch would capture
                        // our `else`; brace it.
                        let dangling = matches!(
                            then_branch.kind,
                            StmtKind::If {
                                else_branch: None,
                                ..
                            }
                        );
                        if dangling {
                            self.emitter.emit(" ");
                            self.emit_block(std::slice::from_ref(then_branch.as_ref()));
                        } else {
                            self.emit_body(then_branch);
                        }
                        if matches!(then_branch.kind, StmtKind::Block(_)) || dangling {
                            self.emitter.emit(" else");
                        } else {
                            self.emitter.emit_newline();
                            self.emitter.emit_indent(self.indent);
                            self.emitter.emit("else");
                        }
                        self.emit_body(else_branch);
                    }
                    None => self.emit_body(then_branch),
                }
            }
            StmtKind::While { cond, body } => {
                self.emitter.emit("while (");
                self.emit_expr(cond);
                self.emitter.emit(")");
                self.emit_body(body);
            }
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => {
                self.emitter.emit("for (");
                match init {
                    Some(init) => self.emit_stmt(init),
                    None => self.emitter.emit(";"),
                }
                if let Some(cond) = cond {
                    self.emitter.emit(" ");
                    self.emit_expr(cond);
                }
                self.emitter.emit(";");
                if let Some(post) = post {
                    self.emitter.emit(" ");
                    self.emit_expr(post);
                }
                self.emitter.emit(")");
                self.emit_body(body);
            }
            StmtKind::Break => self.emitter.emit("break;"),
            StmtKind::Continue => self.emitter.emit("continue;"),
            StmtKind::Return(value) => match value {
                Some(value) => {
                    self.emitter.emit("return ");
                    self.emit_expr(value);
                    self.emitter.emit(";");
                }
                None => self.emitter.emit("return;"),
            },
        }
    }

    /// The statement after `if (...)`, `else`, `while (...)` or `for (...)`:
    /// a block stays on the same line; anything else follows a space.
    fn emit_body(&mut self, body: &Stmt) {
        self.emitter.emit(" ");
        self.emit_stmt(body);
    }

    fn emit_block(&mut self, stmts: &[Stmt]) {
        if stmts.is_empty() {
            self.emitter.emit("{}");
            return;
        }
        self.emitter.emit("{");
        self.emitter.emit_newline();
        self.indent += 1;
        for stmt in stmts {
            self.format_stmt(stmt);
        }
        self.indent -= 1;
        self.emitter.emit_indent(self.indent);
        self.emitter.emit("}");
    }

    /// `func name(a: int): ret { ... }`; anonymous functions leave out the
    /// name and keep a space before the parameter list.
    fn emit_function(&mut self, decl: &FunctionDecl) {
        match decl.name {
            Some(name) => {
                self.emitter.emit("func ");
                self.emitter.emit(self.interner.lookup(name));
            }
            None => self.emitter.emit("func "),
        }
        self.emitter.emit("(");
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                self.emitter.emit(", ");
            }
            self.emitter.emit(self.interner.lookup(param.name));
            self.emitter.emit(": ");
            self.emit_type(&param.ty);
        }
        self.emitter.emit(")");
        if let Some(ret) = &decl.return_type {
            self.emitter.emit(": ");
            self.emit_type(ret);
        }
        self.emitter.emit(" ");
        self.emit_block(&decl.body);
    }

    fn emit_type(&mut self, ty: &ParsedType) {
        match &ty.kind {
            ParsedTypeKind::Named(name) => self.emitter.emit(self.interner.lookup(*name)),
            ParsedTypeKind::Function { params, ret } => {
                self.emitter.emit("func(");
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        self.emitter.emit(", ");
                    }
                    self.emit_type(param);
                }
                self.emitter.emit(")");
                if let Some(ret) = ret {
                    self.emitter.emit(": ");
                    self.emit_type(ret);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests;
