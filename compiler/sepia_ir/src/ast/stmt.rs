//! Statement and declaration nodes.

use std::fmt;
use std::rc::Rc;

use super::{Expr, ParsedType};
use crate::{FunctionResolveInfo, Name, ResolveSlot, Span, StmtInfo};

/// A statement with its location and resolution slot.
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
    pub info: ResolveSlot<StmtInfo>,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt {
            kind,
            span,
            info: ResolveSlot::default(),
        }
    }

    pub fn always_returns(&self) -> bool {
        self.info.with(|info| info.always_returns)
    }
}

pub enum StmtKind {
    Expr(Expr),
    Let {
        name: Name,
        name_span: Span,
        ty: Option<ParsedType>,
        init: Option<Expr>,
    },
    /// Shared so closures can keep their body alive.
    Function(Rc<FunctionDecl>),
    /// Parsed for completeness; rejected during resolution.
    Class {
        name: Name,
        members: Vec<Stmt>,
    },
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        cond: Option<Expr>,
        post: Option<Expr>,
        body: Box<Stmt>,
    },
    Break,
    Continue,
    Return(Option<Expr>),
}

/// A function literal, named (declaration) or anonymous (expression).
pub struct FunctionDecl {
    pub name: Option<Name>,
    pub params: Vec<Param>,
    /// `None` means `void`.
    pub return_type: Option<ParsedType>,
    pub body: Vec<Stmt>,
    pub span: Span,
    pub info: ResolveSlot<FunctionResolveInfo>,
}

/// `name: type` in a parameter list.
#[derive(Debug)]
pub struct Param {
    pub name: Name,
    pub ty: ParsedType,
    pub span: Span,
}

impl fmt::Debug for Stmt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl fmt::Debug for StmtKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StmtKind::Expr(expr) => f.debug_tuple("Expr").field(expr).finish(),
            StmtKind::Let { name, ty, init, .. } => f
                .debug_struct("Let")
                .field("name", name)
                .field("ty", ty)
                .field("init", init)
                .finish(),
            StmtKind::Function(decl) => f.debug_tuple("Function").field(decl).finish(),
            StmtKind::Class { name, members } => f
                .debug_struct("Class")
                .field("name", name)
                .field("members", members)
                .finish(),
            StmtKind::Block(stmts) => f.debug_tuple("Block").field(stmts).finish(),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => f
                .debug_struct("If")
                .field("cond", cond)
                .field("then", then_branch)
                .field("else", else_branch)
                .finish(),
            StmtKind::While { cond, body } => f
                .debug_struct("While")
                .field("cond", cond)
                .field("body", body)
                .finish(),
            StmtKind::For {
                init,
                cond,
                post,
                body,
            } => f
                .debug_struct("For")
                .field("init", init)
                .field("cond", cond)
                .field("post", post)
                .field("body", body)
                .finish(),
            StmtKind::Break => f.write_str("Break"),
            StmtKind::Continue => f.write_str("Continue"),
            StmtKind::Return(value) => f.debug_tuple("Return").field(value).finish(),
        }
    }
}

impl fmt::Debug for FunctionDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDecl")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("return_type", &self.return_type)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}
