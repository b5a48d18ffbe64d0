//! Function declarations and function expressions.

use std::rc::Rc;

use sepia_ir::ast::FunctionDecl;
use sepia_ir::{CallSignature, FunctionResolveInfo, Type};

use super::ResolvePass;
use crate::scope::{FrameKind, ScopeInfo};
use crate::SemanticErrorKind;

impl ResolvePass<'_> {
    /// Resolve a function in two passes: the signature first, declaring
    /// the name so the body can recurse, then the body in a fresh
    /// function frame. Returns the function's type.
    pub(super) fn resolve_function(&mut self, decl: &FunctionDecl) -> Type {
        let params: Vec<Type> = decl.params.iter().map(|p| self.resolve_type(&p.ty)).collect();
        let ret = match &decl.return_type {
            Some(ty) => self.resolve_type(ty),
            None => Type::Void,
        };
        let signature = Rc::new(CallSignature::new(params, ret.clone()));
        let ty = Type::Function(Rc::clone(&signature));

        let index = decl
            .name
            .map(|name| self.scopes.declare(ScopeInfo::new(name, ty.clone(), true)));

        self.scopes.push(FrameKind::Function(ret.clone()));
        let param_indices = decl
            .params
            .iter()
            .zip(&signature.params)
            .map(|(param, ty)| {
                self.scopes
                    .declare(ScopeInfo::new(param.name, ty.clone(), true))
            })
            .collect();
        decl.info.set(FunctionResolveInfo {
            signature,
            index,
            param_indices,
        });
        let returns = self.resolve_stmts(&decl.body);
        self.scopes.pop();

        if !returns && !matches!(ret, Type::Void | Type::Error) {
            let name = match decl.name {
                Some(name) => format!("function `{}`", self.interner.lookup(name)),
                None => "anonymous function".to_owned(),
            };
            self.error(SemanticErrorKind::MissingReturn { name, ret }, decl.span);
        }
        ty
    }
}
