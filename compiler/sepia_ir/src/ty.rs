//! Nominal type descriptors shared by the resolver and the evaluator.

use std::fmt;
use std::rc::Rc;

/// A Sepia type.
///
/// Types are nominal: two types are equal when their names are equal.
/// Function types are named by their signature (`func(int): bool`), so the
/// derived structural equality coincides with name equality.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Void,
    /// Type of the `null` literal. Assignable to every slot.
    Null,
    Function(Rc<CallSignature>),
    /// Placeholder for expressions whose type could not be determined.
    ///
    /// Compatible with everything so one mistake yields one diagnostic.
    #[default]
    Error,
}

impl Type {
    pub fn function(params: Vec<Type>, ret: Type) -> Type {
        Type::Function(Rc::new(CallSignature { params, ret }))
    }

    /// Look up a built-in type by its source name.
    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Int),
            "float" => Some(Type::Float),
            "bool" => Some(Type::Bool),
            "string" => Some(Type::String),
            "void" => Some(Type::Void),
            "null" => Some(Type::Null),
            _ => None,
        }
    }

    pub fn name(&self) -> String {
        self.to_string()
    }

    pub fn signature(&self) -> Option<&Rc<CallSignature>> {
        match self {
            Type::Function(sig) => Some(sig),
            _ => None,
        }
    }

    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, Type::Int | Type::Float)
    }

    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Error)
    }

    /// Whether a slot of type `self` can hold a value of type `value`.
    ///
    /// Every slot is nullable; nothing else converts implicitly.
    pub fn accepts(&self, value: &Type) -> bool {
        self == value || matches!(value, Type::Null) || self.is_error() || value.is_error()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Float => f.write_str("float"),
            Type::Bool => f.write_str("bool"),
            Type::String => f.write_str("string"),
            Type::Void => f.write_str("void"),
            Type::Null => f.write_str("null"),
            Type::Function(sig) => write!(f, "{sig}"),
            Type::Error => f.write_str("<error>"),
        }
    }
}

/// Ordered parameter types plus return type of any callable.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct CallSignature {
    pub params: Vec<Type>,
    pub ret: Type,
}

impl CallSignature {
    pub fn new(params: Vec<Type>, ret: Type) -> Self {
        CallSignature { params, ret }
    }

    #[inline]
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

impl fmt::Display for CallSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("func(")?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        write!(f, "): {}", self.ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn function_types_are_named_by_signature() {
        let ty = Type::function(vec![Type::Int, Type::String], Type::Bool);
        assert_eq!(ty.name(), "func(int, string): bool");
        assert_eq!(ty, Type::function(vec![Type::Int, Type::String], Type::Bool));
        assert_ne!(ty, Type::function(vec![Type::Int], Type::Bool));
    }

    #[test]
    fn null_is_accepted_everywhere() {
        assert!(Type::Int.accepts(&Type::Null));
        assert!(Type::function(vec![], Type::Void).accepts(&Type::Null));
        assert!(!Type::Int.accepts(&Type::Float));
        assert!(!Type::Float.accepts(&Type::Int));
    }

    #[test]
    fn error_type_suppresses_mismatches() {
        assert!(Type::Error.accepts(&Type::Bool));
        assert!(Type::String.accepts(&Type::Error));
    }

    #[test]
    fn from_name_covers_builtins() {
        assert_eq!(Type::from_name("float"), Some(Type::Float));
        assert_eq!(Type::from_name("Float"), None);
    }
}
