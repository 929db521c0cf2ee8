//! Function prototypes.

use std::fmt;

use script_ir::{Type, TypeFlags};

/// Return type plus ordered parameter types.
///
/// Member functions carry the implicit object as parameter 0, marked with
/// [`TypeFlags::THIS`].
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Prototype {
    pub return_type: Type,
    pub params: Vec<Type>,
}

impl Prototype {
    pub fn new(return_type: Type, params: Vec<Type>) -> Self {
        Prototype {
            return_type,
            params,
        }
    }

    /// The `this` parameter type for a member of `class_type`:
    /// `T&` (or `const T&` for const members) with the THIS flag.
    pub fn this_param(class_type: Type, is_const: bool) -> Type {
        let ty = if is_const {
            Type::cref(class_type)
        } else {
            Type::make_ref(class_type)
        };
        ty.with_flag(TypeFlags::THIS)
    }

    #[inline]
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn param(&self, i: usize) -> Type {
        self.params[i]
    }

    /// True when parameter 0 is an implicit object parameter.
    pub fn has_implicit_object(&self) -> bool {
        self.params
            .first()
            .is_some_and(|p| p.test_flag(TypeFlags::THIS))
    }
}

impl fmt::Debug for Prototype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}(", self.return_type)?;
        for (i, p) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p:?}")?;
        }
        write!(f, ")")
    }
}
