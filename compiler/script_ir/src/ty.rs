//! The 32-bit `Type` handle.
//!
//! A type is an index into the engine's type table plus a set of
//! qualification flags. The low 16 bits index the table; the upper bits
//! carry category and qualifier flags. Type equality is integer equality,
//! which makes `const T&` vs `T` comparisons explicit: strip flags with
//! [`Type::base_type`] first.

use std::fmt;

use bitflags::bitflags;

/// Mask selecting the type-table index of a [`Type`].
pub const TYPE_INDEX_MASK: u32 = 0xFFFF;

bitflags! {
    /// Category and qualifier bits of a [`Type`] handle.
    ///
    /// Category flags (`ENUM`, `OBJECT`, `CLOSURE`, `FUNCTION`) are
    /// assigned when the type is registered and never change; qualifier
    /// flags (`REF`, `CONST`, ...) vary per use site.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct TypeFlags: u32 {
        /// Enumeration type.
        const ENUM = 0x0001_0000;
        /// Class (object) type.
        const OBJECT = 0x0002_0000;
        /// Closure type synthesized for a lambda.
        const CLOSURE = 0x0004_0000;
        /// Function signature type.
        const FUNCTION = 0x0008_0000;
        /// Reference (`T&`).
        const REF = 0x0010_0000;
        /// `const` qualification.
        const CONST = 0x0020_0000;
        /// Rvalue reference (`T&&`).
        const RVALUE_REF = 0x0040_0000;
        /// Implicit-object (`this`) parameter marker.
        const THIS = 0x0080_0000;
        /// Lifetime managed by the engine.
        const MANAGED = 0x0100_0000;
        /// Optional function parameter (has a default argument).
        const OPTIONAL = 0x0200_0000;
        /// `protected` access on the surrounding member.
        const PROTECTED = 0x0400_0000;
        /// `private` access on the surrounding member.
        const PRIVATE = 0x0800_0000;
    }
}

/// Fixed type-table indices of the built-in types.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u32)]
pub enum BuiltIn {
    Null = 0,
    Void = 1,
    Boolean = 2,
    Char = 3,
    Int = 4,
    Float = 5,
    Double = 6,
    String = 7,
    InitializerList = 8,
    Auto = 9,
}

/// A 32-bit type handle: table index in the low 16 bits, [`TypeFlags`]
/// above.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Type(u32);

impl Type {
    pub const NULL: Type = Type(BuiltIn::Null as u32);
    pub const VOID: Type = Type(BuiltIn::Void as u32);
    pub const BOOLEAN: Type = Type(BuiltIn::Boolean as u32);
    pub const CHAR: Type = Type(BuiltIn::Char as u32);
    pub const INT: Type = Type(BuiltIn::Int as u32);
    pub const FLOAT: Type = Type(BuiltIn::Float as u32);
    pub const DOUBLE: Type = Type(BuiltIn::Double as u32);
    pub const STRING: Type = Type(BuiltIn::String as u32 | TypeFlags::OBJECT.bits());
    pub const INITIALIZER_LIST: Type = Type(BuiltIn::InitializerList as u32);
    pub const AUTO: Type = Type(BuiltIn::Auto as u32);

    /// First table index available for user types.
    pub const FIRST_USER_INDEX: u32 = 16;

    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Type(raw)
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Build a type from a table index and category flags.
    #[inline]
    pub const fn new(index: u32, flags: TypeFlags) -> Self {
        Type(index & TYPE_INDEX_MASK | flags.bits())
    }

    /// Table index of this type.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0 & TYPE_INDEX_MASK
    }

    #[inline]
    pub fn flags(self) -> TypeFlags {
        TypeFlags::from_bits_truncate(self.0)
    }

    /// Strip every qualifier, keeping the index and category flags.
    ///
    /// `base_type(const T&) == base_type(T)` for every `T`.
    #[inline]
    pub fn base_type(self) -> Type {
        let keep = TypeFlags::ENUM | TypeFlags::OBJECT | TypeFlags::CLOSURE | TypeFlags::FUNCTION;
        Type(self.index() | (self.flags() & keep).bits())
    }

    #[inline]
    pub fn is_null(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn is_const(self) -> bool {
        self.flags().contains(TypeFlags::CONST)
    }

    #[inline]
    pub fn is_reference(self) -> bool {
        self.flags().contains(TypeFlags::REF)
    }

    #[inline]
    pub fn is_rvalue_reference(self) -> bool {
        self.flags().contains(TypeFlags::RVALUE_REF)
    }

    #[inline]
    pub fn is_const_ref(self) -> bool {
        self.is_const() && self.is_reference()
    }

    /// Fundamental types: Null, Void, Boolean, Char, Int, Float, Double.
    #[inline]
    pub fn is_fundamental(self) -> bool {
        !self
            .flags()
            .intersects(TypeFlags::ENUM | TypeFlags::OBJECT | TypeFlags::CLOSURE | TypeFlags::FUNCTION)
            && self.index() <= BuiltIn::Double as u32
    }

    #[inline]
    pub fn is_enum(self) -> bool {
        self.flags().contains(TypeFlags::ENUM)
    }

    #[inline]
    pub fn is_object(self) -> bool {
        self.flags().contains(TypeFlags::OBJECT)
    }

    #[inline]
    pub fn is_closure(self) -> bool {
        self.flags().contains(TypeFlags::CLOSURE)
    }

    #[inline]
    pub fn is_function(self) -> bool {
        self.flags().contains(TypeFlags::FUNCTION)
    }

    #[inline]
    pub fn test_flag(self, flag: TypeFlags) -> bool {
        self.flags().contains(flag)
    }

    #[inline]
    #[must_use]
    pub fn with_flag(self, flag: TypeFlags) -> Type {
        Type(self.0 | flag.bits())
    }

    #[inline]
    #[must_use]
    pub fn without_flag(self, flag: TypeFlags) -> Type {
        Type(self.0 & !flag.bits())
    }

    #[inline]
    #[must_use]
    pub fn with_const(self) -> Type {
        self.with_flag(TypeFlags::CONST)
    }

    #[inline]
    #[must_use]
    pub fn without_const(self) -> Type {
        self.without_flag(TypeFlags::CONST)
    }

    #[inline]
    #[must_use]
    pub fn without_ref(self) -> Type {
        self.without_flag(TypeFlags::REF | TypeFlags::RVALUE_REF)
    }

    /// `T&` over the base of `ty`.
    #[inline]
    pub fn make_ref(ty: Type) -> Type {
        ty.with_flag(TypeFlags::REF)
    }

    /// `const T&` over `ty`.
    #[inline]
    pub fn cref(ty: Type) -> Type {
        ty.with_flag(TypeFlags::REF | TypeFlags::CONST)
    }

    /// `T&&` over `ty`.
    #[inline]
    pub fn rref(ty: Type) -> Type {
        ty.without_ref().with_flag(TypeFlags::RVALUE_REF)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const() {
            write!(f, "const ")?;
        }
        write!(f, "ty#{}", self.index())?;
        if self.is_reference() {
            write!(f, "&")?;
        } else if self.is_rvalue_reference() {
            write!(f, "&&")?;
        }
        Ok(())
    }
}

crate::static_assert_size!(Type, 4);

#[cfg(test)]
mod tests;
