//! Identifier nodes and parsed (unresolved) types.

use crate::{ExprId, IdentId, Name, Span};

use super::operators::OperatorId;

/// An identifier as written in source, before name lookup.
#[derive(Clone, Debug)]
pub struct Ident {
    pub kind: IdentKind,
    pub span: Span,
}

/// The four identifier shapes.
#[derive(Clone, Debug)]
pub enum IdentKind {
    /// Plain name, or a built-in type keyword used as a name
    /// (`void`, `bool`, `char`, `int`, `float`, `double`, `auto`, `this`).
    Simple(Name),
    /// `operator+`, `operator()`, `operator[]`, ...
    Operator(OperatorId),
    /// `operator"" suffix` — a user-defined literal operator name.
    LiteralOperator(Name),
    /// `name<arg, ...>`.
    Template { name: Name, args: Vec<TemplateArg> },
    /// `lhs::rhs`; longer chains nest through `lhs`.
    Scoped { lhs: IdentId, rhs: IdentId },
}

impl Ident {
    /// The plain name, when this identifier has one (simple and
    /// template-ids do; operator names and scoped ids do not).
    pub fn name(&self) -> Option<Name> {
        match &self.kind {
            IdentKind::Simple(name) | IdentKind::Template { name, .. } => Some(*name),
            _ => None,
        }
    }
}

/// A template argument: a type or a constant expression.
///
/// The parser cannot always distinguish the two (`T` vs a constant named
/// `T`), so it records a type when the argument parses as one and the
/// whole fragment is consumed, otherwise an expression.
#[derive(Clone, Debug)]
pub enum TemplateArg {
    Type(QualType),
    Expr(ExprId),
}

/// Reference qualifier on a parsed type.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum RefKind {
    #[default]
    None,
    /// `T&`
    Ref,
    /// `T&&`
    RefRef,
}

/// A type as written in source: qualifiers plus either a name or a
/// function signature.
#[derive(Clone, Debug)]
pub struct QualType {
    pub is_const: bool,
    pub ref_kind: RefKind,
    /// The named type; unused when `signature` is set.
    pub ident: Option<IdentId>,
    /// Set for function-signature types `R(A, B)`.
    pub signature: Option<Box<Signature>>,
}

impl QualType {
    pub fn named(ident: IdentId) -> Self {
        QualType {
            is_const: false,
            ref_kind: RefKind::None,
            ident: Some(ident),
            signature: None,
        }
    }

    /// A type with no qualifiers and no signature part.
    pub fn is_simple(&self) -> bool {
        !self.is_const && self.ref_kind == RefKind::None && self.signature.is_none()
    }
}

/// Parsed function-signature type: `R(A, B) const &`.
#[derive(Clone, Debug)]
pub struct Signature {
    pub return_type: QualType,
    pub params: Vec<QualType>,
}
