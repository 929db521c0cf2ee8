//! Declaration nodes: variables, functions, classes, enums, namespaces,
//! templates, typedefs, using-constructs, imports.

use crate::{DeclId, ExprId, IdentId, Name, Span, StmtId};

use super::ident::QualType;

#[derive(Clone, Debug)]
pub struct Decl {
    pub kind: DeclKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum DeclKind {
    Variable(VariableDecl),
    Function(FunctionDecl),
    Class(ClassDecl),
    Enum(EnumDecl),
    Namespace {
        name: Name,
        declarations: Vec<StmtId>,
    },
    NamespaceAlias {
        name: Name,
        aliased: IdentId,
    },
    Typedef {
        ty: QualType,
        name: Name,
    },
    Using(UsingDecl),
    /// `import a.b.c;` / `export import a.b.c;`
    Import {
        export: bool,
        names: Vec<Name>,
    },
    Template(TemplateDecl),
    /// `friend class X;` — only valid inside a class body.
    Friend {
        class_name: IdentId,
    },
}

/// Variable declaration (local, global or data member).
#[derive(Clone, Debug)]
pub struct VariableDecl {
    pub ty: QualType,
    pub name: Name,
    pub is_static: bool,
    pub init: Initializer,
}

/// The initializer forms of a variable declaration.
#[derive(Clone, Debug, Default)]
pub enum Initializer {
    /// `T x;`
    #[default]
    None,
    /// `T x = e;`
    Assignment(ExprId),
    /// `T x(e1, e2);`
    Constructor(Vec<ExprId>),
    /// `T x{e1, e2};`
    Brace(Vec<ExprId>),
}

/// What kind of function a [`FunctionDecl`] declares.
#[derive(Clone, Debug)]
pub enum FunctionKind {
    /// Free or member function, or an operator overload (the name is then
    /// an operator or literal-operator identifier).
    Regular,
    /// Constructor, with its member initializer list.
    Constructor {
        initializers: Vec<MemberInitializer>,
    },
    Destructor,
    /// `operator T() const`.
    Cast { target: QualType },
}

/// One `member(args)` or `member{args}` entry in a constructor's
/// initializer list. Delegating constructors name the class itself.
#[derive(Clone, Debug)]
pub struct MemberInitializer {
    pub name: IdentId,
    pub brace_form: bool,
    pub args: Vec<ExprId>,
}

/// The body of a parsed function.
#[derive(Clone, Debug)]
pub enum FunctionBody {
    /// Compound statement.
    Block(StmtId),
    /// `= default;`
    Defaulted,
    /// `= delete;`
    Deleted,
    /// `= 0;` — pure virtual, no body.
    Pure,
}

#[derive(Clone, Debug)]
pub struct FunctionDecl {
    pub name: IdentId,
    /// Absent for constructors and destructors.
    pub return_type: Option<QualType>,
    pub params: Vec<FunctionParam>,
    pub body: FunctionBody,
    pub kind: FunctionKind,
    pub is_virtual: bool,
    pub is_static: bool,
    pub is_explicit: bool,
    /// `const` qualifier after the parameter list.
    pub is_const: bool,
}

#[derive(Clone, Debug)]
pub struct FunctionParam {
    pub ty: QualType,
    pub name: Option<Name>,
    pub default_value: Option<ExprId>,
}

/// `public` / `protected` / `private`.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
pub enum AccessSpecifier {
    #[default]
    Public,
    Protected,
    Private,
}

/// One entry of a class body, with the access level in force at its
/// declaration point.
#[derive(Clone, Debug)]
pub struct ClassMember {
    pub access: AccessSpecifier,
    pub decl: DeclId,
}

#[derive(Clone, Debug)]
pub struct ClassDecl {
    pub name: IdentId,
    /// At most one parent.
    pub parent: Option<IdentId>,
    pub members: Vec<ClassMember>,
}

#[derive(Clone, Debug)]
pub struct EnumValueDecl {
    pub name: Name,
    pub value: Option<ExprId>,
}

#[derive(Clone, Debug)]
pub struct EnumDecl {
    pub name: Name,
    pub is_enum_class: bool,
    pub values: Vec<EnumValueDecl>,
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum TemplateParamKind {
    /// `typename T`
    Type,
    /// `int N`
    Int,
    /// `bool B`
    Bool,
}

#[derive(Clone, Debug)]
pub struct TemplateParam {
    pub kind: TemplateParamKind,
    pub name: Name,
    /// Default argument: a type for type parameters, an expression for
    /// value parameters. Stored as a template argument.
    pub default_value: Option<super::ident::TemplateArg>,
}

#[derive(Clone, Debug)]
pub struct TemplateDecl {
    pub params: Vec<TemplateParam>,
    /// A class or function declaration.
    pub declaration: DeclId,
}

#[derive(Clone, Debug)]
pub enum UsingDecl {
    /// `using namespace ns;`
    Directive { name: IdentId },
    /// `using ns::name;`
    Declaration { name: IdentId },
    /// `using T = U;`
    TypeAlias { name: Name, aliased: IdentId },
}
