//! Class symbols.

use script_ir::ast::AccessSpecifier;
use script_ir::{ClassId, ExprId, FunctionId, Name, NamespaceId, TemplateId, Type};

/// A non-static data member.
#[derive(Clone, Debug)]
pub struct DataMember {
    pub ty: Type,
    pub name: Name,
    pub access: AccessSpecifier,
}

/// A static data member. Storage-wise it is a global: `index` is its
/// slot in the script's global table.
#[derive(Clone, Debug)]
pub struct StaticDataMember {
    pub ty: Type,
    pub name: Name,
    pub access: AccessSpecifier,
    pub init: Option<ExprId>,
    pub index: usize,
}

/// A class symbol.
///
/// Invariant: `attributes_offset` equals the sum of the data-member
/// counts of every ancestor, so a member's absolute attribute index is
/// `attributes_offset + local index`.
#[derive(Debug)]
pub struct ClassDef {
    pub name: Name,
    /// The class's own type handle (OBJECT flag set).
    pub ty: Type,
    /// At most one parent; the inheritance graph is acyclic.
    pub parent: Option<ClassId>,
    pub enclosing_namespace: NamespaceId,

    pub data_members: Vec<DataMember>,
    pub static_members: Vec<StaticDataMember>,
    pub attributes_offset: usize,

    pub constructors: Vec<FunctionId>,
    pub destructor: Option<FunctionId>,
    /// Non-virtual and virtual methods alike, in declaration order.
    pub methods: Vec<FunctionId>,
    /// Virtual methods in slot order; overriding methods reuse the
    /// parent's slot.
    pub vtable: Vec<FunctionId>,
    pub operators: Vec<FunctionId>,
    pub casts: Vec<FunctionId>,
    pub templates: Vec<TemplateId>,

    /// Classes granted access by a `friend class` declaration.
    pub friends: Vec<Name>,
}

impl ClassDef {
    pub fn new(name: Name, ty: Type, enclosing_namespace: NamespaceId) -> Self {
        ClassDef {
            name,
            ty,
            parent: None,
            enclosing_namespace,
            data_members: Vec::new(),
            static_members: Vec::new(),
            attributes_offset: 0,
            constructors: Vec::new(),
            destructor: None,
            methods: Vec::new(),
            vtable: Vec::new(),
            operators: Vec::new(),
            casts: Vec::new(),
            templates: Vec::new(),
            friends: Vec::new(),
        }
    }

    /// Total attribute count including inherited members.
    pub fn attribute_count(&self) -> usize {
        self.attributes_offset + self.data_members.len()
    }

    /// Local index of a data member by name.
    pub fn data_member_index(&self, name: Name) -> Option<usize> {
        self.data_members.iter().position(|m| m.name == name)
    }

    pub fn static_member(&self, name: Name) -> Option<&StaticDataMember> {
        self.static_members.iter().find(|m| m.name == name)
    }
}
