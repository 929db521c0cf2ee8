//! Enum symbols.

use rustc_hash::FxHashMap;

use script_ir::{FunctionId, Name, NamespaceId, Type};

/// An enumeration: an insertion-ordered `name → value` map.
#[derive(Debug)]
pub struct EnumDef {
    pub name: Name,
    pub ty: Type,
    pub is_enum_class: bool,
    pub enclosing_namespace: NamespaceId,
    /// Values in declaration order.
    values: Vec<(Name, i32)>,
    by_name: FxHashMap<Name, i32>,
    /// Synthesized assignment operator.
    pub assignment: Option<FunctionId>,
}

impl EnumDef {
    pub fn new(name: Name, ty: Type, is_enum_class: bool, enclosing_namespace: NamespaceId) -> Self {
        EnumDef {
            name,
            ty,
            is_enum_class,
            enclosing_namespace,
            values: Vec::new(),
            by_name: FxHashMap::default(),
            assignment: None,
        }
    }

    /// Register a value. Returns `false` when the name already exists.
    pub fn add_value(&mut self, name: Name, value: i32) -> bool {
        if self.by_name.contains_key(&name) {
            return false;
        }
        self.values.push((name, value));
        self.by_name.insert(name, value);
        true
    }

    pub fn value(&self, name: Name) -> Option<i32> {
        self.by_name.get(&name).copied()
    }

    /// Next implicit value: previous value plus one, starting at 0.
    pub fn next_value(&self) -> i32 {
        self.values.last().map_or(0, |(_, v)| v + 1)
    }

    pub fn values(&self) -> &[(Name, i32)] {
        &self.values
    }
}
