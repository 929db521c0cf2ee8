//! The scope stack.
//!
//! Scopes are owned nodes in a small per-compilation arena
//! ([`ScopeStack`]); each node knows its parent. Lookup queries traverse
//! parent-ward. Function-local variables are not part of this chain:
//! the statement compiler resolves them against its local stack before
//! falling back to symbol lookup.

use script_ir::{ClassId, EnumId, Name, NamespaceId};

use crate::template::TemplateArgValue;

/// A class or namespace — the unit of enclosing-declaration ownership.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SymbolRef {
    Namespace(NamespaceId),
    Class(ClassId),
}

/// Scope node payload.
#[derive(Clone, Debug)]
pub enum ScopeKind {
    Namespace(NamespaceId),
    Class(ClassId),
    Enum(EnumId),
    /// Bound template arguments, innermost instantiation.
    TemplateArgs(Vec<(Name, TemplateArgValue)>),
}

/// Handle to a scope node.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Scope(u32);

impl Scope {
    pub const fn from_raw(raw: u32) -> Self {
        Scope(raw)
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

struct ScopeNode {
    parent: Option<Scope>,
    kind: ScopeKind,
}

/// Arena of scope nodes for one compilation.
pub struct ScopeStack {
    nodes: Vec<ScopeNode>,
}

impl ScopeStack {
    /// A fresh stack with the root namespace as scope 0.
    pub fn new() -> Self {
        ScopeStack {
            nodes: vec![ScopeNode {
                parent: None,
                kind: ScopeKind::Namespace(NamespaceId::ROOT),
            }],
        }
    }

    pub fn root(&self) -> Scope {
        Scope(0)
    }

    /// Push a child scope of `parent`.
    pub fn push(&mut self, parent: Scope, kind: ScopeKind) -> Scope {
        let id = Scope(self.nodes.len() as u32);
        self.nodes.push(ScopeNode {
            parent: Some(parent),
            kind,
        });
        id
    }

    /// A detached scope with no parent; used for qualified lookup, where
    /// ascent past the resolved scope is disabled.
    pub fn detached(&mut self, kind: ScopeKind) -> Scope {
        let id = Scope(self.nodes.len() as u32);
        self.nodes.push(ScopeNode { parent: None, kind });
        id
    }

    pub fn parent(&self, scope: Scope) -> Option<Scope> {
        self.nodes[scope.index()].parent
    }

    pub fn kind(&self, scope: Scope) -> &ScopeKind {
        &self.nodes[scope.index()].kind
    }

    /// The innermost class along the chain, when inside a class body.
    pub fn enclosing_class(&self, mut scope: Scope) -> Option<ClassId> {
        loop {
            if let ScopeKind::Class(id) = self.nodes[scope.index()].kind {
                return Some(id);
            }
            scope = self.parent(scope)?;
        }
    }

    /// The innermost namespace along the chain.
    pub fn enclosing_namespace(&self, mut scope: Scope) -> NamespaceId {
        loop {
            if let ScopeKind::Namespace(id) = self.nodes[scope.index()].kind {
                return id;
            }
            match self.parent(scope) {
                Some(p) => scope = p,
                None => return NamespaceId::ROOT,
            }
        }
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        ScopeStack::new()
    }
}
