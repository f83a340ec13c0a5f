//! Explicit type-relationship table.
//!
//! There is no ambient class hierarchy to reflect over at runtime, so the
//! relationships a dispatch walk needs are declared up front: each class
//! names its parent and its interfaces, each interface names the
//! interfaces it extends. The graph then answers the ancestor and
//! interface queries the key resolver performs.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::value::TypeName;

/// Whether a declaration names a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Interface,
}

/// A single class or interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    name: TypeName,
    kind: TypeKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    extends: Option<TypeName>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    implements: Vec<TypeName>,
}

impl TypeDecl {
    pub fn class(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Class,
            extends: None,
            implements: Vec::new(),
        }
    }

    pub fn interface(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            kind: TypeKind::Interface,
            extends: None,
            implements: Vec::new(),
        }
    }

    /// Parent class. Only meaningful on class declarations.
    pub fn extends(mut self, parent: impl Into<TypeName>) -> Self {
        self.extends = Some(parent.into());
        self
    }

    /// Interfaces this class implements. On an interface declaration,
    /// the interfaces it extends.
    pub fn implements<I, T>(mut self, interfaces: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.implements.extend(interfaces.into_iter().map(Into::into));
        self
    }

    pub fn name(&self) -> &TypeName {
        &self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }
}

/// Table of class/interface declarations with hierarchy queries.
///
/// Declaration order is preserved; all derived orders (ancestor chains,
/// interface lists) are stable across runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeGraph {
    types: IndexMap<TypeName, TypeDecl>,
}

impl TypeGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a declaration, replacing any previous one with the same name.
    pub fn define(&mut self, decl: TypeDecl) {
        self.types.insert(decl.name.clone(), decl);
    }

    pub fn contains(&self, name: &TypeName) -> bool {
        self.types.contains_key(name)
    }

    pub fn get(&self, name: &TypeName) -> Option<&TypeDecl> {
        self.types.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Ancestor classes of `name`, most-derived first, excluding `name`
    /// itself. The walk ends at the first undeclared parent and tolerates
    /// cyclic declarations.
    pub fn ancestors(&self, name: &TypeName) -> Vec<TypeName> {
        let mut seen = IndexSet::new();
        seen.insert(name.clone());

        let mut chain = Vec::new();
        let mut current = self.types.get(name).and_then(|decl| decl.extends.as_ref());
        while let Some(parent) = current {
            if !seen.insert(parent.clone()) {
                break;
            }
            chain.push(parent.clone());
            current = self.types.get(parent).and_then(|decl| decl.extends.as_ref());
        }
        chain
    }

    /// Interfaces `name` implements (or extends, for an interface):
    /// its own declarations first, then those inherited along the
    /// ancestor chain, each expanded through the interfaces it extends.
    /// First-seen order, deduplicated.
    pub fn interfaces_of(&self, name: &TypeName) -> Vec<TypeName> {
        let mut collected = IndexSet::new();
        self.collect_interfaces(name, &mut collected);
        for ancestor in self.ancestors(name) {
            self.collect_interfaces(&ancestor, &mut collected);
        }
        collected.shift_remove(name);
        collected.into_iter().collect()
    }

    fn collect_interfaces(&self, name: &TypeName, collected: &mut IndexSet<TypeName>) {
        let Some(decl) = self.types.get(name) else {
            return;
        };
        for interface in &decl.implements {
            if collected.insert(interface.clone()) {
                self.collect_interfaces(interface, collected);
            }
        }
    }

    /// `name` itself, then its ancestors, then its interfaces: every type
    /// identifier a value of type `name` satisfies, in fallback order.
    pub fn variations(&self, name: &TypeName) -> Vec<TypeName> {
        let mut variations = vec![name.clone()];
        variations.extend(self.ancestors(name));
        variations.extend(self.interfaces_of(name));
        variations
    }

    /// Whether a value of type `name` satisfies `target`: the same name,
    /// an ancestor class, or an implemented interface.
    pub fn is_instance(&self, name: &TypeName, target: &TypeName) -> bool {
        name == target
            || self.ancestors(name).contains(target)
            || self.interfaces_of(name).contains(target)
    }
}

impl FromIterator<TypeDecl> for TypeGraph {
    fn from_iter<I: IntoIterator<Item = TypeDecl>>(decls: I) -> Self {
        let mut graph = TypeGraph::new();
        for decl in decls {
            graph.define(decl);
        }
        graph
    }
}
