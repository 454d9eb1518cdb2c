//! Path-addressed persistent trees
//!
//! A [`Tree`] is either a leaf or a branch of named children. Branches are
//! reference-counted, so [`Tree::set`] copies only the spine along the
//! written path and shares every untouched branch with the original. The
//! original tree is never mutated.

use crate::{FieldPath, Value, ValueMap};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Children of a branch, in insertion order
pub type Branch<T> = IndexMap<String, Tree<T>>;

/// Immutable nested mapping addressed by [`FieldPath`]
///
/// Equality is structural: two trees are equal when they hold equal leaves
/// under equal keys, regardless of sharing.
#[derive(Debug, Clone, PartialEq)]
pub enum Tree<T> {
    /// A value stored at a path
    Leaf(T),
    /// Named children
    Branch(Arc<Branch<T>>),
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Tree::Branch(Arc::new(IndexMap::new()))
    }
}

impl<T: Clone> Tree<T> {
    /// Create an empty branch
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a leaf
    pub fn leaf(value: T) -> Self {
        Tree::Leaf(value)
    }

    /// True for a branch without children
    pub fn is_empty(&self) -> bool {
        matches!(self, Tree::Branch(children) if children.is_empty())
    }

    /// The leaf value, if this node is a leaf
    pub fn as_leaf(&self) -> Option<&T> {
        match self {
            Tree::Leaf(value) => Some(value),
            Tree::Branch(_) => None,
        }
    }

    /// The children, if this node is a branch
    pub fn children(&self) -> Option<&Branch<T>> {
        match self {
            Tree::Leaf(_) => None,
            Tree::Branch(children) => Some(children),
        }
    }

    /// Read the node stored at `path`
    pub fn get(&self, path: &FieldPath) -> Option<&Tree<T>> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| node.children()?.get(segment))
    }

    /// Read the leaf stored at `path`
    pub fn get_leaf(&self, path: &FieldPath) -> Option<&T> {
        self.get(path)?.as_leaf()
    }

    /// Return a new tree with `node` stored at `path`
    ///
    /// Missing intermediate segments are created as empty branches, and an
    /// intermediate leaf is replaced by a branch.
    pub fn set(&self, path: &FieldPath, node: Tree<T>) -> Tree<T> {
        self.set_in(path.segments(), node)
    }

    /// Return a new tree with a leaf stored at `path`
    ///
    /// `value` is stored as-is. For value trees use [`Tree::set_value`],
    /// which expands nested maps into branches.
    pub fn set_leaf(&self, path: &FieldPath, value: T) -> Tree<T> {
        self.set(path, Tree::Leaf(value))
    }

    fn set_in(&self, segments: &[String], node: Tree<T>) -> Tree<T> {
        let Some((head, rest)) = segments.split_first() else {
            return node;
        };
        // Shallow copy: sibling branches stay shared through their Arc
        let mut children = match self {
            Tree::Branch(children) => Branch::clone(children),
            Tree::Leaf(_) => IndexMap::new(),
        };
        let child = match children.get(head) {
            Some(existing) => existing.set_in(rest, node),
            None => Tree::new().set_in(rest, node),
        };
        children.insert(head.clone(), child);
        Tree::Branch(Arc::new(children))
    }

    /// Flatten into `(path, leaf)` pairs, depth-first in insertion order
    ///
    /// A leaf at the root has no path and is not reported.
    pub fn leaves(&self) -> Vec<(FieldPath, &T)> {
        let mut out = Vec::new();
        if let Tree::Branch(children) = self {
            for (key, child) in children.iter() {
                child.collect_leaves(FieldPath::from_key(key), &mut out);
            }
        }
        out
    }

    fn collect_leaves<'a>(&'a self, path: FieldPath, out: &mut Vec<(FieldPath, &'a T)>) {
        match self {
            Tree::Leaf(value) => out.push((path, value)),
            Tree::Branch(children) => {
                for (key, child) in children.iter() {
                    child.collect_leaves(path.pushed(key), out);
                }
            }
        }
    }

    /// True if any leaf satisfies `pred`
    pub fn any_leaf(&self, pred: impl Fn(&T) -> bool + Copy) -> bool {
        match self {
            Tree::Leaf(value) => pred(value),
            Tree::Branch(children) => children.values().any(|child| child.any_leaf(pred)),
        }
    }
}

impl Tree<Value> {
    /// Convert back into a nested [`Value`]
    pub fn to_value(&self) -> Value {
        match self {
            Tree::Leaf(value) => value.clone(),
            Tree::Branch(children) => Value::Map(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.to_value()))
                    .collect(),
            ),
        }
    }

    /// Return a new tree with `value` stored at `path`
    ///
    /// A `Value::Map` becomes a branch, so its entries stay addressable by
    /// path and compare equal to the same fields set one by one.
    pub fn set_value(&self, path: &FieldPath, value: impl Into<Value>) -> Tree<Value> {
        self.set(path, Tree::from(value.into()))
    }

    /// The value at `path`, or `Value::Null` when unset
    pub fn value_at(&self, path: &FieldPath) -> Value {
        self.get(path).map(Tree::to_value).unwrap_or_default()
    }
}

/// Nested maps become branches; everything else is a leaf
impl From<Value> for Tree<Value> {
    fn from(value: Value) -> Self {
        match value {
            Value::Map(map) => Tree::Branch(Arc::new(
                map.into_iter()
                    .map(|(key, child)| (key, Tree::from(child)))
                    .collect(),
            )),
            other => Tree::Leaf(other),
        }
    }
}

impl From<ValueMap> for Tree<Value> {
    fn from(map: ValueMap) -> Self {
        Tree::from(Value::Map(map))
    }
}

impl<T: Serialize> Serialize for Tree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Tree::Leaf(value) => value.serialize(serializer),
            Tree::Branch(children) => children.as_ref().serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Tree<Value> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Tree::from)
    }
}
