//! Current/previous form state

use crate::{Meta, Tree, Value};

/// Field values, addressed by path
pub type Values = Tree<Value>;

/// Field metadata, addressed by path
pub type Metas = Tree<Meta>;

/// A value together with the state it had before the last committed
/// transition
///
/// Logic compares the two halves to tell whether a field actually changed
/// without diffing against history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurPrev<T> {
    pub current: T,
    pub previous: T,
}

impl<T: Clone> CurPrev<T> {
    pub fn new(current: T, previous: T) -> Self {
        Self { current, previous }
    }

    /// Both halves set to `value`
    pub fn settled(value: T) -> Self {
        Self {
            previous: value.clone(),
            current: value,
        }
    }
}

/// Everything a form tracks: the values pair and the metadata pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub values: CurPrev<Values>,
    pub metas: CurPrev<Metas>,
}

impl FormState {
    /// Empty state of a freshly created form
    pub fn new() -> Self {
        Self::default()
    }

    /// Current value at `path`, `Value::Null` when unset
    pub fn value(&self, path: &crate::FieldPath) -> Value {
        self.values.current.value_at(path)
    }

    /// Current metadata at `path`, default when unset
    pub fn meta(&self, path: &crate::FieldPath) -> Meta {
        self.metas.current.get_leaf(path).cloned().unwrap_or_default()
    }

    /// True if any current metadata record carries an error
    pub fn has_errors(&self) -> bool {
        self.metas.current.any_leaf(Meta::has_error)
    }
}
