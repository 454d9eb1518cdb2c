//! Pure state transitions for change and merge-back events
//!
//! Each half of [`FormState`] is reduced independently. A change that only
//! targets one half leaves the other half untouched, including its
//! `previous` side.

use crate::{Change, CurPrev, FieldPath, FormState, Meta, Metas, Tree, Value, Values};

/// One half of the form state, as seen by the reducer
pub trait Slice {
    /// Leaf type of the half's tree
    type Leaf: Clone;

    /// Full replacement carried by `change` for this half
    fn replacement(change: &Change) -> Option<&Tree<Self::Leaf>>;

    /// Single-field patch carried by `change` for this half
    fn patch(change: &Change) -> Option<(&FieldPath, Tree<Self::Leaf>)>;
}

/// The values half
pub struct ValuesSlice;

/// The metadata half
pub struct MetasSlice;

impl Slice for ValuesSlice {
    type Leaf = Value;

    fn replacement(change: &Change) -> Option<&Values> {
        match change {
            Change::Values(values) | Change::Reset { values, .. } => Some(values),
            _ => None,
        }
    }

    fn patch(change: &Change) -> Option<(&FieldPath, Values)> {
        match change {
            Change::Value { name, value } => Some((name, Tree::from(value.clone()))),
            _ => None,
        }
    }
}

impl Slice for MetasSlice {
    type Leaf = Meta;

    fn replacement(change: &Change) -> Option<&Metas> {
        match change {
            Change::Metas(metas) | Change::Reset { metas, .. } => Some(metas),
            _ => None,
        }
    }

    fn patch(change: &Change) -> Option<(&FieldPath, Metas)> {
        match change {
            Change::Meta { name, meta } => Some((name, Tree::leaf(meta.clone()))),
            _ => None,
        }
    }
}

/// Reduce one half of the state by a change event
///
/// Returns `None` when the change does not target this half.
///
/// - A full replacement becomes both `current` and `previous`, so the
///   replacement itself exposes no diff; only the next event sees it as
///   `previous`.
/// - A single-field patch is path-set onto `current`; `previous` is carried
///   over unchanged.
pub fn reduce<S: Slice>(
    pair: &CurPrev<Tree<S::Leaf>>,
    change: &Change,
) -> Option<CurPrev<Tree<S::Leaf>>> {
    if let Some(replacement) = S::replacement(change) {
        return Some(CurPrev::settled(replacement.clone()));
    }
    let (name, node) = S::patch(change)?;
    Some(CurPrev::new(
        pair.current.set(name, node),
        pair.previous.clone(),
    ))
}

/// Commit a logic result: the old `current` becomes `previous`
pub fn merge<T: Clone>(pair: &CurPrev<T>, result: T) -> CurPrev<T> {
    CurPrev::new(result, pair.current.clone())
}

/// Which halves a transition touched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Touched {
    pub values: bool,
    pub metas: bool,
}

impl Touched {
    pub fn any(&self) -> bool {
        self.values || self.metas
    }
}

impl FormState {
    /// Apply a change event to both halves
    pub fn apply(&mut self, change: &Change) -> Touched {
        let mut touched = Touched::default();
        if let Some(values) = reduce::<ValuesSlice>(&self.values, change) {
            self.values = values;
            touched.values = true;
        }
        if let Some(metas) = reduce::<MetasSlice>(&self.metas, change) {
            self.metas = metas;
            touched.metas = true;
        }
        touched
    }

    /// Commit the current trees produced by a logic run
    pub fn merge(&mut self, values: Values, metas: Metas) {
        self.values = merge(&self.values, values);
        self.metas = merge(&self.metas, metas);
    }
}
