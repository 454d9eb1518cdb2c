//! Validation helper set handed to form logic
//!
//! A [`Helpers`] value owns the working snapshot of one logic run. Nothing
//! else can observe the snapshot while logic mutates it; the runtime takes
//! it back with [`Helpers::into_state`] when the run completes.

use crate::{CurPrev, Error, FieldPath, FormState, Meta, MetaPatch, Metas, Result, Tree, Value, Values};
use std::collections::HashMap;

/// Inputs a validator sees for one field
#[derive(Debug, Clone, Copy)]
pub struct Validation<'a> {
    pub value: &'a Value,
    pub previous_value: &'a Value,
    pub meta: &'a Meta,
    pub previous_meta: &'a Meta,
}

/// A field validator: returns an error message, or `None` when valid
pub trait Validator {
    fn validate(&self, input: &Validation<'_>) -> Option<String>;
}

impl<F> Validator for F
where
    F: Fn(&Value, &Value, &Meta, &Meta) -> Option<String>,
{
    fn validate(&self, input: &Validation<'_>) -> Option<String> {
        self(
            input.value,
            input.previous_value,
            input.meta,
            input.previous_meta,
        )
    }
}

/// A single `modify` instruction
#[derive(Debug, Clone, PartialEq)]
pub struct Modify {
    pub name: FieldPath,
    pub value: Option<Value>,
    pub meta: Option<MetaPatch>,
}

impl Modify {
    pub fn field(name: FieldPath) -> Self {
        Self {
            name,
            value: None,
            meta: None,
        }
    }

    /// Write this value (`Value::Null` counts as present)
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Merge this patch onto the field's metadata
    pub fn meta(mut self, patch: MetaPatch) -> Self {
        self.meta = Some(patch);
        self
    }
}

/// Helpers bound to the working snapshot of one logic run
#[derive(Debug, Clone)]
pub struct Helpers {
    values: CurPrev<Values>,
    metas: CurPrev<Metas>,
    /// Inputs each path was last validated against during this run
    checked: HashMap<FieldPath, (Option<Values>, Meta)>,
}

impl Helpers {
    /// Take ownership of a snapshot
    pub fn new(snapshot: FormState) -> Self {
        Self {
            values: snapshot.values,
            metas: snapshot.metas,
            checked: HashMap::new(),
        }
    }

    /// Re-validate `path` if it needs it
    ///
    /// Validators run only when the field's value or metadata differs from
    /// the previous committed state, or the field has never been
    /// initialized. A field already checked during this run is skipped
    /// until its value or metadata changes again. Every validator runs, in
    /// order; the first non-empty message wins. The field's metadata is then
    /// marked initialized and its error replaced with the winner (or
    /// cleared).
    ///
    /// Fails with [`Error::NotAField`] when `path` holds a group of fields;
    /// the snapshot is left untouched.
    pub fn check(&mut self, path: &FieldPath, validators: &[&dyn Validator]) -> Result<()> {
        let current_meta = self.leaf_meta(path)?;
        let current_value = self.values.current.get(path);
        let previous_value = self.values.previous.get(path);
        let previous_meta = self.metas.previous.get_leaf(path).cloned().unwrap_or_default();

        let committed = current_value == previous_value
            && current_meta == previous_meta
            && current_meta.initialized;
        let rechecked = self.checked.get(path).is_some_and(|(value, meta)| {
            value.as_ref() == current_value && *meta == current_meta
        });
        if committed || rechecked {
            return Ok(());
        }

        let value = current_value.map(Tree::to_value).unwrap_or_default();
        let previous = previous_value.map(Tree::to_value).unwrap_or_default();
        let input = Validation {
            value: &value,
            previous_value: &previous,
            meta: &current_meta,
            previous_meta: &previous_meta,
        };
        let error = validators.iter().fold(None, |found: Option<String>, validator| {
            let outcome = validator.validate(&input).filter(|message| !message.is_empty());
            found.or(outcome)
        });

        let meta = Meta {
            initialized: true,
            error,
            ..current_meta
        };
        let checked_value = current_value.cloned();
        self.metas.current = self.metas.current.set_leaf(path, meta.clone());
        self.checked.insert(path.clone(), (checked_value, meta));
        Ok(())
    }

    /// Write a value and/or merge a metadata patch
    ///
    /// A metadata patch aimed at a group of fields fails with
    /// [`Error::NotAField`] before anything is written.
    pub fn modify(&mut self, modify: Modify) -> Result<()> {
        let Modify { name, value, meta } = modify;
        let merged = match meta {
            Some(patch) => Some(self.leaf_meta(&name)?.merged(&patch)),
            None => None,
        };
        if let Some(value) = value {
            self.values.current = self.values.current.set_value(&name, value);
        }
        if let Some(merged) = merged {
            self.metas.current = self.metas.current.set_leaf(&name, merged);
        }
        Ok(())
    }

    /// Apply several `modify` instructions in order
    ///
    /// Stops at the first failing instruction; earlier ones stay applied.
    pub fn modifiers(&mut self, list: impl IntoIterator<Item = Modify>) -> Result<()> {
        list.into_iter().try_for_each(|modify| self.modify(modify))
    }

    /// True if any field carries an error
    pub fn has_errors(&self) -> bool {
        self.metas.current.any_leaf(Meta::has_error)
    }

    /// Current value at `path` in the snapshot
    pub fn value(&self, path: &FieldPath) -> Value {
        self.values.current.value_at(path)
    }

    /// Current metadata at `path` in the snapshot
    pub fn meta(&self, path: &FieldPath) -> Meta {
        self.metas.current.get_leaf(path).cloned().unwrap_or_default()
    }

    pub fn values(&self) -> &CurPrev<Values> {
        &self.values
    }

    pub fn metas(&self) -> &CurPrev<Metas> {
        &self.metas
    }

    /// Metadata record at `path`, default when unset
    fn leaf_meta(&self, path: &FieldPath) -> Result<Meta> {
        match self.metas.current.get(path) {
            Some(Tree::Branch(children)) if !children.is_empty() => Err(Error::NotAField {
                path: path.to_string(),
            }),
            Some(Tree::Leaf(meta)) => Ok(meta.clone()),
            _ => Ok(Meta::default()),
        }
    }

    /// Give the snapshot back
    pub fn into_state(self) -> FormState {
        FormState {
            values: self.values,
            metas: self.metas,
        }
    }
}
