//! Field bindings
//!
//! A [`FieldBinding`] is what a field component holds: a path plus the
//! registry slot of its form. Until the form registers, reads return
//! defaults and writes are dropped.

use crate::{resolve_form_name, Error, FormHandle, FormRegistry, FormScope, Result};
use formwork_core::{Change, FieldPath, Meta, Value};
use tokio::sync::watch;
use tracing::trace;

/// A field attached to a form by name
#[derive(Debug, Clone)]
pub struct FieldBinding {
    path: FieldPath,
    slot: watch::Receiver<Option<FormHandle>>,
}

impl FieldBinding {
    /// Bind `path` of the form registered (now or later) as `form`
    pub fn attach(registry: &FormRegistry, form: &str, path: FieldPath) -> Self {
        Self {
            path,
            slot: registry.attach(form),
        }
    }

    /// Bind `path` of the form named by the nearest marked ancestor of `scope`
    ///
    /// Without such an ancestor the binding stays detached for good.
    pub fn in_scope<S>(registry: &FormRegistry, scope: &S, path: FieldPath) -> Self
    where
        S: FormScope + ?Sized,
    {
        match resolve_form_name(scope) {
            Some(form) => Self::attach(registry, form, path),
            None => {
                trace!(field = %path, "no enclosing form, field detached");
                let (_, slot) = watch::channel(None);
                Self { path, slot }
            }
        }
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Form the field currently writes to
    pub fn form(&self) -> Option<FormHandle> {
        self.slot.borrow().clone()
    }

    /// Current value, `Value::Null` when unset or unattached
    pub fn value(&self) -> Value {
        self.slot
            .borrow()
            .as_ref()
            .map(|form| form.values().with(|values| values.current.value_at(&self.path)))
            .unwrap_or_default()
    }

    /// Current metadata, default when unset or unattached
    pub fn meta(&self) -> Meta {
        self.slot
            .borrow()
            .as_ref()
            .and_then(|form| {
                form.metas()
                    .with(|metas| metas.current.get_leaf(&self.path).cloned())
            })
            .unwrap_or_default()
    }

    /// Submit raw input, passed through the field's `parse` transform
    pub fn input(&self, raw: impl Into<Value>) -> Result<()> {
        let Some(form) = self.form() else {
            trace!(field = %self.path, "input dropped, form not registered");
            return Ok(());
        };
        let raw = raw.into();
        let value = match self.meta().parse {
            Some(parse) => parse.apply(raw),
            None => raw,
        };
        form.submit(Change::value(self.path.clone(), value))
    }

    /// Invoke the field's click handler
    ///
    /// Returns `false` when there is no handler or the field is disabled.
    pub fn click(&self) -> bool {
        let meta = self.meta();
        match meta.click {
            Some(handler) if !meta.disabled => {
                handler.call();
                true
            }
            Some(_) => {
                trace!(field = %self.path, "click ignored, field disabled");
                false
            }
            None => false,
        }
    }

    /// Wait until the field's value or metadata differs from what it was
    /// when called, and return the new pair
    ///
    /// Publications that leave this field untouched are skipped. A form
    /// (re-)registering under the field's name counts as a publication.
    pub async fn changed(&mut self) -> Result<(Value, Meta)> {
        let last = (self.value(), self.meta());
        loop {
            let form = self.slot.borrow_and_update().clone();
            let slot_open = match form {
                Some(form) => {
                    let mut values = form.values();
                    let mut metas = form.metas();
                    values.mark_seen();
                    metas.mark_seen();

                    let now = (self.value(), self.meta());
                    if now != last {
                        return Ok(now);
                    }
                    tokio::select! {
                        res = self.slot.changed() => res.is_ok(),
                        res = values.changed() => res.map(|_| true)?,
                        res = metas.changed() => res.map(|_| true)?,
                    }
                }
                None => self.slot.changed().await.is_ok(),
            };
            if !slot_open {
                return Err(Error::Detached(self.path.to_string()));
            }
        }
    }
}
