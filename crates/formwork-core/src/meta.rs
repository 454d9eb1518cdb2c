//! Per-field metadata owned by form logic

use crate::{Value, ValueMap};
use std::fmt;
use std::sync::Arc;

/// Callback stored in metadata and fired when the field is clicked
///
/// Handlers compare by identity: two handlers are equal only if they are
/// clones of the same allocation.
#[derive(Clone)]
pub struct ClickHandler(Arc<dyn Fn() + Send + Sync>);

impl ClickHandler {
    pub fn new(f: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self) {
        (self.0)()
    }
}

impl PartialEq for ClickHandler {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ClickHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClickHandler(..)")
    }
}

/// Transform applied to raw input before it is written as the field value
#[derive(Clone)]
pub struct Parser(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Parser {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, raw: Value) -> Value {
        (self.0)(raw)
    }
}

impl PartialEq for Parser {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Parser(..)")
    }
}

/// Metadata record for one field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    /// Field refuses input and clicks
    pub disabled: bool,
    /// Validation message, `None` when the field is valid
    pub error: Option<String>,
    /// Click callback
    pub click: Option<ClickHandler>,
    /// Input transform
    pub parse: Option<Parser>,
    /// Set once `check` has validated the field at least once
    pub initialized: bool,
    /// Free-form annotations written by logic
    pub attrs: ValueMap,
}

impl Meta {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    pub fn with_click(mut self, click: ClickHandler) -> Self {
        self.click = Some(click);
        self
    }

    pub fn with_parse(mut self, parse: Parser) -> Self {
        self.parse = Some(parse);
        self
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    /// Look up a free-form annotation
    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Shallow-merge `patch` onto this record
    ///
    /// Keys the patch does not mention keep their current value; attribute
    /// maps are merged key by key.
    pub fn merged(&self, patch: &MetaPatch) -> Meta {
        let mut meta = self.clone();
        if let Some(disabled) = patch.disabled {
            meta.disabled = disabled;
        }
        if let Some(error) = &patch.error {
            meta.error = error.clone();
        }
        if let Some(click) = &patch.click {
            meta.click = click.clone();
        }
        if let Some(parse) = &patch.parse {
            meta.parse = parse.clone();
        }
        if let Some(initialized) = patch.initialized {
            meta.initialized = initialized;
        }
        for (key, value) in &patch.attrs {
            meta.attrs.insert(key.clone(), value.clone());
        }
        meta
    }
}

/// Partial metadata update used by `modify`
///
/// Every field is optional; `Some(None)` on an optional attribute clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaPatch {
    pub disabled: Option<bool>,
    pub error: Option<Option<String>>,
    pub click: Option<Option<ClickHandler>>,
    pub parse: Option<Option<Parser>>,
    pub initialized: Option<bool>,
    pub attrs: ValueMap,
}

impl MetaPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(Some(error.into()));
        self
    }

    pub fn clear_error(mut self) -> Self {
        self.error = Some(None);
        self
    }

    pub fn click(mut self, click: ClickHandler) -> Self {
        self.click = Some(Some(click));
        self
    }

    pub fn parse(mut self, parse: Parser) -> Self {
        self.parse = Some(Some(parse));
        self
    }

    pub fn initialized(mut self, initialized: bool) -> Self {
        self.initialized = Some(initialized);
        self
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }
}
