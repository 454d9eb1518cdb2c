//! Change events submitted to a form

use crate::{FieldPath, Meta, Metas, Value, Values};

/// An incoming change to a form's values or metadata
///
/// Single-field variants patch one path; the other variants replace a
/// whole tree. `Reset` replaces both trees at once and is what init
/// routines submit.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
    /// Set one field's value
    Value { name: FieldPath, value: Value },
    /// Set one field's metadata
    Meta { name: FieldPath, meta: Meta },
    /// Replace every value
    Values(Values),
    /// Replace every metadata record
    Metas(Metas),
    /// Replace values and metadata together
    Reset { values: Values, metas: Metas },
}

impl Change {
    /// Create a single-field value change
    pub fn value(name: FieldPath, value: impl Into<Value>) -> Self {
        Change::Value {
            name,
            value: value.into(),
        }
    }

    /// Create a single-field metadata change
    pub fn meta(name: FieldPath, meta: Meta) -> Self {
        Change::Meta { name, meta }
    }

    /// Create a full values replacement
    pub fn values(values: impl Into<Values>) -> Self {
        Change::Values(values.into())
    }

    /// Create a full metadata replacement
    pub fn metas(metas: Metas) -> Self {
        Change::Metas(metas)
    }

    /// Create a combined replacement
    pub fn reset(values: impl Into<Values>, metas: Metas) -> Self {
        Change::Reset {
            values: values.into(),
            metas,
        }
    }

    /// Short name of the variant, for logs
    pub fn label(&self) -> &'static str {
        match self {
            Change::Value { .. } => "value",
            Change::Meta { .. } => "meta",
            Change::Values(_) => "values",
            Change::Metas(_) => "metas",
            Change::Reset { .. } => "reset",
        }
    }

    /// The field a single-field change targets
    pub fn field(&self) -> Option<&FieldPath> {
        match self {
            Change::Value { name, .. } | Change::Meta { name, .. } => Some(name),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_value() {
        let name = FieldPath::parse("user.name").unwrap();
        let change = Change::value(name.clone(), "ivan");

        assert_eq!(change.label(), "value");
        assert_eq!(change.field(), Some(&name));
    }

    #[test]
    fn test_change_reset() {
        let change = Change::reset(Values::new(), Metas::new());
        assert_eq!(change.label(), "reset");
        assert!(change.field().is_none());
    }
}
