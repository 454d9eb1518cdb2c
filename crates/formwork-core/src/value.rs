//! Field input values
//!
//! A [`Value`] is whatever a field holds: nothing yet, a checkbox state, a
//! number, typed text, or a nested group. Nested groups are expanded into
//! tree branches when written into a values tree.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input held by a form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum Value {
    /// Unset field
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Text input
    String(String),
    /// Multi-select and repeated inputs
    List(Vec<Value>),
    /// Group of named inputs
    Map(ValueMap),
}

/// Named inputs, kept in the order fields were first written
pub type ValueMap = IndexMap<String, Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Nothing entered: unset or empty text
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.is_empty(),
            _ => false,
        }
    }
}

fn write_joined<I, T>(f: &mut fmt::Formatter<'_>, items: I, mut item: T) -> fmt::Result
where
    I: IntoIterator,
    T: FnMut(&mut fmt::Formatter<'_>, I::Item) -> fmt::Result,
{
    for (i, entry) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item(f, entry)?;
    }
    Ok(())
}

/// Compact, human-readable rendering used in logs and demo output
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s:?}"),
            Value::List(items) => {
                f.write_str("[")?;
                write_joined(f, items, |f, item| write!(f, "{item}"))?;
                f.write_str("]")
            }
            Value::Map(map) => {
                f.write_str("{")?;
                write_joined(f, map, |f, (key, item)| write!(f, "{key}: {item}"))?;
                f.write_str("}")
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}

impl From<ValueMap> for Value {
    fn from(map: ValueMap) -> Self {
        Value::Map(map)
    }
}

/// `None` becomes `Value::Null`
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_inputs() {
        assert!(Value::Null.is_blank());
        assert!(Value::from("").is_blank());
        assert!(!Value::from(" ").is_blank());
        assert!(!Value::Int(0).is_blank());
        assert!(!Value::Bool(false).is_blank());
    }

    #[test]
    fn test_display_nested_group() {
        let mut user = ValueMap::new();
        user.insert("name".into(), Value::from("ivan"));
        user.insert("roles".into(), Value::from(vec!["admin", "ops"]));
        user.insert("age".into(), Value::from(None::<i64>));

        assert_eq!(
            Value::from(user).to_string(),
            r#"{name: "ivan", roles: ["admin", "ops"], age: null}"#
        );
    }

    #[test]
    fn test_unset_option_is_null() {
        assert!(Value::from(None::<&str>).is_null());
        assert_eq!(Value::from(Some(3)), Value::Int(3));
    }

    #[test]
    fn test_group_survives_ron() {
        let mut login = ValueMap::new();
        login.insert("remember".into(), Value::Bool(true));
        login.insert("attempts".into(), Value::Int(2));
        let value = Value::Map(login);

        let text = ron::to_string(&value).unwrap();
        let back: Value = ron::from_str(&text).unwrap();
        assert_eq!(back, value);
    }
}
