//! Stock validators

use crate::{Validation, Validator, Value};

/// Fails on null, unset or empty-string values
#[derive(Debug, Clone, Copy, Default)]
pub struct Required;

impl Validator for Required {
    fn validate(&self, input: &Validation<'_>) -> Option<String> {
        input.value.is_blank().then(|| "Required".to_string())
    }
}

/// Fails on null values and strings shorter than `min` characters
///
/// Non-string values pass.
#[derive(Debug, Clone, Copy)]
pub struct MinLength(pub usize);

impl Validator for MinLength {
    fn validate(&self, input: &Validation<'_>) -> Option<String> {
        let too_short = match input.value {
            Value::Null => true,
            Value::String(s) => s.chars().count() < self.0,
            _ => false,
        };
        too_short.then(|| format!("Must be not less than {}", self.0))
    }
}

pub fn required() -> Required {
    Required
}

pub fn min_length(min: usize) -> MinLength {
    MinLength(min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Meta;

    fn run(validator: &dyn Validator, value: Value) -> Option<String> {
        let meta = Meta::default();
        validator.validate(&Validation {
            value: &value,
            previous_value: &Value::Null,
            meta: &meta,
            previous_meta: &meta,
        })
    }

    #[test]
    fn test_required() {
        assert_eq!(run(&required(), Value::Null).as_deref(), Some("Required"));
        assert_eq!(run(&required(), "".into()).as_deref(), Some("Required"));
        assert_eq!(run(&required(), "ivan".into()), None);
        assert_eq!(run(&required(), Value::Int(0)), None);
    }

    #[test]
    fn test_min_length() {
        let rule = min_length(6);
        assert_eq!(run(&rule, "abc".into()).as_deref(), Some("Must be not less than 6"));
        assert_eq!(run(&rule, Value::Null).as_deref(), Some("Must be not less than 6"));
        assert_eq!(run(&rule, "secret".into()), None);
        assert_eq!(run(&rule, "пароль".into()), None);
        assert_eq!(run(&rule, Value::Bool(true)), None);
    }
}
