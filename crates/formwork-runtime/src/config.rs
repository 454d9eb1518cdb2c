//! Form configuration - debounce window and runtime settings
//!
//! Configuration can be built in code or loaded from RON:
//!
//! ```text
//! (
//!     debounce_ms: 150,
//! )
//! ```

use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default delay between the last change and a logic run
pub const DEFAULT_DEBOUNCE_MS: u64 = 200;

/// Configuration for a form's recomputation pipeline
///
/// # Example
///
/// ```
/// use formwork_runtime::FormConfig;
/// use std::time::Duration;
///
/// let config = FormConfig::default();
/// assert_eq!(config.debounce(), Duration::from_millis(200));
///
/// let config = FormConfig::with_debounce(Duration::from_millis(50));
/// assert_eq!(config.debounce_ms(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormConfig {
    /// Debounce window in milliseconds
    ///
    /// Every accepted change restarts the window; logic runs once it
    /// elapses without a newer change.
    #[serde(default = "default_debounce_ms")]
    debounce_ms: u64,
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

impl FormConfig {
    /// Create a configuration with the given debounce window
    ///
    /// Sub-millisecond precision is truncated.
    pub fn with_debounce(debounce: Duration) -> Self {
        Self {
            debounce_ms: debounce.as_millis().try_into().unwrap_or(u64::MAX),
        }
    }

    /// Debounce window
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Debounce window in milliseconds
    pub fn debounce_ms(&self) -> u64 {
        self.debounce_ms
    }

    /// Set the debounce window in milliseconds
    pub fn set_debounce_ms(&mut self, ms: u64) {
        self.debounce_ms = ms;
    }

    /// Parse a configuration from RON text
    ///
    /// # Example
    ///
    /// ```
    /// use formwork_runtime::FormConfig;
    ///
    /// let config = FormConfig::from_ron_str("(debounce_ms: 75)").unwrap();
    /// assert_eq!(config.debounce_ms(), 75);
    /// ```
    pub fn from_ron_str(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Load a configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_ron_str(&text)
    }
}

impl Default for FormConfig {
    /// 200 ms debounce window
    fn default() -> Self {
        Self {
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_default_debounce() {
        let config = FormConfig::default();
        assert_eq!(config.debounce_ms(), 200);
        assert_eq!(config.debounce(), Duration::from_millis(200));
    }

    #[test]
    fn test_with_debounce() {
        let config = FormConfig::with_debounce(Duration::from_micros(50_900));
        assert_eq!(config.debounce_ms(), 50);
    }

    #[test]
    fn test_set_debounce() {
        let mut config = FormConfig::default();
        config.set_debounce_ms(10);
        assert_eq!(config.debounce(), Duration::from_millis(10));
    }

    #[test]
    fn test_from_ron_defaults_missing_fields() {
        let config = FormConfig::from_ron_str("()").unwrap();
        assert_eq!(config, FormConfig::default());
    }

    #[test]
    fn test_from_ron_rejects_garbage() {
        let err = FormConfig::from_ron_str("(debounce_ms: \"soon\")").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = FormConfig::load("/definitely/not/here.ron").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
