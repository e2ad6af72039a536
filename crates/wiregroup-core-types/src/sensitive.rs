//! Sensitive data marker
//!
//! The generator credential travels through configuration and the engine
//! wrapped in `Sensitive<T>` so it never reaches a log line or an error
//! message.

use std::fmt;

/// Wrapper for sensitive data that redacts itself in Debug and Display
///
/// # Example
///
/// ```
/// use wiregroup_core_types::Sensitive;
///
/// let key = Sensitive::new("sk-123");
/// assert_eq!(format!("{:?}", key), "***REDACTED***");
/// assert_eq!(key.expose(), &"sk-123");
/// ```
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    /// Expose the underlying value (only when handing it to the generator process)
    pub fn expose(&self) -> &T {
        &self.0
    }

    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "***REDACTED***")
    }
}

impl<T: Clone> Clone for Sensitive<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sensitive_redacts_debug_and_display() {
        let key = Sensitive::new("generator-key-abc".to_string());
        assert_eq!(format!("{:?}", key), "***REDACTED***");
        assert_eq!(format!("{}", key), "***REDACTED***");
    }

    #[test]
    fn test_sensitive_in_config_struct() {
        #[derive(Debug)]
        #[allow(dead_code)]
        struct GeneratorSettings {
            command: String,
            key: Sensitive<String>,
        }

        let settings = GeneratorSettings {
            command: "gen-packet".to_string(),
            key: Sensitive::new("secret".to_string()),
        };

        let debug_str = format!("{:?}", settings);
        assert!(debug_str.contains("gen-packet"));
        assert!(!debug_str.contains("secret"));
    }

    #[test]
    fn test_sensitive_into_inner() {
        let key = Sensitive::new(String::from("k"));
        assert_eq!(key.clone().into_inner(), "k");
        assert_eq!(key.expose(), "k");
    }
}
