//! Configuration access port trait.

use crate::domain::error::CrosstraderError;

/// Section/key lookups over a run configuration.
///
/// Blank values are reported as absent. Numeric getters fall back to
/// `default` when the key is missing or does not parse.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_int(&self, section: &str, key: &str, default: i64) -> i64;
    fn get_double(&self, section: &str, key: &str, default: f64) -> f64;

    fn require_string(&self, section: &str, key: &str) -> Result<String, CrosstraderError> {
        self.get_string(section, key)
            .ok_or_else(|| CrosstraderError::ConfigMissing {
                section: section.to_string(),
                key: key.to_string(),
            })
    }
}
