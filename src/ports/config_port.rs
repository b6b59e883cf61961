//! Configuration access port trait.

/// Sectioned key/value lookup. Blank values are reported as absent.
pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
}
