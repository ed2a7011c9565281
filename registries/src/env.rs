//! Environment access for configuration lookups.

use std::collections::HashMap;

/// Source of environment variables.
///
/// Resolution code reads variables through this trait so that callers can
/// vary the environment per call without mutating process globals.
pub trait Environment {
    /// Get the value of `key`, or `None` when it is unset.
    ///
    /// An empty value is returned as `Some("")`.
    fn var(&self, key: &str) -> Option<String>;
}

impl<E> Environment for &E
where
    E: Environment + ?Sized,
{
    fn var(&self, key: &str) -> Option<String> {
        (**self).var(key)
    }
}

/// The environment of the running process.
///
/// Values which are not valid unicode are treated as unset.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

impl Environment for ProcessEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// A fixed, in-memory environment.
#[derive(Debug, Clone, Default)]
pub struct StaticEnvironment {
    vars: HashMap<String, String>,
}

impl StaticEnvironment {
    /// Create an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    /// Remove `key`.
    pub fn without(mut self, key: &str) -> Self {
        self.vars.remove(key);
        self
    }
}

impl Environment for StaticEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

impl<K, V> FromIterator<(K, V)> for StaticEnvironment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            vars: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
