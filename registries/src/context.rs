//! Options passed to the configuration parser.

use camino::{Utf8Path, Utf8PathBuf};

/// Context for registries configuration lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemContext {
    system_registries_conf_path: Option<Utf8PathBuf>,
}

impl SystemContext {
    /// Context using the parser's built-in default path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from a resolved path, where the empty string means no
    /// override.
    pub fn from_resolved(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            system_registries_conf_path: (!path.is_empty()).then(|| path.into()),
        }
    }

    /// Override the registries configuration file.
    pub fn with_registries_conf_path(mut self, path: impl Into<Utf8PathBuf>) -> Self {
        self.system_registries_conf_path = Some(path.into());
        self
    }

    /// The configuration file override, if any.
    pub fn registries_conf_path(&self) -> Option<&Utf8Path> {
        self.system_registries_conf_path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_resolved_path_is_no_override() {
        assert_eq!(SystemContext::from_resolved(""), SystemContext::new());
        assert_eq!(SystemContext::from_resolved("").registries_conf_path(), None);
    }

    #[test]
    fn resolved_path_is_override() {
        let context = SystemContext::from_resolved("/etc/custom.conf");
        assert_eq!(
            context.registries_conf_path(),
            Some(Utf8Path::new("/etc/custom.conf"))
        );
    }
}
