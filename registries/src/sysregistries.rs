//! Reading registry lists from `registries.conf`.
//!
//! Only the v1 layout is understood:
//!
//! ```toml
//! [registries.search]
//! registries = ["docker.io", "quay.io"]
//!
//! [registries.insecure]
//! registries = ["localhost:5000"]
//!
//! [registries.block]
//! registries = []
//! ```
//!
//! Tables which are absent read as empty lists, and unknown keys are ignored.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

use crate::context::SystemContext;

/// Default location of the system-wide registries configuration.
pub const SYSTEM_REGISTRIES_CONF_PATH: &str = "/etc/containers/registries.conf";

/// A source of registry lists.
pub trait ConfigParser {
    /// Error returned when the configuration can't be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Registries searched for unqualified image names, in order.
    fn search_registries(&self, context: &SystemContext) -> Result<Vec<String>, Self::Error>;

    /// Registries which may be accessed without TLS verification, in order.
    fn insecure_registries(&self, context: &SystemContext) -> Result<Vec<String>, Self::Error>;
}

impl<C> ConfigParser for &C
where
    C: ConfigParser + ?Sized,
{
    type Error = C::Error;

    fn search_registries(&self, context: &SystemContext) -> Result<Vec<String>, Self::Error> {
        (**self).search_registries(context)
    }

    fn insecure_registries(&self, context: &SystemContext) -> Result<Vec<String>, Self::Error> {
        (**self).insecure_registries(context)
    }
}

/// Cause of a [`SysRegistriesError`].
#[derive(Debug, thiserror::Error)]
pub enum SysRegistriesErrorKind {
    /// The file could not be read.
    #[error("IO: {0}")]
    Io(#[from] io::Error),

    /// The file is not valid TOML, or has the wrong shape.
    #[error("TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Failure reading a registries configuration file.
#[derive(Debug, thiserror::Error)]
#[error("reading registries configuration from {path}")]
pub struct SysRegistriesError {
    path: Utf8PathBuf,
    #[source]
    kind: SysRegistriesErrorKind,
}

impl SysRegistriesError {
    /// The file which failed to load.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// What went wrong.
    pub fn kind(&self) -> &SysRegistriesErrorKind {
        &self.kind
    }
}

#[derive(Debug, Default, Deserialize)]
struct TomlConfig {
    #[serde(default)]
    registries: RegistryTables,
}

#[derive(Debug, Default, Deserialize)]
struct RegistryTables {
    #[serde(default)]
    search: RegistryList,
    #[serde(default)]
    insecure: RegistryList,
    #[serde(default)]
    block: RegistryList,
}

#[derive(Debug, Default, Deserialize)]
struct RegistryList {
    #[serde(default)]
    registries: Vec<String>,
}

/// Reads `registries.conf` from disk on every query.
#[derive(Debug, Clone)]
pub struct SystemRegistries {
    default_path: Utf8PathBuf,
}

impl Default for SystemRegistries {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemRegistries {
    /// Parser falling back to [`SYSTEM_REGISTRIES_CONF_PATH`].
    pub fn new() -> Self {
        Self {
            default_path: SYSTEM_REGISTRIES_CONF_PATH.into(),
        }
    }

    /// Parser falling back to `path` when the context has no override.
    pub fn with_default_path(path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            default_path: path.into(),
        }
    }

    /// The file read for `context`.
    pub fn conf_path<'c>(&'c self, context: &'c SystemContext) -> &'c Utf8Path {
        context
            .registries_conf_path()
            .unwrap_or(self.default_path.as_path())
    }

    /// Registries which must not be pulled from, in order.
    pub fn blocked_registries(
        &self,
        context: &SystemContext,
    ) -> Result<Vec<String>, SysRegistriesError> {
        Ok(self.load(context)?.registries.block.registries)
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn load(&self, context: &SystemContext) -> Result<TomlConfig, SysRegistriesError> {
        let path = self.conf_path(context);
        tracing::trace!(%path, "loading registries configuration");

        let error = |kind: SysRegistriesErrorKind| SysRegistriesError {
            path: path.to_owned(),
            kind,
        };

        let contents = std::fs::read_to_string(path).map_err(|err| error(err.into()))?;
        toml::from_str(&contents).map_err(|err| error(err.into()))
    }
}

impl ConfigParser for SystemRegistries {
    type Error = SysRegistriesError;

    fn search_registries(&self, context: &SystemContext) -> Result<Vec<String>, Self::Error> {
        Ok(self.load(context)?.registries.search.registries)
    }

    fn insecure_registries(&self, context: &SystemContext) -> Result<Vec<String>, Self::Error> {
        Ok(self.load(context)?.registries.insecure.registries)
    }
}
