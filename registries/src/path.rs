//! Resolution of the registries configuration file path.

use camino::Utf8PathBuf;

use crate::env::{Environment, ProcessEnvironment};
use crate::rootless::{HostPrivileges, PrivilegeDetector};

/// Environment variable which overrides the configuration path.
pub const REGISTRIES_CONFIG_PATH_ENV: &str = "REGISTRIES_CONFIG_PATH";

/// Location of the per-user configuration file, relative to `$HOME`.
pub const USER_REGISTRIES_FILE: &str = ".config/containers/registries.conf";

/// Path of the per-user registries configuration file.
///
/// Computed from the current value of `HOME`, or `None` when `HOME` is unset
/// or empty.
pub fn user_registries_file<E: Environment>(env: &E) -> Option<Utf8PathBuf> {
    let home = env.var("HOME").filter(|home| !home.is_empty())?;
    Some(Utf8PathBuf::from(home).join(USER_REGISTRIES_FILE))
}

/// Picks the registries configuration file for the current context.
///
/// The result is recomputed on every call to [`ConfigPathResolver::resolve`].
#[derive(Debug, Clone, Default)]
pub struct ConfigPathResolver<E = ProcessEnvironment, P = HostPrivileges> {
    env: E,
    privileges: P,
}

impl ConfigPathResolver {
    /// Resolver for the running process.
    pub fn system() -> Self {
        Self::default()
    }
}

impl<E, P> ConfigPathResolver<E, P>
where
    E: Environment,
    P: PrivilegeDetector,
{
    /// Create a resolver from an environment and a privilege detector.
    pub fn new(env: E, privileges: P) -> Self {
        Self { env, privileges }
    }

    /// The environment this resolver reads from.
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Resolve the configuration path.
    ///
    /// Returns, in order of preference:
    /// 1. the value of `REGISTRIES_CONFIG_PATH`, when set and non-empty,
    /// 2. the per-user file, when rootless and the file exists,
    /// 3. an empty string, meaning the parser should use its built-in default.
    pub fn resolve(&self) -> String {
        if let Some(path) = self
            .env
            .var(REGISTRIES_CONFIG_PATH_ENV)
            .filter(|path| !path.is_empty())
        {
            tracing::debug!(%path, "using {REGISTRIES_CONFIG_PATH_ENV} override");
            return path;
        }

        if self.privileges.is_rootless() {
            if let Some(path) = user_registries_file(&self.env) {
                // Probe errors (e.g. permission denied) count as absent.
                if path.try_exists().unwrap_or(false) {
                    tracing::debug!(%path, "using per-user registries configuration");
                    return path.into_string();
                }
                tracing::trace!(%path, "per-user registries configuration not found");
            }
        }

        tracing::debug!("using default registries configuration");
        String::new()
    }
}
