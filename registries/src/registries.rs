//! Registry queries over the resolved configuration

use crate::context::SystemContext;
use crate::env::{Environment, ProcessEnvironment};
use crate::error::{RegistriesError, RegistriesResult};
use crate::path::ConfigPathResolver;
use crate::reference::Reference;
use crate::rootless::{HostPrivileges, PrivilegeDetector};
use crate::sysregistries::{ConfigParser, SystemRegistries};

/// Registry lists read from the configuration which applies to the caller.
///
/// Every query resolves the configuration path again, so changes to the
/// environment or to the per-user file are picked up between calls.
#[derive(Debug, Clone, Default)]
pub struct Registries<E = ProcessEnvironment, P = HostPrivileges, C = SystemRegistries> {
    resolver: ConfigPathResolver<E, P>,
    parser: C,
}

impl Registries {
    /// Registries for the running process, read from disk.
    pub fn system() -> Self {
        Self::default()
    }
}

impl<E, P, C> Registries<E, P, C>
where
    E: Environment,
    P: PrivilegeDetector,
    C: ConfigParser,
{
    /// Create a query facade from a path resolver and a configuration parser.
    pub fn new(resolver: ConfigPathResolver<E, P>, parser: C) -> Self {
        Self { resolver, parser }
    }

    /// The path resolver used by this facade.
    pub fn resolver(&self) -> &ConfigPathResolver<E, P> {
        &self.resolver
    }

    /// The configuration parser used by this facade.
    pub fn parser(&self) -> &C {
        &self.parser
    }

    /// Resolved configuration path, or `""` for the parser's default.
    pub fn conf_path(&self) -> String {
        self.resolver.resolve()
    }

    fn context(&self) -> SystemContext {
        SystemContext::from_resolved(self.resolver.resolve())
    }

    /// Registries searched for unqualified image names, in configuration order.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn search_registries(&self) -> RegistriesResult<Vec<String>> {
        let registries = self
            .parser
            .search_registries(&self.context())
            .map_err(RegistriesError::config_parse)?;
        tracing::debug!("Found {} search registries", registries.len());
        Ok(registries)
    }

    /// Registries which may be accessed insecurely, in configuration order.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn insecure_registries(&self) -> RegistriesResult<Vec<String>> {
        let registries = self
            .parser
            .insecure_registries(&self.context())
            .map_err(RegistriesError::config_parse)?;
        tracing::debug!("Found {} insecure registries", registries.len());
        Ok(registries)
    }
}

/// Registry domain of an image reference.
///
/// A bare registry written with a trailing slash, like `myregistry/`, is
/// returned without that slash. Anything else is parsed as a reference and
/// its domain returned as-is, which is empty when the image names no domain.
pub fn get_registry(image: &str) -> RegistriesResult<String> {
    if let Some(registry) = image.strip_suffix('/') {
        return Ok(registry.to_owned());
    }

    let reference = Reference::parse(image)?;
    let named = reference
        .named()
        .ok_or_else(|| RegistriesError::UnnamedReference(image.to_owned()))?;
    Ok(named.domain().to_owned())
}
