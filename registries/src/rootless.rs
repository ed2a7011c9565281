//! Detection of rootless (unprivileged) execution.

use crate::env::{Environment, ProcessEnvironment};

/// Set by rootless launchers once the process has been re-executed inside
/// a user namespace. Inside that namespace the effective uid is 0.
pub const USERNS_CONFIGURED_ENV: &str = "_CONTAINERS_USERNS_CONFIGURED";

/// Reports whether the current process runs without host privileges.
pub trait PrivilegeDetector {
    /// True when running in rootless mode.
    fn is_rootless(&self) -> bool;
}

impl PrivilegeDetector for bool {
    fn is_rootless(&self) -> bool {
        *self
    }
}

impl<P> PrivilegeDetector for &P
where
    P: PrivilegeDetector + ?Sized,
{
    fn is_rootless(&self) -> bool {
        (**self).is_rootless()
    }
}

/// Privilege detection for the host process.
#[derive(Debug, Clone, Default)]
pub struct HostPrivileges<E = ProcessEnvironment> {
    env: E,
}

impl HostPrivileges {
    /// Detect privileges of the running process.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<E: Environment> HostPrivileges<E> {
    /// Detect privileges, reading the user namespace marker from `env`.
    pub fn with_environment(env: E) -> Self {
        Self { env }
    }

    fn userns_configured(&self) -> bool {
        self.env
            .var(USERNS_CONFIGURED_ENV)
            .is_some_and(|value| !value.is_empty())
    }
}

impl<E: Environment> PrivilegeDetector for HostPrivileges<E> {
    fn is_rootless(&self) -> bool {
        let rootless = !effective_uid_is_root() || self.userns_configured();
        tracing::trace!(rootless, "detected privilege mode");
        rootless
    }
}

#[cfg(unix)]
fn effective_uid_is_root() -> bool {
    nix::unistd::geteuid().is_root()
}

#[cfg(not(unix))]
fn effective_uid_is_root() -> bool {
    true
}
