//! # Container registries configuration
//!
//! Locates the `registries.conf` file which applies to the current process
//! and answers queries over it:
//!
//! - the search registries used for unqualified image names,
//! - the registries which may be reached insecurely,
//! - the registry domain of an image reference.
//!
//! The configuration path is resolved on every call. `REGISTRIES_CONFIG_PATH`
//! wins when set; otherwise rootless processes use
//! `$HOME/.config/containers/registries.conf` when it exists, and everyone
//! else gets the parser's built-in default.
//!
//! ## Example
//!
//! ```no_run
//! # fn example() -> Result<(), registries::RegistriesError> {
//! for registry in registries::get_registries()? {
//!     println!("searching {registry}");
//! }
//!
//! assert_eq!(registries::get_registry("quay.io/podman/stable:latest")?, "quay.io");
//! # Ok(())
//! # }
//! ```

mod context;
mod env;
mod error;
mod path;
mod reference;
mod registries;
mod rootless;
mod sysregistries;

pub use context::SystemContext;
pub use env::{Environment, ProcessEnvironment, StaticEnvironment};
pub use error::{BoxError, RegistriesError, RegistriesResult};
pub use path::{
    ConfigPathResolver, REGISTRIES_CONFIG_PATH_ENV, USER_REGISTRIES_FILE, user_registries_file,
};
pub use reference::{Digest, NAME_TOTAL_LENGTH_MAX, Named, Reference, ReferenceError};
pub use registries::{Registries, get_registry};
pub use rootless::{HostPrivileges, PrivilegeDetector, USERNS_CONFIGURED_ENV};
pub use sysregistries::{
    ConfigParser, SYSTEM_REGISTRIES_CONF_PATH, SysRegistriesError, SysRegistriesErrorKind,
    SystemRegistries,
};

/// Path to pass as the registries configuration override for this process.
///
/// An empty string means no override.
pub fn system_registries_conf_path() -> String {
    ConfigPathResolver::system().resolve()
}

/// Search registries from the configuration which applies to this process.
pub fn get_registries() -> RegistriesResult<Vec<String>> {
    Registries::system().search_registries()
}

/// Insecure registries from the configuration which applies to this process.
pub fn get_insecure_registries() -> RegistriesResult<Vec<String>> {
    Registries::system().insecure_registries()
}
