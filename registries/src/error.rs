//! Error types for registry queries

use crate::reference::ReferenceError;

/// Boxed cause from a configuration parser.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for registry queries
pub type RegistriesResult<T> = Result<T, RegistriesError>;

/// Error types for registry queries
#[derive(Debug, thiserror::Error)]
pub enum RegistriesError {
    /// The registries configuration could not be read or parsed
    #[error("unable to parse the registries.conf file")]
    ConfigParse(#[source] BoxError),

    /// The image is not a valid reference
    #[error("invalid image reference: {0}")]
    InvalidReference(#[from] ReferenceError),

    /// The image parsed, but has no repository name to take a domain from
    #[error("image reference has no repository name: {0}")]
    UnnamedReference(String),
}

impl RegistriesError {
    /// Wrap a configuration parser failure.
    pub fn config_parse<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        RegistriesError::ConfigParse(Box::new(error))
    }
}
