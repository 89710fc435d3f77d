//! Recipe providers and the capabilities they may expose.
//!
//! Every provider can list and generate. Sourcing fresh data, caching a
//! mapping and refreshing a local mirror are optional capabilities queried
//! at runtime through `as_source`, `as_cache` and `as_mirror`.
use crate::error::{Error, Result};
use indexmap::IndexMap;

pub mod fs;
pub mod git;
pub mod http;

pub use fs::FsProvider;
pub use git::GitProvider;
pub use http::{Fetcher, HttpProvider, ReqwestFetcher};

/// Option name to recipe body, as exchanged during an update.
pub type Mapping = IndexMap<String, String>;

/// Trait for backends that can list and generate recipes.
pub trait Provider {
    /// Short label used in logs and aggregate errors.
    fn name(&self) -> &str;

    /// Returns every option this provider can generate.
    ///
    /// # Errors
    /// * `Error::RetrievalError` if the backing store is unreadable or unreachable
    fn list(&self) -> Result<Vec<String>>;

    /// Concatenates the recipes for `options` in request order.
    ///
    /// # Errors
    /// * `Error::ValidationError` if `options` is empty or names an unknown option
    /// * `Error::RetrievalError` if a recipe cannot be read
    fn generate(&self, options: &[String]) -> Result<String>;

    fn as_source(&self) -> Option<&dyn Source> {
        None
    }

    fn as_cache(&self) -> Option<&dyn Cache> {
        None
    }

    fn as_mirror(&self) -> Option<&dyn Mirror> {
        None
    }
}

/// A provider that can produce its complete, fresh option mapping.
pub trait Source {
    /// All-or-nothing: any failed option fails the whole call.
    fn source(&self) -> Result<Mapping>;
}

/// A provider that can durably store a mapping.
pub trait Cache {
    /// Writes every entry, overwriting existing ones.
    fn cache(&self, mapping: &Mapping) -> Result<()>;
}

/// A provider backed by a local copy that can refresh itself from upstream.
pub trait Mirror {
    fn refresh(&self) -> Result<()>;
}

/// Checks that `options` is non-empty and fully contained in `valid`.
///
/// # Errors
/// * `Error::ValidationError` naming the first offending option
pub fn validate_options(valid: &[String], options: &[String]) -> Result<()> {
    if options.is_empty() {
        return Err(no_options_error());
    }

    match options.iter().find(|option| !valid.contains(option)) {
        Some(invalid) => Err(Error::ValidationError(format!("invalid option \"{invalid}\""))),
        None => Ok(()),
    }
}

pub(crate) fn no_options_error() -> Error {
    Error::ValidationError("must give at least one option".to_string())
}
