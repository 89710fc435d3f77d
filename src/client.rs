//! Orchestration across an ordered list of providers.
//!
//! `list` and `generate` fall back through the providers in order and stop at
//! the first success. `update` sources fresh data from every `Source`
//! provider, then refreshes every `Mirror` and writes the merged mapping to
//! every `Cache`.
use crate::error::{Error, Result};
use crate::provider::{no_options_error, validate_options, Mapping, Provider};
use log::debug;

/// Client used by the command line to list, generate and update recipes.
pub struct Client {
    providers: Vec<Box<dyn Provider>>,
    sort: bool,
}

impl Client {
    /// Creates a client trying `providers` in the given order.
    pub fn new(providers: Vec<Box<dyn Provider>>) -> Self {
        Self { providers, sort: true }
    }

    /// Enables or disables case-insensitive sorting of `list` results.
    pub fn with_sorting(mut self, sort: bool) -> Self {
        self.sort = sort;
        self
    }

    /// Returns the options of the first provider that can list them.
    ///
    /// # Errors
    /// * `Error::AggregateError` with every provider's failure if none succeeds
    pub fn list(&self) -> Result<Vec<String>> {
        let mut errors = Vec::new();
        for provider in &self.providers {
            match provider.list() {
                Ok(mut options) => {
                    debug!("Listed {} options from the {}.", options.len(), provider.name());
                    if self.sort {
                        options.sort_by_key(|option| option.to_lowercase());
                    }
                    return Ok(options);
                }
                Err(e) => {
                    debug!("Unable to list options from the {}: {e}", provider.name());
                    errors.push(e);
                }
            }
        }

        Err(Error::AggregateError {
            message: "unable to retrieve option list".to_string(),
            errors,
        })
    }

    /// Generates content for `options` from the first provider able to.
    ///
    /// An option missing from a provider's list is terminal: it is reported
    /// immediately instead of falling back to the next provider.
    ///
    /// # Errors
    /// * `Error::ValidationError` if `options` is empty or contains an unknown option
    /// * `Error::AggregateError` if every provider failed to list or generate
    pub fn generate(&self, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(no_options_error());
        }

        let mut errors = Vec::new();
        for provider in &self.providers {
            let valid_options = match provider.list() {
                Ok(valid_options) => valid_options,
                Err(e) => {
                    debug!("Unable to list options from the {}: {e}", provider.name());
                    errors.push(e);
                    continue;
                }
            };

            validate_options(&valid_options, options)?;

            match provider.generate(options) {
                Ok(content) => {
                    debug!("Generated content from the {}.", provider.name());
                    return Ok(content);
                }
                Err(e) => {
                    debug!("Unable to generate from the {}: {e}", provider.name());
                    errors.push(e);
                }
            }
        }

        Err(Error::AggregateError {
            message: "unable to generate gitignore".to_string(),
            errors,
        })
    }

    /// Resynchronizes every mirror and cache.
    ///
    /// Sourcing is fail-fast: nothing is written if any source fails. Cache
    /// writes are best-effort: the update succeeds if at least one cache
    /// provider succeeds. Mirror refreshes are best-effort and only decide the
    /// outcome when no cache was written.
    ///
    /// # Errors
    /// * `Error::PersistenceError` if a source provider fails
    /// * `Error::AggregateError` if every cache write failed, or if no cache
    ///   was written and every mirror refresh failed
    pub fn update(&self) -> Result<()> {
        let mapping = self.collect_sources()?;

        let mut errors = Vec::new();

        let mut mirror_attempts = 0;
        for (provider, mirror) in
            self.providers.iter().filter_map(|p| p.as_mirror().map(|m| (p, m)))
        {
            mirror_attempts += 1;
            if let Err(e) = mirror.refresh() {
                debug!("Unable to refresh the {}: {e}", provider.name());
                errors.push(e);
            }
        }
        let mirror_failures = errors.len();

        let mut cache_attempts = 0;
        if let Some(mapping) = mapping {
            for (provider, cache) in
                self.providers.iter().filter_map(|p| p.as_cache().map(|c| (p, c)))
            {
                cache_attempts += 1;
                if let Err(e) = cache.cache(&mapping) {
                    debug!("Unable to cache data in the {}: {e}", provider.name());
                    errors.push(e);
                }
            }
        }
        let cache_failures = errors.len() - mirror_failures;

        let failed = if cache_attempts > 0 {
            cache_failures == cache_attempts
        } else {
            mirror_attempts > 0 && mirror_failures == mirror_attempts
        };
        if failed {
            return Err(Error::AggregateError {
                message: "unable to update any provider".to_string(),
                errors,
            });
        }
        Ok(())
    }

    /// Merges the mappings of every source provider, later ones overwriting
    /// earlier ones. `None` when no provider is a source.
    fn collect_sources(&self) -> Result<Option<Mapping>> {
        let mut merged: Option<Mapping> = None;
        for provider in &self.providers {
            let Some(source) = provider.as_source() else {
                continue;
            };

            let mapping = source.source().map_err(|e| {
                Error::PersistenceError(format!(
                    "unable to source data from the {}: {e}",
                    provider.name()
                ))
            })?;
            debug!("Sourced {} recipes from the {}.", mapping.len(), provider.name());
            merged.get_or_insert_with(Mapping::new).extend(mapping);
        }

        Ok(merged)
    }
}
