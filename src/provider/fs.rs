//! Filesystem cache of recipes: one file per option, named after the option.
use crate::error::{Error, Result};
use crate::provider::{no_options_error, Cache, Mapping, Provider};
use log::debug;
use std::fs;
use std::path::PathBuf;

/// Provider reading and writing recipe files in a local directory.
pub struct FsProvider {
    base_dir: PathBuf,
}

impl FsProvider {
    /// Creates a new FsProvider rooted at `base_dir`.
    pub fn new<P: Into<PathBuf>>(base_dir: P) -> Self {
        Self { base_dir: base_dir.into() }
    }
}

impl Provider for FsProvider {
    fn name(&self) -> &str {
        "filesystem cache"
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = fs::read_dir(&self.base_dir).map_err(|e| {
            Error::RetrievalError(format!(
                "unable to get list from '{}': {e}",
                self.base_dir.display()
            ))
        })?;

        entries
            .map(|entry| {
                entry
                    .map(|entry| entry.file_name().to_string_lossy().into_owned())
                    .map_err(|e| {
                        Error::RetrievalError(format!(
                            "unable to read entry in '{}': {e}",
                            self.base_dir.display()
                        ))
                    })
            })
            .collect()
    }

    /// Reads each recipe verbatim. A missing file fails the whole call.
    fn generate(&self, options: &[String]) -> Result<String> {
        if options.is_empty() {
            return Err(no_options_error());
        }

        let mut content = String::new();
        for option in options {
            let path = self.base_dir.join(option);
            let recipe = fs::read_to_string(&path).map_err(|e| {
                Error::RetrievalError(format!(
                    "unable to read recipe '{}': {e}",
                    path.display()
                ))
            })?;
            content.push_str(&recipe);
            content.push('\n');
        }

        Ok(content)
    }

    fn as_cache(&self) -> Option<&dyn Cache> {
        Some(self)
    }
}

impl Cache for FsProvider {
    fn cache(&self, mapping: &Mapping) -> Result<()> {
        fs::create_dir_all(&self.base_dir).map_err(|e| {
            Error::PersistenceError(format!(
                "unable to create cache directory '{}': {e}",
                self.base_dir.display()
            ))
        })?;

        for (option, content) in mapping {
            let path = self.base_dir.join(option);
            fs::write(&path, content).map_err(|e| {
                Error::PersistenceError(format!(
                    "unable to write cache file '{}': {e}",
                    path.display()
                ))
            })?;
        }

        debug!("Cached {} recipes in '{}'.", mapping.len(), self.base_dir.display());
        Ok(())
    }
}
