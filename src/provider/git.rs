//! Recipes from a local clone of an upstream template repository.
//! Recipe files live anywhere in the tree and are named `<option>.gitignore`.
use crate::constants::{BANNER_MARKER, RECIPE_EXTENSION};
use crate::error::{Error, Result};
use crate::provider::{validate_options, Mirror, Provider};
use git2::{build::CheckoutBuilder, build::RepoBuilder, Repository};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Provider backed by a git working copy.
pub struct GitProvider {
    repo_dir: PathBuf,
    repo_url: String,
}

impl GitProvider {
    /// Creates a new GitProvider mirroring `repo_url` into `repo_dir`.
    pub fn new<P: Into<PathBuf>, S: Into<String>>(repo_dir: P, repo_url: S) -> Self {
        Self { repo_dir: repo_dir.into(), repo_url: repo_url.into() }
    }

    /// Location of the working copy.
    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    fn ensure_exists(&self) -> Result<()> {
        if !self.repo_dir.exists() {
            return Err(Error::RetrievalError(format!(
                "repository '{}' does not exist, run update first",
                self.repo_dir.display()
            )));
        }
        Ok(())
    }

    /// Walks the working copy in file-name order, skipping git metadata.
    fn recipe_files(&self) -> impl Iterator<Item = Result<DirEntry>> + '_ {
        WalkDir::new(&self.repo_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.file_name() != ".git")
            .filter_map(|entry| match entry {
                Ok(entry) if is_recipe_file(&entry) => Some(Ok(entry)),
                Ok(_) => None,
                Err(e) => Some(Err(Error::RetrievalError(format!(
                    "unable to read gitignore repository: {e}"
                )))),
            })
    }

    /// First recipe file named `<option>.gitignore`.
    fn find_option_file(&self, option: &str) -> Result<PathBuf> {
        let filename = format!("{option}.{RECIPE_EXTENSION}");
        for entry in self.recipe_files() {
            let entry = entry?;
            if entry.file_name().to_str() == Some(filename.as_str()) {
                return Ok(entry.into_path());
            }
        }

        Err(Error::RetrievalError(format!("unable to find file for {option}")))
    }

    fn clone_repository(&self) -> Result<()> {
        debug!("Cloning '{}' to '{}'.", self.repo_url, self.repo_dir.display());

        let mut builder = RepoBuilder::new();
        builder.fetch_options(fetch_options());
        builder.clone(&self.repo_url, &self.repo_dir).map(|_| ()).map_err(|e| {
            Error::RetrievalError(format!("unable to clone repository '{}': {e}", self.repo_url))
        })
    }

    fn pull(&self) -> Result<()> {
        debug!("Pulling latest changes into '{}'.", self.repo_dir.display());

        let repo = Repository::open(&self.repo_dir).map_err(|e| {
            Error::RetrievalError(format!(
                "unable to open repository '{}': {e}",
                self.repo_dir.display()
            ))
        })?;
        fast_forward(&repo).map_err(|e| {
            Error::RetrievalError(format!("unable to update gitignore repository: {e}"))
        })
    }
}

fn is_recipe_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.path().extension().and_then(|ext| ext.to_str()) == Some(RECIPE_EXTENSION)
}

fn fetch_options<'cb>() -> git2::FetchOptions<'cb> {
    let mut callbacks = git2::RemoteCallbacks::new();
    callbacks.credentials(|_url, username_from_url, allowed_types| {
        if allowed_types.contains(git2::CredentialType::SSH_KEY) {
            git2::Cred::ssh_key_from_agent(username_from_url.unwrap_or("git"))
        } else {
            git2::Cred::default()
        }
    });

    let mut fetch_opts = git2::FetchOptions::new();
    fetch_opts.remote_callbacks(callbacks);
    fetch_opts
}

/// Fetches the checked-out branch from `origin` and fast-forwards onto it.
fn fast_forward(repo: &Repository) -> std::result::Result<(), git2::Error> {
    let head = repo.head()?;
    let branch = head
        .shorthand()
        .ok_or_else(|| git2::Error::from_str("HEAD is not a valid branch name"))?
        .to_string();

    let mut remote = repo.find_remote("origin")?;
    remote.fetch(&[branch.as_str()], Some(&mut fetch_options()), None)?;

    let fetch_head = repo.find_reference("FETCH_HEAD")?;
    let fetch_commit = repo.reference_to_annotated_commit(&fetch_head)?;
    let (analysis, _) = repo.merge_analysis(&[&fetch_commit])?;

    if analysis.is_up_to_date() {
        debug!("Repository is already up to date.");
        return Ok(());
    }
    if !analysis.is_fast_forward() {
        return Err(git2::Error::from_str("local history diverged from upstream"));
    }

    let refname = format!("refs/heads/{branch}");
    let mut reference = repo.find_reference(&refname)?;
    reference.set_target(fetch_commit.id(), "git-ignore: fast-forward")?;
    repo.set_head(&refname)?;

    let mut checkout = CheckoutBuilder::new();
    checkout.force();
    repo.checkout_head(Some(&mut checkout))
}

impl Provider for GitProvider {
    fn name(&self) -> &str {
        "git mirror"
    }

    fn list(&self) -> Result<Vec<String>> {
        self.ensure_exists()?;

        self.recipe_files()
            .map(|entry| {
                let entry = entry?;
                Ok(entry
                    .path()
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_default())
            })
            .collect()
    }

    /// Prepends a `### <option> ###` header unless the recipe already starts with one.
    fn generate(&self, options: &[String]) -> Result<String> {
        let valid_options = self.list()?;
        validate_options(&valid_options, options)?;

        let mut content = String::new();
        for option in options {
            let path = self.find_option_file(option)?;
            let recipe = fs::read_to_string(&path).map_err(|e| {
                Error::RetrievalError(format!("unable to read gitignore data for {option}: {e}"))
            })?;

            if !recipe.starts_with(BANNER_MARKER) {
                content.push_str(&format!("{BANNER_MARKER} {option} {BANNER_MARKER}\n"));
            }
            content.push_str(&recipe);
            content.push('\n');
        }

        Ok(content)
    }

    fn as_mirror(&self) -> Option<&dyn Mirror> {
        Some(self)
    }
}

impl Mirror for GitProvider {
    /// Clones when the working copy is absent, pulls otherwise.
    fn refresh(&self) -> Result<()> {
        if self.repo_dir.exists() {
            self.pull()
        } else {
            self.clone_repository()
        }
    }
}
