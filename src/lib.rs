//! git-ignore generates `.gitignore` contents by combining named recipes.
//! Recipes come from a local mirror of a template repository, a filesystem
//! cache, or a remote template service, tried in a configurable order.

/// Command-line interface module for git-ignore
pub mod cli;

/// Orchestration of list, generate and update across providers
pub mod client;

/// Configuration file loading and client assembly
pub mod config;

/// Common constants
pub mod constants;

/// Error types and handling for git-ignore
pub mod error;

/// Recipe providers:
/// - git mirror of the upstream template repository
/// - filesystem cache
/// - remote template service
pub mod provider;
