//! Common constants used throughout git-ignore.

/// Supported configuration file names
pub const CONFIG_FILES: [&str; 3] = ["config.json", "config.yml", "config.yaml"];

/// Directory name used under the user's config and data directories
pub const APP_DIR: &str = "git-ignore";

/// Upstream repository mirrored by the git provider
pub const DEFAULT_REPO_URL: &str = "https://github.com/github/gitignore.git";

/// Base URL of the remote template service
pub const DEFAULT_SERVICE_URL: &str = "https://www.toptal.com/developers/gitignore/api";

/// Extension carried by recipe files in the mirrored repository
pub const RECIPE_EXTENSION: &str = "gitignore";

/// Prefix of a recipe's section header
pub const BANNER_MARKER: &str = "###";
