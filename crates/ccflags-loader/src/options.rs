//! Lookup options.

use std::time::Duration;

/// Conventional compilation database filename.
pub const DEFAULT_DATABASE_NAME: &str = "compile_commands.json";

/// Conventional out-of-tree build directory, relative to the project root.
pub const DEFAULT_BUILD_DIR: &str = "build";

/// How long the locator waits for its directory checks before giving up.
pub const DEFAULT_SEARCH_TIMEOUT: Duration = Duration::from_secs(5);

/// Options controlling how a compilation database is located.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Filename used when a caller passes an empty name.
    pub database_name: String,

    /// Subdirectory of the project root searched by default.
    pub build_dir: String,

    /// How long to wait for the concurrent directory checks.
    pub search_timeout: Duration,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            build_dir: DEFAULT_BUILD_DIR.to_string(),
            search_timeout: DEFAULT_SEARCH_TIMEOUT,
        }
    }
}

impl Options {
    /// Create options with the defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default database filename.
    #[must_use]
    pub fn with_database_name(mut self, name: impl Into<String>) -> Self {
        self.database_name = name.into();
        self
    }

    /// Set the build subdirectory searched by default.
    #[must_use]
    pub fn with_build_dir(mut self, dir: impl Into<String>) -> Self {
        self.build_dir = dir.into();
        self
    }

    /// Set the search timeout.
    #[must_use]
    pub const fn with_search_timeout(mut self, timeout: Duration) -> Self {
        self.search_timeout = timeout;
        self
    }
}
