//! Command implementations for CLI tools.
//!
//! Each module contains the full implementation for a command,
//! which can be invoked by thin wrapper binaries.

pub mod completions;
pub mod flags;
pub mod locate;

use anyhow::{Context, Result};
use ccflags_loader::{
    default_candidates, Options, DEFAULT_BUILD_DIR, DEFAULT_DATABASE_NAME, DEFAULT_SEARCH_TIMEOUT,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[allow(clippy::cast_possible_truncation)]
const DEFAULT_TIMEOUT_MS: u64 = DEFAULT_SEARCH_TIMEOUT.as_millis() as u64;

/// Where to look for the compilation database.
#[derive(clap::Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Project root (defaults to the current directory)
    #[arg(long, short = 'r', value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Compilation database filename
    #[arg(long, short = 'd', value_name = "NAME", default_value = DEFAULT_DATABASE_NAME)]
    pub database: String,

    /// Directory to search for the database (repeatable, replaces the defaults)
    #[arg(long = "search-dir", short = 's', value_name = "DIR")]
    pub search_dirs: Vec<PathBuf>,

    /// Build subdirectory of the root that is searched by default
    #[arg(long, value_name = "DIR", default_value = DEFAULT_BUILD_DIR)]
    pub build_dir: String,

    /// Give up searching after this many milliseconds
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout_ms: u64,
}

impl DatabaseArgs {
    /// The project root, falling back to the current directory.
    pub fn root(&self) -> Result<PathBuf> {
        match &self.root {
            Some(root) => Ok(root.clone()),
            None => std::env::current_dir().context("failed to read the current directory"),
        }
    }

    /// Loader options built from the flags.
    pub fn options(&self) -> Options {
        Options::new()
            .with_database_name(self.database.clone())
            .with_build_dir(self.build_dir.clone())
            .with_search_timeout(Duration::from_millis(self.timeout_ms))
    }

    /// Directories to search for a project rooted at `root`.
    pub fn candidates(&self, root: &std::path::Path) -> Vec<PathBuf> {
        if self.search_dirs.is_empty() {
            default_candidates(root, &self.build_dir)
        } else {
            self.search_dirs.clone()
        }
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` is honored unless `verbose` forces debug output.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
