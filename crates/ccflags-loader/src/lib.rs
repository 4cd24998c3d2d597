//! Compilation database loader with a per-file flag cache.
//!
//! This crate finds a `compile_commands.json` near a project, reads every
//! recorded compile command, normalizes each one down to its defines and
//! include directories, and caches the result by source filename.
//!
//! # Features
//!
//! - Concurrent, time-bounded discovery across candidate directories
//! - Pluggable database [`Backend`], with a JSON backend built in
//! - Eager bulk parse plus lazy single-file lookups
//! - One cache per [`CompilationDatabase`], guarded by a single lock
//!
//! # Example
//!
//! ```ignore
//! use ccflags_loader::CompilationDatabase;
//!
//! let db = CompilationDatabase::new("/home/me/proj");
//! db.parse("", &[])?;
//! let flags = db.flags("/home/me/proj/src/main.c")?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
mod locate;
mod options;

pub use backend::{Backend, Database, JsonBackend, JsonDatabase, OpenError};
pub use locate::{default_candidates, find};
pub use options::{Options, DEFAULT_BUILD_DIR, DEFAULT_DATABASE_NAME, DEFAULT_SEARCH_TIMEOUT};

use ccflags_core::{normalize, CompileCommand};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while locating or querying a compilation database.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No candidate directory contains the database file.
    #[error("couldn't find the {filename} file in {}", display_dirs(.searched))]
    NotFound {
        /// The database filename that was searched for.
        filename: String,
        /// The directories that were searched.
        searched: Vec<PathBuf>,
    },

    /// The backend could not open the located directory.
    #[error("failed to open compilation database in {directory}: {source}")]
    DatabaseOpen {
        /// The directory that was located.
        directory: PathBuf,
        /// The backend's error.
        #[source]
        source: OpenError,
    },

    /// The database has no command for the file.
    #[error("no compile command for {filename}")]
    NoCommand {
        /// The file that was looked up.
        filename: String,
    },

    /// A lookup missed the cache before any database was located.
    #[error("no compilation database located; cannot look up {filename}")]
    NotLocated {
        /// The file that was looked up.
        filename: String,
    },
}

fn display_dirs(dirs: &[PathBuf]) -> String {
    if dirs.is_empty() {
        return "(no directories)".to_string();
    }
    dirs.iter()
        .map(|d| d.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Open the database in `directory` and read all of its commands.
///
/// The backend handle is dropped before this returns, on success and on
/// failure alike.
pub fn load<B: Backend>(
    backend: &B,
    directory: &Path,
    database_name: &str,
) -> Result<Vec<CompileCommand>, LoadError> {
    let database = backend
        .open(directory, database_name)
        .map_err(|source| LoadError::DatabaseOpen {
            directory: directory.to_path_buf(),
            source,
        })?;

    let commands = database.all_compile_commands();
    tracing::debug!(
        directory = %directory.display(),
        count = commands.len(),
        "read compile commands"
    );
    Ok(commands)
}

/// Where the database was found.
#[derive(Debug, Clone)]
struct Located {
    directory: PathBuf,
    name: String,
}

#[derive(Debug, Default)]
struct State {
    located: Option<Located>,
    flags: HashMap<String, Vec<String>>,
}

/// Per-project compile flag lookup.
///
/// Cache entries are never invalidated. Calling [`parse`](Self::parse) again
/// overwrites entries for the files it sees and leaves the rest alone; a
/// fresh instance is the only way to start over.
#[derive(Debug)]
pub struct CompilationDatabase<B: Backend = JsonBackend> {
    project_root: PathBuf,
    backend: B,
    options: Options,
    state: Mutex<State>,
}

impl CompilationDatabase<JsonBackend> {
    /// Create a lookup for the project rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_backend(root, JsonBackend::new())
    }
}

impl<B: Backend> CompilationDatabase<B> {
    /// Create a lookup that reads databases through `backend`.
    pub fn with_backend(root: impl Into<PathBuf>, backend: B) -> Self {
        Self {
            project_root: root.into(),
            backend,
            options: Options::default(),
            state: Mutex::new(State::default()),
        }
    }

    /// Replace the lookup options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// The project root this lookup was created with.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Whether a previous [`parse`](Self::parse) located a database file.
    ///
    /// Stays `true` even if opening that file then failed.
    pub fn is_found(&self) -> bool {
        self.state.lock().located.is_some()
    }

    /// The directory holding the located database, if any.
    pub fn database_dir(&self) -> Option<PathBuf> {
        self.state
            .lock()
            .located
            .as_ref()
            .map(|l| l.directory.clone())
    }

    /// Locate the database, read it and cache flags for every command.
    ///
    /// An empty `database_name` falls back to [`Options::database_name`];
    /// an empty `candidates` list falls back to [`default_candidates`].
    /// Returns the number of commands read.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NotFound`] - No candidate holds the database
    /// - [`LoadError::DatabaseOpen`] - The backend rejected the database
    pub fn parse(&self, database_name: &str, candidates: &[PathBuf]) -> Result<usize, LoadError> {
        let name = if database_name.is_empty() {
            self.options.database_name.as_str()
        } else {
            database_name
        };
        let candidates = if candidates.is_empty() {
            default_candidates(&self.project_root, &self.options.build_dir)
        } else {
            candidates.to_vec()
        };

        let directory = find(name, &candidates, self.options.search_timeout)?;
        self.state.lock().located = Some(Located {
            directory: directory.clone(),
            name: name.to_string(),
        });

        let commands = load(&self.backend, &directory, name)?;

        let mut state = self.state.lock();
        for cmd in &commands {
            state.flags.insert(cmd.filename.clone(), normalize(cmd));
        }
        drop(state);

        tracing::debug!(
            root = %self.project_root.display(),
            directory = %directory.display(),
            commands = commands.len(),
            "cached compile flags"
        );
        Ok(commands.len())
    }

    /// Get the normalized flags for `filename`.
    ///
    /// Served from the cache when possible. Otherwise the located database is
    /// reopened for a single-file query, the first matching command is
    /// normalized, cached and returned.
    ///
    /// # Errors
    ///
    /// - [`LoadError::NotLocated`] - Cache miss and nothing was located yet
    /// - [`LoadError::DatabaseOpen`] - The database could not be reopened
    /// - [`LoadError::NoCommand`] - The database has no entry for the file
    pub fn flags(&self, filename: &str) -> Result<Vec<String>, LoadError> {
        let mut state = self.state.lock();
        if let Some(flags) = state.flags.get(filename) {
            return Ok(flags.clone());
        }

        let located = state.located.clone().ok_or_else(|| LoadError::NotLocated {
            filename: filename.to_string(),
        })?;

        let command = {
            let database = self
                .backend
                .open(&located.directory, &located.name)
                .map_err(|source| LoadError::DatabaseOpen {
                    directory: located.directory.clone(),
                    source,
                })?;
            database.compile_commands(filename).into_iter().next()
        };
        let command = command.ok_or_else(|| LoadError::NoCommand {
            filename: filename.to_string(),
        })?;

        let flags = normalize(&command);
        state.flags.insert(filename.to_string(), flags.clone());
        Ok(flags)
    }
}
