//! Compilation database backends.
//!
//! A backend turns a directory into an open [`Database`] handle. The handle
//! owns the recorded compile commands for as long as it lives; dropping it
//! releases the underlying resource. Callers never keep a handle beyond the
//! operation that opened it.
//!
//! [`JsonBackend`] reads the `compile_commands.json` format emitted by CMake,
//! Meson, Bear and friends.

use ccflags_core::{clean_path, CompileCommand};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors a backend reports when opening a database.
#[derive(Debug, Error)]
pub enum OpenError {
    /// The database file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The database file.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The database file is not valid JSON of the expected shape.
    #[error("malformed compilation database {path}: {source}")]
    Json {
        /// The database file.
        path: PathBuf,
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// An entry's compiler invocation could not be turned into arguments.
    #[error("invalid entry #{index} in {path}: {message}")]
    Command {
        /// The database file.
        path: PathBuf,
        /// Zero-based index of the entry.
        index: usize,
        /// What was wrong with it.
        message: String,
    },
}

/// Something that can open a directory as a compilation database.
pub trait Backend {
    /// The open handle type.
    type Database: Database;

    /// Open `directory/database_name`.
    fn open(&self, directory: &Path, database_name: &str) -> Result<Self::Database, OpenError>;
}

/// An open compilation database.
pub trait Database {
    /// Every recorded command, in database order.
    fn all_compile_commands(&self) -> Vec<CompileCommand>;

    /// The commands recorded for a single source file, in database order.
    ///
    /// Returns an empty list when the file is unknown.
    fn compile_commands(&self, filename: &str) -> Vec<CompileCommand>;
}

/// One object of a `compile_commands.json` array.
#[derive(Debug, Deserialize)]
struct Entry {
    directory: PathBuf,
    file: String,
    arguments: Option<Vec<String>>,
    command: Option<String>,
}

/// Backend for JSON compilation databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBackend;

impl JsonBackend {
    /// Create a new JSON backend.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Backend for JsonBackend {
    type Database = JsonDatabase;

    fn open(&self, directory: &Path, database_name: &str) -> Result<JsonDatabase, OpenError> {
        let path = directory.join(database_name);
        let content = fs::read(&path).map_err(|source| OpenError::Io {
            path: path.clone(),
            source,
        })?;
        let entries: Vec<Entry> =
            serde_json::from_slice(&content).map_err(|source| OpenError::Json {
                path: path.clone(),
                source,
            })?;

        let mut commands = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let arguments = match (entry.arguments, entry.command) {
                (Some(arguments), _) => arguments,
                (None, Some(command)) => {
                    shell_words::split(&command).map_err(|e| OpenError::Command {
                        path: path.clone(),
                        index,
                        message: format!("cannot split command: {e}"),
                    })?
                }
                (None, None) => {
                    return Err(OpenError::Command {
                        path,
                        index,
                        message: "entry has neither `arguments` nor `command`".to_string(),
                    });
                }
            };
            commands.push(CompileCommand {
                directory: entry.directory,
                filename: entry.file,
                arguments,
            });
        }

        tracing::trace!(
            path = %path.display(),
            commands = commands.len(),
            "opened compilation database"
        );
        Ok(JsonDatabase { path, commands })
    }
}

/// An open JSON compilation database.
#[derive(Debug)]
pub struct JsonDatabase {
    path: PathBuf,
    commands: Vec<CompileCommand>,
}

impl Database for JsonDatabase {
    fn all_compile_commands(&self) -> Vec<CompileCommand> {
        self.commands.clone()
    }

    fn compile_commands(&self, filename: &str) -> Vec<CompileCommand> {
        let wanted = clean_path(Path::new(filename));
        self.commands
            .iter()
            .filter(|cmd| cmd.filename == filename || clean_path(&cmd.file_path()) == wanted)
            .cloned()
            .collect()
    }
}

impl Drop for JsonDatabase {
    fn drop(&mut self) {
        tracing::trace!(path = %self.path.display(), "released compilation database");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_db(content: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("compile_commands.json"), content).unwrap();
        dir
    }

    #[test]
    fn test_open_arguments_form() {
        let dir = write_db(
            r#"[{"directory": "/proj", "file": "a.c", "arguments": ["cc", "-DA", "a.c"]}]"#,
        );
        let db = JsonBackend.open(dir.path(), "compile_commands.json").unwrap();
        let cmds = db.all_compile_commands();
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].arguments, vec!["cc", "-DA", "a.c"]);
        assert_eq!(cmds[0].directory, PathBuf::from("/proj"));
    }

    #[test]
    fn test_open_command_form_is_shell_split() {
        let dir = write_db(
            r#"[{
                "directory": "/proj",
                "file": "a.c",
                "command": "cc -D'MSG=\"hi there\"' -I inc a.c"
            }]"#,
        );
        let db = JsonBackend.open(dir.path(), "compile_commands.json").unwrap();
        assert_eq!(
            db.all_compile_commands()[0].arguments,
            vec!["cc", "-DMSG=\"hi there\"", "-I", "inc", "a.c"]
        );
    }

    #[test]
    fn test_arguments_preferred_over_command() {
        let dir = write_db(
            r#"[{
                "directory": "/p",
                "file": "a.c",
                "command": "cc -DCMD",
                "arguments": ["cc", "-DARGS"]
            }]"#,
        );
        let db = JsonBackend.open(dir.path(), "compile_commands.json").unwrap();
        assert_eq!(db.all_compile_commands()[0].arguments, vec!["cc", "-DARGS"]);
    }

    #[test]
    fn test_open_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = JsonBackend.open(dir.path(), "compile_commands.json").unwrap_err();
        assert!(matches!(err, OpenError::Io { .. }));
    }

    #[test]
    fn test_open_malformed_json() {
        let dir = write_db(r#"{"not": "an array"}"#);
        let err = JsonBackend.open(dir.path(), "compile_commands.json").unwrap_err();
        assert!(matches!(err, OpenError::Json { .. }));
    }

    #[test]
    fn test_open_entry_without_invocation() {
        let dir = write_db(
            r#"[
                {"directory": "/p", "file": "a.c", "arguments": ["cc"]},
                {"directory": "/p", "file": "b.c"}
            ]"#,
        );
        let err = JsonBackend.open(dir.path(), "compile_commands.json").unwrap_err();
        assert!(matches!(err, OpenError::Command { index: 1, .. }));
    }

    #[test]
    fn test_open_unbalanced_quote() {
        let dir = write_db(r#"[{"directory": "/p", "file": "a.c", "command": "cc '-DX"}]"#);
        let err = JsonBackend.open(dir.path(), "compile_commands.json").unwrap_err();
        assert!(matches!(err, OpenError::Command { index: 0, .. }));
    }

    #[test]
    fn test_compile_commands_by_recorded_or_absolute_name() {
        let dir = write_db(
            r#"[
                {"directory": "/proj/build", "file": "../src/a.c", "arguments": ["cc", "-DFIRST"]},
                {"directory": "/proj/build", "file": "/proj/src/b.c", "arguments": ["cc"]},
                {"directory": "/proj/build", "file": "../src/a.c", "arguments": ["cc", "-DSECOND"]}
            ]"#,
        );
        let db = JsonBackend.open(dir.path(), "compile_commands.json").unwrap();

        let by_recorded = db.compile_commands("../src/a.c");
        assert_eq!(by_recorded.len(), 2);
        assert_eq!(by_recorded[0].arguments, vec!["cc", "-DFIRST"]);

        let by_absolute = db.compile_commands("/proj/src/a.c");
        assert_eq!(by_absolute.len(), 2);

        assert_eq!(db.compile_commands("/proj/src/b.c").len(), 1);
        assert!(db.compile_commands("/proj/src/c.c").is_empty());
    }
}
