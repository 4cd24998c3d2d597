//! Compile command record.

use std::path::{Path, PathBuf};

/// A single recorded compiler invocation.
///
/// Mirrors one object of a `compile_commands.json` file once its
/// `command`/`arguments` fields have been reduced to a token list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileCommand {
    /// Working directory the compiler was run from.
    pub directory: PathBuf,
    /// Source file as recorded, possibly relative to `directory`.
    pub filename: String,
    /// Raw argument tokens, compiler name first.
    pub arguments: Vec<String>,
}

impl CompileCommand {
    /// Create a new compile command.
    pub fn new<I, S>(
        directory: impl Into<PathBuf>,
        filename: impl Into<String>,
        arguments: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directory: directory.into(),
            filename: filename.into(),
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// The source file joined onto the working directory.
    ///
    /// Absolute filenames are returned as-is.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        let file = Path::new(&self.filename);
        if file.is_absolute() {
            file.to_path_buf()
        } else {
            self.directory.join(file)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_relative() {
        let cmd = CompileCommand::new("/proj/build", "../src/a.c", ["cc"]);
        assert_eq!(cmd.file_path(), PathBuf::from("/proj/build/../src/a.c"));
    }

    #[test]
    fn test_file_path_absolute() {
        let cmd = CompileCommand::new("/proj/build", "/other/a.c", ["cc"]);
        assert_eq!(cmd.file_path(), PathBuf::from("/other/a.c"));
    }
}
