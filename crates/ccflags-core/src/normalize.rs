//! Compiler flag normalization.
//!
//! Reduces the raw argument list of a [`CompileCommand`] to the tokens a
//! parser needs to see the same preprocessor state the build did:
//!
//! - `-D NAME` and `-DNAME=VALUE` are kept verbatim
//! - `-I DIR` and `-IDIR` are rewritten to `-I` followed by an absolute path
//! - everything else is dropped
//!
//! Include paths are resolved against the command's working directory.
//! When the working directory is itself relative and the process current
//! directory cannot be read, the include path is returned unresolved rather
//! than failing the whole command.

use crate::CompileCommand;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Normalize the arguments of a compile command.
///
/// The result keeps the original token order. A trailing `-D` or `-I`
/// without a value is dropped.
///
/// # Example
///
/// ```
/// use ccflags_core::{normalize, CompileCommand};
///
/// let cmd = CompileCommand::new(
///     "/proj",
///     "main.c",
///     ["clang", "-c", "-DFOO=1", "-D", "BAR", "-Ifoo/bar", "-I", "baz", "main.c"],
/// );
///
/// assert_eq!(
///     normalize(&cmd),
///     vec!["-DFOO=1", "-D", "BAR", "-I", "/proj/foo/bar", "-I", "/proj/baz"],
/// );
/// ```
#[must_use]
pub fn normalize(cmd: &CompileCommand) -> Vec<String> {
    normalize_with(cmd, std::env::current_dir)
}

fn normalize_with<F>(cmd: &CompileCommand, current_dir: F) -> Vec<String>
where
    F: Fn() -> io::Result<PathBuf>,
{
    let args = &cmd.arguments;
    let mut flags = Vec::with_capacity(args.len());

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "-D" => {
                if let Some(value) = args.get(i + 1) {
                    flags.push("-D".to_string());
                    flags.push(value.clone());
                }
                i += 1;
            }
            _ if arg.starts_with("-D") => flags.push(arg.to_string()),
            "-I" => {
                if let Some(dir) = args.get(i + 1) {
                    flags.push("-I".to_string());
                    flags.push(resolve_with(dir, &cmd.directory, &current_dir));
                }
                i += 1;
            }
            _ if arg.starts_with("-I") => {
                flags.push("-I".to_string());
                flags.push(resolve_with(&arg[2..], &cmd.directory, &current_dir));
            }
            _ => {}
        }
        i += 1;
    }

    tracing::trace!(
        file = %cmd.filename,
        raw = args.len(),
        kept = flags.len(),
        "normalized compile command"
    );

    flags
}

/// Resolve an include path against the directory the compiler ran in.
///
/// Both absolute and relative results go through [`clean_path`].
#[must_use]
pub fn resolve_include_path(include: &str, directory: &Path) -> String {
    resolve_with(include, directory, std::env::current_dir)
}

/// `current_dir` is only consulted for a relative `directory`.
fn resolve_with<F>(include: &str, directory: &Path, current_dir: F) -> String
where
    F: FnOnce() -> io::Result<PathBuf>,
{
    let path = Path::new(include);

    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else if directory.is_absolute() {
        directory.join(path)
    } else {
        match current_dir() {
            Ok(cwd) => cwd.join(directory).join(path),
            Err(err) => {
                tracing::trace!(include, error = %err, "keeping unresolved include path");
                return include.to_string();
            }
        }
    };

    clean_path(&joined).to_string_lossy().into_owned()
}

/// Lexically clean a path.
///
/// Drops `.` components, folds `name/..` pairs and collapses repeated
/// separators. `..` directly under the root is discarded; leading `..` of a
/// relative path is kept. The filesystem is never consulted, so symlinks are
/// not followed.
#[must_use]
pub fn clean_path(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            _ => parts.push(component),
        }
    }

    if parts.is_empty() {
        return PathBuf::from(".");
    }
    parts.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmd(args: &[&str]) -> CompileCommand {
        CompileCommand::new("/proj", "main.c", args.iter().copied())
    }

    #[test]
    fn test_mixed_defines_and_includes() {
        let flags = normalize(&cmd(&[
            "clang", "-c", "-DFOO=1", "-D", "BAR", "-Ifoo/bar", "-I", "baz", "main.c",
        ]));
        assert_eq!(
            flags,
            vec!["-DFOO=1", "-D", "BAR", "-I", "/proj/foo/bar", "-I", "/proj/baz"]
        );
    }

    #[test]
    fn test_absolute_include_unchanged() {
        assert_eq!(
            normalize(&cmd(&["-I/usr/include"])),
            vec!["-I", "/usr/include"]
        );
    }

    #[test]
    fn test_other_flags_dropped() {
        let flags = normalize(&cmd(&[
            "gcc", "-O2", "-Wall", "-o", "main.o", "-std=c11", "-isystem", "/x", "main.c",
        ]));
        assert!(flags.is_empty());
    }

    #[test]
    fn test_trailing_flag_without_value_dropped() {
        assert_eq!(normalize(&cmd(&["cc", "-DX", "-D"])), vec!["-DX"]);
        assert!(normalize(&cmd(&["cc", "-I"])).is_empty());
    }

    #[test]
    fn test_consumed_value_not_reexamined() {
        // The value of a two-token `-I` must not be picked up again as a define.
        assert_eq!(
            normalize(&cmd(&["-I", "-Dweird", "-DREAL"])),
            vec!["-I", "/proj/-Dweird", "-DREAL"]
        );
    }

    #[test]
    fn test_define_value_verbatim() {
        assert_eq!(
            normalize(&cmd(&["-D", "MSG=\"a b\""])),
            vec!["-D", "MSG=\"a b\""]
        );
    }

    #[test]
    fn test_include_parent_dirs_cleaned() {
        let cmd = CompileCommand::new(
            "/proj/build",
            "x.c",
            ["-I../include/./sub//", "-I/usr/../opt"],
        );
        assert_eq!(normalize(&cmd), vec!["-I", "/proj/include/sub", "-I", "/opt"]);
    }

    #[test]
    fn test_relative_directory_uses_current_dir() {
        let cwd = std::env::current_dir().unwrap();
        let resolved = resolve_include_path("inc", Path::new("build"));
        assert_eq!(PathBuf::from(resolved), clean_path(&cwd.join("build/inc")));
    }

    fn unreadable_cwd() -> io::Result<PathBuf> {
        Err(io::Error::new(io::ErrorKind::NotFound, "cwd removed"))
    }

    #[test]
    fn test_unreadable_cwd_keeps_raw_include() {
        assert_eq!(resolve_with("inc/../x", Path::new("rel"), unreadable_cwd), "inc/../x");
        // Absolute working directories never need the current directory.
        assert_eq!(resolve_with("inc/../x", Path::new("/abs"), unreadable_cwd), "/abs/x");
    }

    #[test]
    fn test_unreadable_cwd_keeps_other_tokens() {
        let cmd = CompileCommand::new("rel", "a.c", ["cc", "-Iinc", "-DX", "-I", "/usr/include"]);
        assert_eq!(
            normalize_with(&cmd, unreadable_cwd),
            vec!["-I", "inc", "-DX", "-I", "/usr/include"]
        );
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(clean_path(Path::new("/a/b/../c")), PathBuf::from("/a/c"));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(clean_path(Path::new("a/./b/")), PathBuf::from("a/b"));
        assert_eq!(clean_path(Path::new("../a/..")), PathBuf::from(".."));
        assert_eq!(clean_path(Path::new("a/..")), PathBuf::from("."));
        assert_eq!(
            clean_path(Path::new("//usr///include")),
            PathBuf::from("/usr/include")
        );
    }
}
