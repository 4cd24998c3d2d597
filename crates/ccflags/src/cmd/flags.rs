//! Implementation of the `ccflags` command.

use crate::cmd::completions::ShellType;
use crate::cmd::{init_tracing, DatabaseArgs};
use anyhow::{Context, Result};
use ccflags_core::clean_path;
use ccflags_loader::{Backend, CompilationDatabase, LoadError};
use clap::{Parser, ValueEnum};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;

/// Output format for flags.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Shell-quoted flags, one line per file (default)
    #[default]
    Text,
    /// JSON object for tooling integration
    Json,
}

/// JSON output structure.
#[derive(Debug, Default, Serialize)]
pub struct JsonOutput {
    /// Normalized flags keyed by the file name as given
    pub files: BTreeMap<String, Vec<String>>,
    /// Files the database has no command for
    pub missing: Vec<String>,
}

/// Print the defines and include directories for C/C++ source files.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Source files to look up
    #[arg(value_name = "FILE", required_unless_present = "generate_completions")]
    pub files: Vec<String>,

    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Output format (text or json)
    #[arg(long, short = 'f', value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,
}

/// Look up `file` as recorded, then as an absolute path.
///
/// Users pass paths relative to where they stand, while databases usually
/// record them relative to the build directory or as absolute paths.
pub fn lookup<B: Backend>(
    db: &CompilationDatabase<B>,
    file: &str,
) -> Result<Vec<String>, LoadError> {
    match db.flags(file) {
        Err(LoadError::NoCommand { .. }) if Path::new(file).is_relative() => {
            let Ok(cwd) = std::env::current_dir() else {
                return Err(LoadError::NoCommand {
                    filename: file.to_string(),
                });
            };
            let absolute = clean_path(&cwd.join(file));
            db.flags(&absolute.to_string_lossy())
                .map_err(|e| match e {
                    LoadError::NoCommand { .. } => LoadError::NoCommand {
                        filename: file.to_string(),
                    },
                    other => other,
                })
        }
        other => other,
    }
}

fn run(args: &Args) -> Result<ExitCode> {
    let root = args.database.root()?;
    let db = CompilationDatabase::new(&root).with_options(args.database.options());
    let candidates = args.database.candidates(&root);

    let count = db
        .parse(&args.database.database, &candidates)
        .with_context(|| format!("failed to load compile flags for {}", root.display()))?;
    tracing::debug!(count, "parsed compilation database");

    let mut output = JsonOutput::default();
    for file in &args.files {
        match lookup(&db, file) {
            Ok(flags) => {
                output.files.insert(file.clone(), flags);
            }
            Err(LoadError::NoCommand { .. }) => output.missing.push(file.clone()),
            Err(e) => return Err(e).with_context(|| format!("failed to look up {file}")),
        }
    }

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &output)?;
            writeln!(stdout)?;
        }
        OutputFormat::Text => {
            let single = args.files.len() == 1;
            for file in &args.files {
                if let Some(flags) = output.files.get(file) {
                    let line = shell_words::join(flags);
                    if single {
                        writeln!(stdout, "{line}")?;
                    } else {
                        writeln!(stdout, "{file}: {line}")?;
                    }
                }
            }
            for file in &output.missing {
                eprintln!("error: no compile command for {file}");
            }
        }
    }

    Ok(if output.missing.is_empty() {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    })
}

/// Main entry point.
pub fn main() -> ExitCode {
    main_with_name("ccflags")
}

/// Main entry point with custom binary name.
pub fn main_with_name(bin_name: &str) -> ExitCode {
    let args = Args::parse();

    if let Some(shell) = args.generate_completions {
        crate::cmd::completions::generate_completions::<Args>(shell, bin_name);
        return ExitCode::SUCCESS;
    }

    init_tracing(args.verbose);

    match run(&args) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}
