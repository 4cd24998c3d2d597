//! Implementation of the `ccflags-locate` command.

use crate::cmd::completions::ShellType;
use crate::cmd::{init_tracing, DatabaseArgs};
use anyhow::Result;
use clap::Parser;
use std::io::{self, Write};
use std::process::ExitCode;

/// Print the directory that holds a project's compilation database.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(flatten)]
    pub database: DatabaseArgs,

    /// Print the database file path instead of its directory
    #[arg(long)]
    pub file: bool,

    /// Show debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Generate shell completions and exit
    #[arg(long, value_name = "SHELL", hide = true)]
    pub generate_completions: Option<ShellType>,
}

fn run(args: &Args) -> Result<ExitCode> {
    let root = args.database.root()?;
    let options = args.database.options();
    let candidates = args.database.candidates(&root);

    let directory = match ccflags_loader::find(
        &options.database_name,
        &candidates,
        options.search_timeout,
    ) {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(1));
        }
    };

    let mut stdout = io::stdout().lock();
    if args.file {
        writeln!(stdout, "{}", directory.join(&options.database_name).display())?;
    } else {
        writeln!(stdout, "{}", directory.display())?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Main entry point.
pub fn main() -> ExitCode {
    main_with_name("ccflags-locate")
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["ccflags-locate", "--root", "/p", "--file"]).unwrap();
        assert!(args.file);
        assert_eq!(args.database.root().unwrap(), std::path::PathBuf::from("/p"));
        assert_eq!(args.database.candidates(&args.database.root().unwrap()).len(), 3);
    }
}
