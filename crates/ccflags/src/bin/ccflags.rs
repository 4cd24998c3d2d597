//! ccflags - Print compile flags for C/C++ source files.
//!
//! Primary binary for querying a project's compilation database.

fn main() -> std::process::ExitCode {
    ccflags::cmd::flags::main()
}
