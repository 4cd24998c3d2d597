//! ccflags-locate - Print the directory holding a project's compilation database.

fn main() -> std::process::ExitCode {
    ccflags::cmd::locate::main()
}
