//! Compile flag CLI tools.
//!
//! This crate provides command-line tools on top of `ccflags-loader`:
//!
//! - `ccflags`: Print the defines and include directories for source files
//! - `ccflags-locate`: Print where the compilation database was found
//!
//! # Example Usage
//!
//! ```bash
//! ccflags --root ~/src/proj src/main.c
//! ccflags --format json src/main.c src/util.c
//! ccflags-locate --root ~/src/proj
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cmd;
