//! Core types for ccflags
//!
//! This crate provides the building blocks shared by the rest of the workspace:
//!
//! - [`CompileCommand`] - One entry of a compilation database
//! - [`normalize`] - Reduce raw compiler arguments to defines and include dirs
//! - [`resolve_include_path`] - Make an include path absolute against a build dir
//! - [`clean_path`] - Lexically fold `.`, `..` and redundant separators
//!
//! # Example
//!
//! ```
//! use ccflags_core::{normalize, CompileCommand};
//!
//! let cmd = CompileCommand::new(
//!     "/proj",
//!     "main.c",
//!     ["clang", "-c", "-DFOO=1", "-Iinclude", "main.c"],
//! );
//!
//! assert_eq!(normalize(&cmd), vec!["-DFOO=1", "-I", "/proj/include"]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod command;
pub mod normalize;

pub use command::CompileCommand;
pub use normalize::{clean_path, normalize, resolve_include_path};
