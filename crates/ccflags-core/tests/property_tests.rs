//! Property-based tests for flag normalization.
//!
//! Run with: cargo test -p ccflags-core --test `property_tests`

use ccflags_core::{normalize, CompileCommand};
use proptest::prelude::*;
use std::path::Path;

// ============================================================================
// Arbitrary generators
// ============================================================================

fn arb_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("-D".to_string()),
        Just("-I".to_string()),
        Just("-c".to_string()),
        Just("-O2".to_string()),
        Just("-o".to_string()),
        "-D[A-Z]{1,4}(=[0-9]{1,2})?",
        "-I[a-z./]{1,10}",
        "[a-z]{1,6}(\\.c)?",
    ]
}

fn arb_command() -> impl Strategy<Value = CompileCommand> {
    prop::collection::vec(arb_token(), 0..20)
        .prop_map(|args| CompileCommand::new("/work/build", "main.c", args))
}

/// Walk normalized output with the same grammar the normalizer accepts.
///
/// Returns false when a token appears that the normalizer could never emit.
fn well_formed(flags: &[String]) -> bool {
    let mut i = 0;
    while i < flags.len() {
        match flags[i].as_str() {
            "-D" => {
                if i + 1 >= flags.len() {
                    return false;
                }
                i += 2;
            }
            "-I" => match flags.get(i + 1) {
                Some(dir) if Path::new(dir).is_absolute() => i += 2,
                _ => return false,
            },
            f if f.starts_with("-D") => i += 1,
            _ => return false,
        }
    }
    true
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn output_is_only_defines_and_absolute_includes(cmd in arb_command()) {
        let flags = normalize(&cmd);
        prop_assert!(well_formed(&flags), "malformed output: {:?}", flags);
    }

    #[test]
    fn normalization_is_idempotent(cmd in arb_command()) {
        let once = normalize(&cmd);
        let again = normalize(&CompileCommand::new(&cmd.directory, &cmd.filename, once.clone()));
        prop_assert_eq!(once, again);
    }

    #[test]
    fn output_never_longer_than_twice_input(cmd in arb_command()) {
        prop_assert!(normalize(&cmd).len() <= cmd.arguments.len() * 2);
    }

    #[test]
    fn commands_without_d_or_i_yield_nothing(words in prop::collection::vec("[a-z]{1,6}", 0..10)) {
        let cmd = CompileCommand::new("/work", "a.c", words);
        prop_assert!(normalize(&cmd).is_empty());
    }
}
