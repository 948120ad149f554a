//! Shared test utilities for integration tests
//!
//! Provides the glext.h excerpt fixture and small helpers for
//! inspecting generated include files.

#![allow(dead_code)]

use assert_fs::prelude::*;

/// Trimmed-down glext.h with three version blocks (1.2, 1.3, 1.4)
pub const GLEXT_EXCERPT: &str = include_str!("data/glext_excerpt.h");

/// Rules covering the 1.2 and 1.3 blocks
pub const RULES_1_3: &str = include_str!("data/rules_1_3.txt");

/// Rules covering the 1.2, 1.3 and 1.4 blocks
pub const RULES_1_4: &str = include_str!("data/rules_1_4.txt");

/// Create a temp dir holding `glext.h` and `rules.txt`.
pub fn make_gl_fixture(rules: &str) -> assert_fs::TempDir
{
    // Initialize the temporary project root
    let tmp = assert_fs::TempDir::new().expect("tempdir");

    tmp.child("glext.h")
        .write_str(GLEXT_EXCERPT)
        .expect("write header");

    tmp.child("rules.txt")
        .write_str(rules)
        .expect("write rules");

    tmp
}

/// Count lines starting with `prefix` followed by `name` and a delimiter.
pub fn count_named(
    text: &str,
    prefix: &str,
    name: &str,
) -> usize
{
    text.lines()
        .filter(|l| {
            l.strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(name))
                .is_some_and(|rest| rest.starts_with(',') || rest.starts_with(')'))
        })
        .count()
}
