//! Property-based tests for path manipulation functions.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{compile_glob, glob_match, is_within, normalize, resolve};
    use proptest::prelude::*;
    use std::path::Path;

    // ============================================================================
    // normalize property tests
    // ============================================================================

    proptest! {
        /// Property: normalized paths are absolute and contain no dot segments
        #[test]
        fn normalize_is_absolute_and_clean(input in "[a-z./]{1,30}") {
            if let Ok(result) = normalize(&input) {
                prop_assert!(result.is_absolute());
                let s = result.to_str().unwrap();
                prop_assert!(!s.split('/').any(|seg| seg == "." || seg == ".."));
            }
        }

        /// Property: normalize is idempotent
        #[test]
        fn normalize_is_idempotent(input in "[a-z./]{1,30}") {
            if let Ok(once) = normalize(&input) {
                let twice = normalize(&once).unwrap();
                prop_assert_eq!(once, twice);
            }
        }

        /// Property: relative and `/`-prefixed spellings normalize identically
        #[test]
        fn normalize_anchors_relative_paths(segments in prop::collection::vec("[a-z]{1,8}", 1..5)) {
            let relative = segments.join("/");
            let absolute = format!("/{}", relative);
            prop_assert_eq!(normalize(&relative).unwrap(), normalize(&absolute).unwrap());
        }

        /// Property: resolving a plain relative path stays within the base
        #[test]
        fn resolve_plain_path_stays_within_base(
            base in prop::collection::vec("[a-z]{1,8}", 0..4),
            target in prop::collection::vec("[a-z]{1,8}", 1..4),
        ) {
            let base = format!("/{}", base.join("/"));
            let resolved = resolve(&base, target.join("/")).unwrap();
            prop_assert!(is_within(&resolved, Path::new(&base)));
        }
    }

    // ============================================================================
    // glob_match property tests
    // ============================================================================

    proptest! {
        /// Property: a literal path always matches itself
        #[test]
        fn glob_literal_matches_itself(segments in prop::collection::vec("[a-z]{1,8}", 1..5)) {
            let path = format!("/{}", segments.join("/"));
            let pattern = compile_glob(&path).unwrap();
            prop_assert!(glob_match(&pattern, Path::new(&path)));
        }

        /// Property: `*.yaml` under a directory never matches a deeper file
        #[test]
        fn glob_star_does_not_cross_separator(
            dir in "[a-z]{1,8}",
            sub in "[a-z]{1,8}",
            name in "[a-z]{1,8}",
        ) {
            let pattern = format!("/{}/*.yaml", dir);
            let shallow = format!("/{}/{}.yaml", dir, name);
            let deep = format!("/{}/{}/{}.yaml", dir, sub, name);
            let pattern = compile_glob(&pattern).unwrap();
            prop_assert!(glob_match(&pattern, Path::new(&shallow)));
            prop_assert!(!glob_match(&pattern, Path::new(&deep)));
        }
    }
}
