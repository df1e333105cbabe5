//! Test utilities for property-based testing
//!
//! This module provides generators and helpers for proptest.

#[cfg(test)]
pub mod generators {
    use proptest::prelude::*;

    /// Generate a repository name without dots, so it never ends in `.git`
    pub fn repo_name() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_][A-Za-z0-9_-]{0,30}"
    }

    /// Generate a reference prefix ending in `/`, or nothing
    pub fn url_prefix() -> impl Strategy<Value = String> {
        prop_oneof![
            Just(String::new()),
            "https://[a-z]{3,10}\\.[a-z]{2,3}/[a-z0-9-]{1,12}/",
            "git@[a-z]{3,10}\\.[a-z]{2,3}:[a-z0-9-]{1,12}/",
            "/srv/git/[a-z]{1,8}/",
        ]
    }

    /// Generate one of the recognised marker file names
    pub fn marker_file() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("meson.build"),
            Just("CMakeLists.txt"),
            Just("Makefile"),
            Just("makefile"),
            Just("PKGBUILD"),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn test_repo_name_generator(name in repo_name()) {
            prop_assert!(!name.is_empty());
            prop_assert!(!name.contains('.'));
        }

        #[test]
        fn test_url_prefix_generator(prefix in url_prefix()) {
            prop_assert!(prefix.is_empty() || prefix.ends_with('/'));
        }
    }
}
