//! Forged - build and install projects straight from their repositories
//!
//! Given repository references, forged shallow-clones each one into a
//! staging root, detects its build system from marker files and runs the
//! matching build and install commands, stopping at the first failed step.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`cli`] - Command-line interface parsing and output formatting
//! - [`core`] - Detection, recipes and build orchestration
//! - [`infra`] - Infrastructure layer (filesystem, locks, processes, git)
//! - [`error`] - Error types and handling

pub mod cli;
pub mod core;
pub mod error;
pub mod infra;

#[cfg(test)]
pub mod test_utils;
