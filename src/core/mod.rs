//! Core business logic module
//!
//! Recipes, detection and naming are pure; the orchestrator performs its
//! side effects only through the [`crate::infra`] capabilities it is given.
//!
//! # Submodules
//!
//! - [`source`] - Source references and local names
//! - [`build_system`] - Marker-file build system detection
//! - [`recipe`] - Build/install steps per build system
//! - [`orchestrator`] - Stage, clone, detect and build targets
//! - [`config`] - Configuration file and settings resolution
//! - [`doctor`] - External tool availability checks

pub mod build_system;
pub mod config;
pub mod doctor;
pub mod orchestrator;
pub mod recipe;
pub mod source;
