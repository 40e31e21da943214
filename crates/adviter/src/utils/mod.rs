//! Utility modules providing cross-cutting functionality.
//!
//! This module contains helper abstractions that support the main library features,
//! including conditional parallel processing support for multi-threaded and single-threaded
//! builds.

pub mod parallel;
