//! # RTS Test Utilities
//!
//! Shared testing utilities for the setup crates:
//! - Authored map fixtures and settings factories
//! - Determinism test harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;

/// Re-export proptest for convenience.
pub use proptest;
