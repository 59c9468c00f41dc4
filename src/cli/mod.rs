//! CLI runtime
//!
//! This module owns the process-facing glue: the application type built
//! around one extracted signature, the single-binding registry, and the
//! runner that maps outcomes onto printing and exit codes.

pub mod app;

// Re-export main types
pub use app::*;
