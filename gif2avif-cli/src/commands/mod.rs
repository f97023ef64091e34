//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Converts GIF files to AVIF with configurable encoder settings.
pub mod convert;

/// Reports which external tools are available.
pub mod check;
