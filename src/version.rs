//! Harness version information.
//!
//! Taken from Cargo metadata (`CARGO_PKG_VERSION`) at compile time so the CLI and any embedding host report the
//! same value.

/// The sanity version string (for example, `0.1.0`).
pub const SANITY_VERSION: &str = env!("CARGO_PKG_VERSION");
