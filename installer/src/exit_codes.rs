//! Stable exit codes for the `nodecg-io` binary.

/// Command succeeded (including "already installed" and "nothing to uninstall").
pub const OK: i32 = 0;
/// Any failure other than a missing host installation.
pub const FAILED: i32 = 1;
/// No NodeCG installation at or above the working directory.
pub const NOT_FOUND: i32 = 2;
