//! Deterministic, pure logic shared by the installer.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! values and return deterministic outputs suitable for tests.

pub mod bundle_paths;
pub mod descriptor;
pub mod plan;
