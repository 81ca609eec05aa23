//! Installer for the nodecg-io framework.
//!
//! Installs nodecg-io into the NodeCG installation that contains the working
//! directory, registers its bundle directories with the host, and records
//! what was installed so repeated runs are no-ops. The crate is split into:
//!
//! - **[`core`]**: Pure decisions (descriptor equality, install planning,
//!   bundle list edits). No I/O.
//! - **[`io`]**: Side-effecting operations (locating the host, stores,
//!   process execution) plus the prompt and strategy seams.
//!
//! Orchestration modules ([`install`], [`uninstall`]) combine the two to
//! implement CLI commands.

pub mod constants;
pub mod core;
pub mod error;
pub mod exit_codes;
pub mod install;
pub mod io;
pub mod logging;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod uninstall;
