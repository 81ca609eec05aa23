//! Orchestration for `nodecg-io uninstall`.

use std::path::Path;

use tracing::{info, instrument};

use crate::constants::{framework_dir, samples_dir};
use crate::error::Result;
use crate::io::files::remove_dir_if_exists;
use crate::io::host_config::set_bundle_dir_registered;
use crate::io::locator::require_installation_root;

/// Outcome of `nodecg-io uninstall`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UninstallOutcome {
    NothingInstalled,
    Removed,
}

/// Remove nodecg-io from the host found at or above `cwd`.
///
/// Bundle directories are unregistered before the files are deleted, so the
/// host never points at a directory that no longer exists.
#[instrument(skip_all, fields(cwd = %cwd.display()))]
pub fn run_uninstall(cwd: &Path) -> Result<UninstallOutcome> {
    let root = require_installation_root(cwd)?;
    println!("Detected nodecg installation at {}.", root.display());

    let dir = framework_dir(&root);
    if !dir.exists() {
        println!("Nothing to uninstall: nodecg-io is not installed.");
        return Ok(UninstallOutcome::NothingInstalled);
    }

    set_bundle_dir_registered(&root, &dir, false)?;
    set_bundle_dir_registered(&root, &samples_dir(&dir), false)?;

    println!("Deleting nodecg-io installation at {}.", dir.display());
    remove_dir_if_exists(&dir)?;
    info!(dir = %dir.display(), "uninstalled");
    println!("Successfully uninstalled nodecg-io.");
    Ok(UninstallOutcome::Removed)
}
