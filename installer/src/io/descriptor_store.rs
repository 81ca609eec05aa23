//! Persisted install descriptor (`nodecg-io/install.json`).
//!
//! Writes go to a sibling temp file that is renamed over the target, so a
//! crash mid-write leaves either the old descriptor or the new one, never a
//! truncated file. No fsync is issued: after a power loss the rename itself
//! may be lost, in which case the previous descriptor (or none) is read back
//! and the next run simply reinstalls.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use crate::constants::INSTALL_DESCRIPTOR_FILE;
use crate::core::descriptor::InstallDescriptor;
use crate::error::{InstallError, Result};
use crate::io::files::write_atomic;

/// Location of the descriptor inside a framework directory.
pub fn descriptor_path(framework_dir: &Path) -> PathBuf {
    framework_dir.join(INSTALL_DESCRIPTOR_FILE)
}

/// Read the current descriptor. `None` if nothing has been installed.
#[instrument(skip_all, fields(framework_dir = %framework_dir.display()))]
pub fn read_descriptor(framework_dir: &Path) -> Result<Option<InstallDescriptor>> {
    let path = descriptor_path(framework_dir);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            debug!("no install descriptor");
            return Ok(None);
        }
        Err(source) => {
            return Err(InstallError::filesystem(
                format!("read install descriptor {}", path.display()),
                source,
            ));
        }
    };
    let descriptor: InstallDescriptor = serde_json::from_str(&contents)
        .map_err(|err| InstallError::parse(&path, err.to_string()))?;
    debug!(version = %descriptor.version, dev = descriptor.dev, "install descriptor loaded");
    Ok(Some(descriptor))
}

/// Replace the persisted descriptor with `descriptor`.
#[instrument(skip_all, fields(framework_dir = %framework_dir.display()))]
pub fn write_descriptor(framework_dir: &Path, descriptor: &InstallDescriptor) -> Result<()> {
    debug!(version = %descriptor.version, dev = descriptor.dev, "writing install descriptor");
    let mut buf = serde_json::to_string_pretty(descriptor)
        .map_err(|err| InstallError::filesystem("serialize install descriptor", err.into()))?;
    buf.push('\n');
    write_atomic(&descriptor_path(framework_dir), &buf)
}
