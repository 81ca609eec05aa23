//! Small filesystem helpers shared by the stores.

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{InstallError, Result};

/// Atomically replace `path` with `contents` (temp file + rename).
///
/// Parent directories are created as needed.
pub fn write_atomic(path: &Path, contents: impl AsRef<[u8]>) -> Result<()> {
    let parent = path.parent().ok_or_else(|| {
        InstallError::filesystem(
            format!("write {}", path.display()),
            io::Error::other("path has no parent directory"),
        )
    })?;
    fs::create_dir_all(parent).map_err(|source| {
        InstallError::filesystem(format!("create directory {}", parent.display()), source)
    })?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = parent.join(tmp_name);
    fs::write(&tmp_path, contents).map_err(|source| {
        InstallError::filesystem(format!("write temp file {}", tmp_path.display()), source)
    })?;
    fs::rename(&tmp_path, path)
        .map_err(|source| InstallError::filesystem(format!("replace {}", path.display()), source))
}

/// Recursively delete `dir`. A missing directory is not an error.
pub fn remove_dir_if_exists(dir: &Path) -> Result<bool> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            debug!(dir = %dir.display(), "removed directory");
            Ok(true)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(source) => Err(InstallError::filesystem(
            format!("delete {}", dir.display()),
            source,
        )),
    }
}
