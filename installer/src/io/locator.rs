//! Find the NodeCG installation that contains the working directory.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;
use tracing::{debug, instrument, trace};

use crate::constants::{HOST_APP_NAME, HOST_MANIFEST_FILE};
use crate::error::{InstallError, Result};

/// The only manifest field the locator cares about.
#[derive(Debug, Deserialize)]
struct HostManifest {
    name: Option<String>,
}

/// The directory the upward search starts from when run from the CLI.
pub fn working_dir() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|source| InstallError::filesystem("read current directory", source))
}

/// Return the nearest directory at or above `start` that holds a NodeCG install.
///
/// Directories whose manifest is missing, unreadable or malformed simply don't
/// match. Never touches the filesystem beyond reading manifests.
#[instrument(skip_all, fields(start = %start.display()))]
pub fn find_installation_root_from(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        if is_host_installation(dir) {
            debug!(root = %dir.display(), "found host installation");
            return Some(dir.to_path_buf());
        }
        match dir.parent() {
            Some(parent) => dir = parent,
            None => {
                debug!("reached filesystem root without a host installation");
                return None;
            }
        }
    }
}

/// Same as [`find_installation_root_from`], but a miss is a [`InstallError::NotFound`].
pub fn require_installation_root(start: &Path) -> Result<PathBuf> {
    find_installation_root_from(start).ok_or_else(|| InstallError::NotFound {
        start: start.to_path_buf(),
    })
}

/// True iff `dir` has a manifest whose `name` is exactly the host app name.
pub fn is_host_installation(dir: &Path) -> bool {
    match read_manifest_name(dir) {
        Ok(name) => name.as_deref() == Some(HOST_APP_NAME),
        Err(err) => {
            trace!(dir = %dir.display(), err = %format!("{err:#}"), "not a host installation");
            false
        }
    }
}

fn read_manifest_name(dir: &Path) -> anyhow::Result<Option<String>> {
    let path = dir.join(HOST_MANIFEST_FILE);
    let contents = fs::read_to_string(&path).with_context(|| format!("read {}", path.display()))?;
    let manifest: HostManifest =
        serde_json::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    Ok(manifest.name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_manifest(dir: &Path, contents: &str) {
        fs::create_dir_all(dir).expect("create dir");
        fs::write(dir.join(HOST_MANIFEST_FILE), contents).expect("write manifest");
    }

    #[test]
    fn finds_nearest_matching_ancestor() {
        let temp = tempfile::tempdir().expect("tempdir");
        let a = temp.path().join("a");
        let cwd = a.join("b").join("c");
        fs::create_dir_all(&cwd).expect("create nested dirs");
        write_manifest(&a, r#"{ "name": "nodecg", "version": "2.1.0" }"#);

        assert_eq!(find_installation_root_from(&cwd), Some(a.clone()));
        assert_eq!(find_installation_root_from(&a), Some(a));
    }

    #[test]
    fn prefers_deepest_match() {
        let temp = tempfile::tempdir().expect("tempdir");
        let outer = temp.path().join("outer");
        let inner = outer.join("inner");
        write_manifest(&outer, r#"{ "name": "nodecg" }"#);
        write_manifest(&inner, r#"{ "name": "nodecg" }"#);

        assert_eq!(find_installation_root_from(&inner.join("x")), Some(inner));
    }

    #[test]
    fn skips_other_packages_and_broken_manifests() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        let other = root.join("other");
        let broken = other.join("broken");
        let cwd = broken.join("cwd");
        fs::create_dir_all(&cwd).expect("create nested dirs");
        write_manifest(&root, r#"{ "name": "nodecg" }"#);
        write_manifest(&other, r#"{ "name": "NodeCG" }"#);
        write_manifest(&broken, "{ not json");
        write_manifest(&cwd, r#"{ "version": "1.0.0" }"#);

        assert_eq!(find_installation_root_from(&cwd), Some(root));
    }

    #[test]
    fn manifest_that_cannot_be_read_is_skipped() {
        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        let cwd = root.join("cwd");
        write_manifest(&root, r#"{ "name": "nodecg" }"#);
        // A directory where the manifest should be: reading it fails.
        fs::create_dir_all(cwd.join(HOST_MANIFEST_FILE)).expect("create manifest dir");

        assert!(!is_host_installation(&cwd));
        assert_eq!(find_installation_root_from(&cwd), Some(root));
    }

    #[cfg(unix)]
    #[test]
    fn manifest_without_read_permission_is_skipped() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempfile::tempdir().expect("tempdir");
        let root = temp.path().join("root");
        let cwd = root.join("cwd");
        write_manifest(&root, r#"{ "name": "nodecg" }"#);
        write_manifest(&cwd, r#"{ "name": "nodecg" }"#);
        let locked = cwd.join(HOST_MANIFEST_FILE);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).expect("chmod 000");

        if fs::read(&locked).is_ok() {
            // Permission bits are not enforced for this user (e.g. root).
            return;
        }
        assert_eq!(find_installation_root_from(&cwd), Some(root));
    }

    #[test]
    fn working_dir_matches_process_cwd() {
        assert_eq!(
            working_dir().expect("working dir"),
            std::env::current_dir().expect("cwd")
        );
    }

    #[test]
    fn returns_none_without_any_manifest() {
        let temp = tempfile::tempdir().expect("tempdir");
        let cwd = temp.path().join("a").join("b").join("c");
        fs::create_dir_all(&cwd).expect("create nested dirs");

        assert_eq!(find_installation_root_from(&cwd), None);
        let err = require_installation_root(&cwd).unwrap_err();
        assert!(err.is_not_found());
    }
}
