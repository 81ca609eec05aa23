//! Fixed names shared by the installer.
//!
//! These identify the host (NodeCG) layout and the files this tool owns inside it.

use std::path::{Path, PathBuf};

/// Manifest file a host installation root must contain.
pub const HOST_MANIFEST_FILE: &str = "package.json";

/// Value of the manifest `name` field that identifies a NodeCG installation.
pub const HOST_APP_NAME: &str = "nodecg";

/// Directory (relative to the installation root) owned exclusively by this tool.
pub const FRAMEWORK_DIR_NAME: &str = "nodecg-io";

/// Install descriptor file inside the framework directory.
pub const INSTALL_DESCRIPTOR_FILE: &str = "install.json";

/// Version string recorded for installs built from local sources.
pub const DEVELOPMENT_VERSION: &str = "development";

/// Sample bundles directory inside the framework directory.
pub const SAMPLES_DIR_NAME: &str = "samples";

/// Host configuration file, relative to the installation root.
pub const HOST_CONFIG_RELATIVE_PATH: &str = "cfg/nodecg.json";

/// Published packages that make up a production install.
pub const CORE_PACKAGE: &str = "nodecg-io-core";
pub const DASHBOARD_PACKAGE: &str = "nodecg-io-dashboard";

/// Framework directory for an installation root. Existence is not checked.
pub fn framework_dir(install_root: &Path) -> PathBuf {
    install_root.join(FRAMEWORK_DIR_NAME)
}

/// Samples bundle directory for a framework directory.
pub fn samples_dir(framework_dir: &Path) -> PathBuf {
    framework_dir.join(SAMPLES_DIR_NAME)
}

/// Host configuration file for an installation root.
pub fn host_config_path(install_root: &Path) -> PathBuf {
    install_root.join(HOST_CONFIG_RELATIVE_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_nest_under_root() {
        let root = Path::new("/srv/nodecg");
        let dir = framework_dir(root);
        assert_eq!(dir, PathBuf::from("/srv/nodecg/nodecg-io"));
        assert_eq!(samples_dir(&dir), PathBuf::from("/srv/nodecg/nodecg-io/samples"));
        assert_eq!(
            host_config_path(root),
            PathBuf::from("/srv/nodecg/cfg/nodecg.json")
        );
    }
}
