//! Install descriptor: the identity of an installation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::DEVELOPMENT_VERSION;

static RELEASE_VERSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\d+(\.\d+)?$").expect("release version regex should be valid")
});

/// What is installed (read from `install.json`) or what the user asked for.
///
/// Two descriptors are equal iff all three fields match; the derived
/// `PartialEq` is exactly that rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallDescriptor {
    /// Release version (`0.2` / `0.2.1`) or the development sentinel.
    pub version: String,
    /// True iff `version` is the development sentinel.
    pub dev: bool,
    /// Whether sample bundles are registered. Only meaningful for dev installs.
    pub use_samples: bool,
}

impl InstallDescriptor {
    /// Install of published packages. Samples are never used.
    pub fn production(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            dev: false,
            use_samples: false,
        }
    }

    /// Install built from local sources.
    pub fn development(use_samples: bool) -> Self {
        Self {
            version: DEVELOPMENT_VERSION.to_string(),
            dev: true,
            use_samples,
        }
    }

    /// Whether the samples directory should be registered with the host.
    pub fn wants_samples(&self) -> bool {
        self.dev && self.use_samples
    }
}

/// True if `version` looks like a release tag (`MAJOR.MINOR` or `MAJOR.MINOR.PATCH`).
pub fn is_release_version(version: &str) -> bool {
    RELEASE_VERSION.is_match(version)
}
