//! Decide which install the user asked for.

use tracing::debug;

use crate::core::descriptor::{InstallDescriptor, is_release_version};
use crate::error::{InstallError, Result};

/// Source of the requested install descriptor.
pub trait InstallPrompt {
    /// Produce the requested descriptor. `current` is what is installed now
    /// and seeds the defaults.
    fn request(&self, current: Option<&InstallDescriptor>) -> Result<InstallDescriptor>;
}

/// Non-interactive prompt answered from command-line flags.
///
/// Anything not given on the command line is taken from the current install,
/// so `install --samples` on a development install only toggles samples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlagPrompt {
    pub version: Option<String>,
    pub dev: bool,
    pub samples: Option<bool>,
}

impl InstallPrompt for FlagPrompt {
    fn request(&self, current: Option<&InstallDescriptor>) -> Result<InstallDescriptor> {
        let requested = if self.dev {
            let current_samples = current.is_some_and(InstallDescriptor::wants_samples);
            InstallDescriptor::development(self.samples.unwrap_or(current_samples))
        } else if let Some(version) = &self.version {
            if !is_release_version(version) {
                return Err(InstallError::prompt(format!(
                    "\"{version}\" is not a release version (expected e.g. 0.2 or 0.2.1)"
                )));
            }
            if self.samples == Some(true) {
                return Err(InstallError::prompt(
                    "samples can only be used with a development install",
                ));
            }
            InstallDescriptor::production(version.as_str())
        } else {
            let Some(current) = current else {
                return Err(InstallError::prompt(
                    "nodecg-io is not installed yet; pass --version <VERSION> or --dev",
                ));
            };
            match self.samples {
                Some(samples) if current.dev => InstallDescriptor::development(samples),
                Some(true) => {
                    return Err(InstallError::prompt(
                        "samples can only be used with a development install",
                    ));
                }
                _ => current.clone(),
            }
        };
        debug!(
            version = %requested.version,
            dev = requested.dev,
            use_samples = requested.use_samples,
            "install requested"
        );
        Ok(requested)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(version: Option<&str>, dev: bool, samples: Option<bool>) -> FlagPrompt {
        FlagPrompt {
            version: version.map(str::to_string),
            dev,
            samples,
        }
    }

    #[test]
    fn release_version_requests_production() {
        let requested = flags(Some("0.2.1"), false, None).request(None).expect("request");
        assert_eq!(requested, InstallDescriptor::production("0.2.1"));
    }

    #[test]
    fn rejects_malformed_version() {
        let err = flags(Some("latest"), false, None).request(None).unwrap_err();
        assert!(matches!(err, InstallError::Prompt { .. }), "got {err:?}");
        assert!(err.to_string().contains("latest"));
    }

    #[test]
    fn dev_keeps_current_samples_choice() {
        let current = InstallDescriptor::development(true);
        let requested = flags(None, true, None).request(Some(&current)).expect("request");
        assert_eq!(requested, InstallDescriptor::development(true));

        let requested = flags(None, true, Some(false))
            .request(Some(&current))
            .expect("request");
        assert_eq!(requested, InstallDescriptor::development(false));
    }

    #[test]
    fn no_flags_reuse_current_install() {
        let current = InstallDescriptor::production("0.2");
        let requested = FlagPrompt::default().request(Some(&current)).expect("request");
        assert_eq!(requested, current);
    }

    #[test]
    fn samples_flag_toggles_development_install() {
        let current = InstallDescriptor::development(false);
        let requested = flags(None, false, Some(true))
            .request(Some(&current))
            .expect("request");
        assert_eq!(requested, InstallDescriptor::development(true));
    }

    #[test]
    fn samples_with_production_is_rejected() {
        let current = InstallDescriptor::production("0.2");
        assert!(flags(None, false, Some(true)).request(Some(&current)).is_err());
        assert!(flags(Some("0.2"), false, Some(true)).request(None).is_err());
    }

    #[test]
    fn nothing_requested_and_nothing_installed_fails() {
        let err = FlagPrompt::default().request(None).unwrap_err();
        assert!(matches!(err, InstallError::Prompt { .. }), "got {err:?}");
    }
}
