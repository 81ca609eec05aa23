//! Install strategies: put nodecg-io into the framework directory.

use std::path::Path;

use serde_json::json;
use tracing::{info, instrument};

use crate::constants::{CORE_PACKAGE, DASHBOARD_PACKAGE};
use crate::core::descriptor::InstallDescriptor;
use crate::error::{InstallError, Result};
use crate::io::config::InstallerConfig;
use crate::io::files::write_atomic;
use crate::io::process::{CommandSpec, execute};

/// Performs the actual install once the planner has decided what to do.
pub trait InstallStrategy {
    /// Build nodecg-io from source in `target`.
    fn install_development(&self, requested: &InstallDescriptor, target: &Path) -> Result<()>;

    /// Install the published packages for `requested.version` in `target`.
    /// `prior` is the production install being replaced, if any.
    fn install_production(
        &self,
        requested: &InstallDescriptor,
        prior: Option<&InstallDescriptor>,
        target: &Path,
    ) -> Result<()>;
}

/// Strategy backed by `git` and `npm`.
#[derive(Debug, Clone, Default)]
pub struct PackageManagerStrategy {
    config: InstallerConfig,
}

impl PackageManagerStrategy {
    pub fn new(config: InstallerConfig) -> Self {
        Self { config }
    }

    /// Commands for a development install, in order.
    pub fn development_commands(&self, target: &Path) -> Vec<CommandSpec> {
        let fetch = if target.join(".git").exists() {
            CommandSpec::new(&self.config.git_command)
                .arg("pull")
                .current_dir(target)
        } else {
            CommandSpec::new(&self.config.git_command)
                .arg("clone")
                .arg(&self.config.repository)
                .arg(target.display().to_string())
        };
        vec![
            fetch,
            CommandSpec::new(&self.config.npm_command)
                .arg("install")
                .current_dir(target),
            CommandSpec::new(&self.config.npm_command)
                .args(["run", "build"])
                .current_dir(target),
        ]
    }

    /// Command installing the packages listed in the generated manifest.
    pub fn production_command(&self, target: &Path) -> CommandSpec {
        CommandSpec::new(&self.config.npm_command)
            .args(["install", "--omit=dev"])
            .current_dir(target)
    }

    fn run_all(&self, commands: &[CommandSpec]) -> Result<()> {
        for command in commands {
            execute(command, self.config.stream_output)?;
        }
        Ok(())
    }
}

impl InstallStrategy for PackageManagerStrategy {
    #[instrument(skip_all, fields(target = %target.display()))]
    fn install_development(&self, requested: &InstallDescriptor, target: &Path) -> Result<()> {
        info!(use_samples = requested.use_samples, "installing development version");
        self.run_all(&self.development_commands(target))
    }

    #[instrument(skip_all, fields(target = %target.display(), version = %requested.version))]
    fn install_production(
        &self,
        requested: &InstallDescriptor,
        prior: Option<&InstallDescriptor>,
        target: &Path,
    ) -> Result<()> {
        match prior {
            Some(prior) => info!(from = %prior.version, "upgrading production install"),
            None => info!("installing production version"),
        }
        write_atomic(
            &target.join("package.json"),
            production_manifest(&requested.version)?,
        )?;
        self.run_all(&[self.production_command(target)])
    }
}

/// `package.json` pulling in the published framework packages.
pub fn production_manifest(version: &str) -> Result<String> {
    let range = format!("^{version}");
    let manifest = json!({
        "name": "nodecg-io-install",
        "private": true,
        "dependencies": {
            (CORE_PACKAGE): range.as_str(),
            (DASHBOARD_PACKAGE): range.as_str(),
        },
    });
    let mut buf = serde_json::to_string_pretty(&manifest)
        .map_err(|err| InstallError::filesystem("serialize package manifest", err.into()))?;
    buf.push('\n');
    Ok(buf)
}
