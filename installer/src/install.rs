//! Orchestration for `nodecg-io install`.
//!
//! Locates the host installation, compares what is installed with what the
//! prompt asks for, and then runs the plan from [`crate::core::plan`]:
//! optional cleanup, one install strategy, bundle registration, and finally
//! the descriptor write. The descriptor is only written after everything else
//! succeeded, so a failed run is retried in full next time.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use crate::constants::{framework_dir, samples_dir};
use crate::core::descriptor::InstallDescriptor;
use crate::core::plan::{InstallPlan, InstallSteps, StrategyChoice, plan_install};
use crate::error::Result;
use crate::io::descriptor_store::{read_descriptor, write_descriptor};
use crate::io::files::remove_dir_if_exists;
use crate::io::host_config::set_bundle_dir_registered;
use crate::io::locator::require_installation_root;
use crate::io::prompt::InstallPrompt;
use crate::io::strategy::InstallStrategy;

/// Outcome of `nodecg-io install`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The requested install was already present; nothing was changed.
    AlreadyInstalled { root: PathBuf },
    Installed {
        root: PathBuf,
        descriptor: InstallDescriptor,
    },
}

/// Install (or reinstall) nodecg-io into the host found at or above `cwd`.
#[instrument(skip_all, fields(cwd = %cwd.display()))]
pub fn run_install<P, S>(cwd: &Path, prompt: &P, strategy: &S) -> Result<InstallOutcome>
where
    P: InstallPrompt + ?Sized,
    S: InstallStrategy + ?Sized,
{
    let root = require_installation_root(cwd)?;
    println!("Detected nodecg installation at {}.", root.display());

    let dir = framework_dir(&root);
    let current = read_descriptor(&dir)?;
    let requested = prompt.request(current.as_ref())?;

    let steps = match plan_install(current.as_ref(), &requested, dir.exists()) {
        InstallPlan::AlreadyInstalled => {
            println!("The requested version of nodecg-io is already installed.");
            info!(version = %requested.version, "already installed");
            return Ok(InstallOutcome::AlreadyInstalled { root });
        }
        InstallPlan::Install(steps) => steps,
    };
    debug!(?steps, "install planned");

    apply_steps(&root, &dir, &requested, &steps, strategy)?;

    println!("Successfully installed nodecg-io {}.", requested.version);
    Ok(InstallOutcome::Installed {
        root,
        descriptor: requested,
    })
}

fn apply_steps<S: InstallStrategy + ?Sized>(
    root: &Path,
    dir: &Path,
    requested: &InstallDescriptor,
    steps: &InstallSteps,
    strategy: &S,
) -> Result<()> {
    if steps.remove_existing {
        info!(dir = %dir.display(), "version changed, removing old install");
        println!("Deleting nodecg-io installation at {}.", dir.display());
        remove_dir_if_exists(dir)?;
    }

    println!("Installing nodecg-io {}...", requested.version);
    match &steps.strategy {
        StrategyChoice::Development => strategy.install_development(requested, dir)?,
        StrategyChoice::Production { prior } => {
            strategy.install_production(requested, prior.as_ref(), dir)?;
        }
    }

    set_bundle_dir_registered(root, dir, true)?;
    set_bundle_dir_registered(root, &samples_dir(dir), steps.register_samples)?;

    write_descriptor(dir, requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{HostFixture, RecordingStrategy, ScriptedPrompt};

    #[test]
    fn fresh_production_install_persists_descriptor() {
        let host = HostFixture::new();
        let requested = InstallDescriptor::production("0.2");

        let outcome = run_install(
            &host.cwd(),
            &ScriptedPrompt::new(requested.clone()),
            &RecordingStrategy::default(),
        )
        .expect("install");

        assert_eq!(
            outcome,
            InstallOutcome::Installed {
                root: host.root().to_path_buf(),
                descriptor: requested.clone(),
            }
        );
        assert_eq!(
            read_descriptor(&host.framework_dir()).expect("read"),
            Some(requested)
        );
    }

    #[test]
    fn prompt_failure_changes_nothing() {
        let host = HostFixture::new();
        let before = host.snapshot();

        let err = run_install(
            &host.cwd(),
            &ScriptedPrompt::failing("no version chosen"),
            &RecordingStrategy::default(),
        )
        .unwrap_err();

        assert!(err.to_string().contains("no version chosen"));
        assert_eq!(host.snapshot(), before);
    }
}
