//! Decide what an install run has to do.
//!
//! Given the current descriptor (if any), the requested one, and whether the
//! framework directory is on disk, [`plan_install`] produces the full list of
//! side effects the orchestrator must perform. It does no I/O itself.

use crate::core::descriptor::InstallDescriptor;

/// Outcome of comparing current and requested installs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallPlan {
    /// The requested install is already present. Nothing is touched, not even
    /// the bundle registry.
    AlreadyInstalled,
    /// Something has to be (re)installed.
    Install(InstallSteps),
}

/// Side effects of an install, in execution order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallSteps {
    /// Delete the framework directory before installing (version changed).
    pub remove_existing: bool,
    pub strategy: StrategyChoice,
    /// Desired membership of the samples directory in the bundle registry.
    pub register_samples: bool,
}

/// Which install strategy runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyChoice {
    Development,
    /// `prior` is the current descriptor, but only if it was a production
    /// install as well.
    Production { prior: Option<InstallDescriptor> },
}

pub fn plan_install(
    current: Option<&InstallDescriptor>,
    requested: &InstallDescriptor,
    framework_dir_exists: bool,
) -> InstallPlan {
    if current == Some(requested) {
        return InstallPlan::AlreadyInstalled;
    }

    let remove_existing = framework_dir_exists
        && current.is_some_and(|current| current.version != requested.version);

    let strategy = if requested.dev {
        StrategyChoice::Development
    } else {
        StrategyChoice::Production {
            prior: current.filter(|current| !current.dev).cloned(),
        }
    };

    InstallPlan::Install(InstallSteps {
        remove_existing,
        strategy,
        register_samples: requested.wants_samples(),
    })
}
