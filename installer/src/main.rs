//! `nodecg-io` command-line installer.
//!
//! Installs, updates and removes nodecg-io inside the NodeCG installation
//! that contains the working directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use installer::error::InstallError;
use installer::exit_codes;
use installer::install::run_install;
use installer::io::config::load_config;
use installer::io::locator::working_dir;
use installer::io::prompt::FlagPrompt;
use installer::io::strategy::PackageManagerStrategy;
use installer::logging;
use installer::uninstall::run_uninstall;

#[derive(Parser, Debug)]
#[command(name = "nodecg-io", version, about = "Install nodecg-io into a NodeCG installation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Install or update nodecg-io.
    Install {
        /// Release to install (e.g. `0.2`).
        #[arg(long, conflicts_with = "dev")]
        version: Option<String>,
        /// Build the development version from source.
        #[arg(long)]
        dev: bool,
        /// Register the sample bundles (development installs only).
        #[arg(long, conflicts_with = "no_samples")]
        samples: bool,
        /// Unregister the sample bundles.
        #[arg(long)]
        no_samples: bool,
        /// Installer settings (TOML). Defaults apply when the file is missing.
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
        /// Stream package-manager output and log progress.
        #[arg(short, long)]
        verbose: bool,
    },
    /// Remove nodecg-io and unregister its bundles.
    Uninstall,
}

impl Command {
    fn verbose(&self) -> bool {
        matches!(self, Self::Install { verbose: true, .. })
    }

    /// Names the failed action in the top-level error message.
    fn action(&self) -> &'static str {
        match self {
            Self::Install { .. } => "installing",
            Self::Uninstall => "uninstalling",
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.command.verbose());
    let action = cli.command.action();
    if let Err(err) = run(cli) {
        eprintln!("Error while {action} nodecg-io: {err:#}");
        std::process::exit(exit_code_for(&err));
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Install {
            version,
            dev,
            samples,
            no_samples,
            config,
            verbose,
        } => {
            let mut cfg = match config {
                Some(path) => load_config(&path)
                    .with_context(|| format!("load installer config {}", path.display()))?,
                None => Default::default(),
            };
            cfg.stream_output |= verbose;
            let prompt = FlagPrompt {
                version,
                dev,
                samples: samples_flag(samples, no_samples),
            };
            run_install(&working_dir()?, &prompt, &PackageManagerStrategy::new(cfg))?;
        }
        Command::Uninstall => {
            run_uninstall(&working_dir()?)?;
        }
    }
    Ok(())
}

fn samples_flag(samples: bool, no_samples: bool) -> Option<bool> {
    match (samples, no_samples) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<InstallError>() {
        Some(install_err) if install_err.is_not_found() => exit_codes::NOT_FOUND,
        _ => exit_codes::FAILED,
    }
}
