//! Error kinds surfaced by the installer core.
//!
//! Callers match on [`InstallError`] to tell a missing host installation apart
//! from a failed command or a broken file, instead of inspecting messages.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstallError {
    #[error(
        "couldn't find a nodecg installation in {start} or any parent directory. \
         Make sure that you are in the directory of your nodecg installation"
    )]
    NotFound { start: PathBuf },

    #[error("failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },

    #[error(transparent)]
    Execution(#[from] ExecError),

    #[error("{context}: {source}")]
    Filesystem {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("{message}")]
    Prompt { message: String },
}

impl InstallError {
    #[must_use]
    pub fn parse(path: &Path, reason: impl Into<String>) -> Self {
        Self::Parse {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn filesystem(context: impl Into<String>, source: io::Error) -> Self {
        Self::Filesystem {
            context: context.into(),
            source,
        }
    }

    #[must_use]
    pub fn prompt(message: impl Into<String>) -> Self {
        Self::Prompt {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Failure of an external command run through [`crate::io::process`].
#[derive(Debug, Error)]
pub enum ExecError {
    /// The process could not be started at all.
    #[error("failed to launch \"{command}\": {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    /// The process ran and exited unsuccessfully.
    #[error("command \"{command}\" returned error code {}", exit_code_label(.code))]
    ExitCode { command: String, code: Option<i32> },

    /// Waiting on the process or pumping its output failed.
    #[error("i/o error while running \"{command}\": {source}")]
    Io {
        command: String,
        #[source]
        source: io::Error,
    },
}

impl ExecError {
    /// Exit code of a command that ran to completion, if it reported one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::ExitCode { code, .. } => *code,
            _ => None,
        }
    }
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none (terminated by signal)".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, InstallError>;
