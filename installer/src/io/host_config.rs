//! Bundle directory registration in the host configuration (`cfg/nodecg.json`).
//!
//! NodeCG loads bundles from every directory listed in `bundles.paths`. The
//! file is read into an order-preserving JSON value, the one list entry is
//! edited, and the file is written back with its original indentation. Every
//! other key and list entry round-trips untouched; numbers keep their exact
//! spelling (`arbitrary_precision`).

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use tracing::{debug, info, instrument};

use crate::constants::host_config_path;
use crate::core::bundle_paths::{bundle_paths, set_bundle_path};
use crate::error::{InstallError, Result};
use crate::io::files::write_atomic;

const DEFAULT_INDENT: &[u8] = b"    ";

/// Parsed host configuration plus the indentation it was written with.
#[derive(Debug, Clone)]
struct HostConfig {
    value: Value,
    indent: Vec<u8>,
}

/// Ensure `bundle_dir` is listed exactly once (`present`) or not at all.
///
/// A missing configuration file is created as `{}` first. Returns whether
/// the bundle list changed; the file is only rewritten when it did.
#[instrument(skip_all, fields(bundle_dir = %bundle_dir.display(), present = present))]
pub fn set_bundle_dir_registered(
    install_root: &Path,
    bundle_dir: &Path,
    present: bool,
) -> Result<bool> {
    let path = host_config_path(install_root);
    let entry = bundle_dir.to_str().ok_or_else(|| {
        InstallError::filesystem(
            format!("register bundle directory {}", bundle_dir.display()),
            io::Error::new(io::ErrorKind::InvalidData, "path is not valid UTF-8"),
        )
    })?;

    let mut config = load_or_create(&path)?;
    let changed = set_bundle_path(&mut config.value, entry, present)
        .map_err(|reason| InstallError::parse(&path, reason))?;
    if !changed {
        debug!("bundle registry already up to date");
        return Ok(false);
    }

    write_host_config(&path, &config)?;
    if present {
        info!(config = %path.display(), "registered bundle directory");
    } else {
        info!(config = %path.display(), "unregistered bundle directory");
    }
    Ok(true)
}

/// Bundle directories currently listed in the host configuration.
///
/// An absent configuration has no registered directories.
pub fn registered_bundle_dirs(install_root: &Path) -> Result<Vec<String>> {
    let path = host_config_path(install_root);
    match read_host_config(&path)? {
        Some(config) => Ok(bundle_paths(&config.value)),
        None => Ok(Vec::new()),
    }
}

fn load_or_create(path: &Path) -> Result<HostConfig> {
    if let Some(config) = read_host_config(path)? {
        return Ok(config);
    }
    debug!(config = %path.display(), "host configuration missing, creating default");
    let config = HostConfig {
        value: Value::Object(serde_json::Map::new()),
        indent: DEFAULT_INDENT.to_vec(),
    };
    write_host_config(path, &config)?;
    Ok(config)
}

fn read_host_config(path: &Path) -> Result<Option<HostConfig>> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(InstallError::filesystem(
                format!("read host configuration {}", path.display()),
                source,
            ));
        }
    };
    let value: Value = serde_json::from_str(&contents)
        .map_err(|err| InstallError::parse(path, err.to_string()))?;
    Ok(Some(HostConfig {
        value,
        indent: detect_indent(&contents),
    }))
}

fn write_host_config(path: &Path, config: &HostConfig) -> Result<()> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(&config.indent);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    config
        .value
        .serialize(&mut serializer)
        .map_err(|err| InstallError::filesystem("serialize host configuration", err.into()))?;
    buf.push(b'\n');
    write_atomic(path, buf)
}

/// Leading whitespace of the first indented line, or four spaces.
fn detect_indent(contents: &str) -> Vec<u8> {
    contents
        .lines()
        .map(|line| {
            let trimmed = line.trim_start_matches([' ', '\t']);
            &line[..line.len() - trimmed.len()]
        })
        .find(|indent| !indent.is_empty())
        .map(|indent| indent.as_bytes().to_vec())
        .unwrap_or_else(|| DEFAULT_INDENT.to_vec())
}
