//! Test-only fixtures: a throwaway host installation plus fake prompt and
//! strategy implementations.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::constants::{HOST_MANIFEST_FILE, framework_dir, host_config_path};
use crate::core::descriptor::InstallDescriptor;
use crate::error::{ExecError, InstallError, Result};
use crate::io::descriptor_store::write_descriptor;
use crate::io::prompt::InstallPrompt;
use crate::io::strategy::InstallStrategy;

/// File written into the target by [`RecordingStrategy`].
pub const RECORDED_MARKER: &str = "recorded-install.txt";

/// Host installation in a temp dir, with a nested working directory.
pub struct HostFixture {
    temp: TempDir,
}

impl HostFixture {
    pub fn new() -> Self {
        let temp = tempfile::tempdir().expect("tempdir");
        fs::write(
            temp.path().join(HOST_MANIFEST_FILE),
            "{\n  \"name\": \"nodecg\",\n  \"version\": \"2.1.0\"\n}\n",
        )
        .expect("write host manifest");
        let fixture = Self { temp };
        fs::create_dir_all(fixture.cwd()).expect("create cwd");
        fixture
    }

    pub fn root(&self) -> &Path {
        self.temp.path()
    }

    /// A directory below the root, as if the user ran the tool from a bundle.
    pub fn cwd(&self) -> PathBuf {
        self.root().join("bundles").join("my-bundle")
    }

    pub fn framework_dir(&self) -> PathBuf {
        framework_dir(self.root())
    }

    pub fn host_config_path(&self) -> PathBuf {
        host_config_path(self.root())
    }

    pub fn write_host_config(&self, contents: &str) {
        let path = self.host_config_path();
        fs::create_dir_all(path.parent().expect("cfg parent")).expect("create cfg");
        fs::write(path, contents).expect("write host config");
    }

    pub fn read_host_config(&self) -> String {
        fs::read_to_string(self.host_config_path()).expect("read host config")
    }

    /// Pretend `descriptor` was installed by an earlier run.
    pub fn with_installed(self, descriptor: &InstallDescriptor) -> Self {
        write_descriptor(&self.framework_dir(), descriptor).expect("write descriptor");
        self
    }

    /// Every directory and file under the root. `None` marks a directory.
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
        let mut entries = BTreeMap::new();
        collect_entries(self.root(), self.root(), &mut entries);
        entries
    }
}

impl Default for HostFixture {
    fn default() -> Self {
        Self::new()
    }
}

fn collect_entries(root: &Path, dir: &Path, entries: &mut BTreeMap<PathBuf, Option<Vec<u8>>>) {
    let mut children: Vec<_> = fs::read_dir(dir)
        .expect("read dir")
        .map(|entry| entry.expect("dir entry").path())
        .collect();
    children.sort();
    for path in children {
        let relative = path.strip_prefix(root).expect("under root").to_path_buf();
        if path.is_dir() {
            entries.insert(relative, None);
            collect_entries(root, &path, entries);
        } else {
            entries.insert(relative, Some(fs::read(&path).expect("read file")));
        }
    }
}

/// Prompt returning a fixed answer and remembering what it was seeded with.
pub struct ScriptedPrompt {
    answer: std::result::Result<InstallDescriptor, String>,
    seen: RefCell<Vec<Option<InstallDescriptor>>>,
}

impl ScriptedPrompt {
    pub fn new(answer: InstallDescriptor) -> Self {
        Self {
            answer: Ok(answer),
            seen: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            seen: RefCell::new(Vec::new()),
        }
    }

    /// The `current` argument of every call, in order.
    pub fn seen(&self) -> Vec<Option<InstallDescriptor>> {
        self.seen.borrow().clone()
    }
}

impl InstallPrompt for ScriptedPrompt {
    fn request(&self, current: Option<&InstallDescriptor>) -> Result<InstallDescriptor> {
        self.seen.borrow_mut().push(current.cloned());
        self.answer.clone().map_err(InstallError::prompt)
    }
}

/// Which strategy entry point was called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrategyKind {
    Development,
    Production { prior: Option<InstallDescriptor> },
}

/// One recorded strategy invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyCall {
    pub kind: StrategyKind,
    pub requested: InstallDescriptor,
    pub target: PathBuf,
    /// Whether the target directory existed when the strategy started.
    pub target_existed: bool,
}

/// Strategy that records calls and drops a marker file instead of installing.
#[derive(Default)]
pub struct RecordingStrategy {
    calls: RefCell<Vec<StrategyCall>>,
    fail_with_code: Option<i32>,
}

impl RecordingStrategy {
    /// Strategy that creates its marker and then fails like a broken `npm`.
    pub fn failing(code: i32) -> Self {
        Self {
            fail_with_code: Some(code),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<StrategyCall> {
        self.calls.borrow().clone()
    }

    fn record(
        &self,
        kind: StrategyKind,
        requested: &InstallDescriptor,
        target: &Path,
    ) -> Result<()> {
        self.calls.borrow_mut().push(StrategyCall {
            kind,
            requested: requested.clone(),
            target: target.to_path_buf(),
            target_existed: target.exists(),
        });
        fs::create_dir_all(target)
            .map_err(|source| InstallError::filesystem("create target", source))?;
        fs::write(target.join(RECORDED_MARKER), &requested.version)
            .map_err(|source| InstallError::filesystem("write marker", source))?;
        match self.fail_with_code {
            Some(code) => Err(ExecError::ExitCode {
                command: "npm install".to_string(),
                code: Some(code),
            }
            .into()),
            None => Ok(()),
        }
    }
}

impl InstallStrategy for RecordingStrategy {
    fn install_development(&self, requested: &InstallDescriptor, target: &Path) -> Result<()> {
        self.record(StrategyKind::Development, requested, target)
    }

    fn install_production(
        &self,
        requested: &InstallDescriptor,
        prior: Option<&InstallDescriptor>,
        target: &Path,
    ) -> Result<()> {
        let kind = StrategyKind::Production {
            prior: prior.cloned(),
        };
        self.record(kind, requested, target)
    }
}
