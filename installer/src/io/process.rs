//! Run external commands (`npm`, `git`) for the install strategies.
//!
//! Output is pumped by two scoped threads while the parent waits for the child
//! to exit, so neither pipe can fill up and block it. Both pumps are joined
//! before a result is reported, so streamed output is never cut short.

use std::fmt;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;

use tracing::{debug, error, instrument, warn};

use crate::error::ExecError;

/// Upper bound on child stderr kept in memory when output is not streamed.
pub const STDERR_CAPTURE_LIMIT_BYTES: usize = 1_000_000;

/// A command line plus the directory it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory for the child. `None` inherits the caller's.
    pub workdir: Option<PathBuf>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            workdir: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.workdir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Run `spec`, succeeding iff it exits with code 0.
///
/// With `stream_output`, the child's stdout/stderr are forwarded to this
/// process's stdout/stderr as they are produced. Without it, stdout is
/// discarded and stderr is written to this process's stderr only if the
/// command fails.
pub fn execute(spec: &CommandSpec, stream_output: bool) -> Result<(), ExecError> {
    execute_with_sinks(spec, stream_output, &mut io::stdout(), &mut io::stderr())
}

/// [`execute`] with explicit destinations for the caller's stdout and stderr.
#[instrument(skip_all, fields(command = %spec, stream_output = stream_output))]
pub fn execute_with_sinks<O, E>(
    spec: &CommandSpec,
    stream_output: bool,
    out: &mut O,
    err: &mut E,
) -> Result<(), ExecError>
where
    O: Write + Send,
    E: Write + Send,
{
    let command = spec.to_string();
    if stream_output {
        let _ = writeln!(out, ">>> {command}");
    }

    let mut cmd = Command::new(&spec.program);
    cmd.args(&spec.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &spec.workdir {
        cmd.current_dir(dir);
    }

    debug!(workdir = ?spec.workdir, "spawning child process");
    let child = match cmd.spawn() {
        Ok(child) => child,
        Err(source) => {
            error!(err = %source, "failed to spawn command");
            return Err(ExecError::Launch { command, source });
        }
    };

    let (status, captured) = wait_and_pump(child, stream_output, out, err)
        .map_err(|source| ExecError::Io {
            command: command.clone(),
            source,
        })?;

    if stream_output {
        let _ = writeln!(out);
    }

    if status.success() {
        debug!("command finished");
        return Ok(());
    }

    warn!(exit_code = ?status.code(), "command failed");
    if !stream_output {
        // The user needs the diagnostics even though normal output was hidden.
        let _ = err.write_all(&captured.bytes);
        if captured.truncated > 0 {
            let _ = write!(err, "\n[stderr truncated {} bytes]\n", captured.truncated);
        }
        let _ = err.flush();
    }

    Err(ExecError::ExitCode {
        command,
        code: status.code(),
    })
}

/// Stderr kept from a non-streamed command.
#[derive(Debug, Default)]
struct Captured {
    bytes: Vec<u8>,
    truncated: usize,
}

fn wait_and_pump<O, E>(
    mut child: Child,
    stream_output: bool,
    out: &mut O,
    err: &mut E,
) -> io::Result<(ExitStatus, Captured)>
where
    O: Write + Send,
    E: Write + Send,
{
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| io::Error::other("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| io::Error::other("stderr was not piped"))?;

    thread::scope(|scope| {
        let stdout_pump = scope.spawn(move || {
            if stream_output {
                forward_stream(stdout, out).map(|()| Captured::default())
            } else {
                read_stream_limited(stdout, 0)
            }
        });
        let stderr_pump = scope.spawn(move || {
            if stream_output {
                forward_stream(stderr, err).map(|()| Captured::default())
            } else {
                read_stream_limited(stderr, STDERR_CAPTURE_LIMIT_BYTES)
            }
        });

        let status = child.wait();
        let stdout_result = join_pump(stdout_pump);
        let stderr_result = join_pump(stderr_pump);

        let status = status?;
        stdout_result?;
        Ok((status, stderr_result?))
    })
}

fn join_pump(handle: thread::ScopedJoinHandle<'_, io::Result<Captured>>) -> io::Result<Captured> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(io::Error::other("output pump thread panicked")),
    }
}

/// Copy `reader` to `sink` chunk by chunk, flushing after each chunk.
fn forward_stream<R: Read, W: Write>(mut reader: R, sink: &mut W) -> io::Result<()> {
    let mut chunk = [0u8; 8192];
    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        sink.write_all(&chunk[..n])?;
        sink.flush()?;
    }
    Ok(())
}

/// Drain `reader`, keeping at most `limit` bytes.
fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> io::Result<Captured> {
    let mut captured = Captured::default();
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(captured.bytes.len());
        let keep = n.min(remaining);
        captured.bytes.extend_from_slice(&chunk[..keep]);
        captured.truncated += n - keep;
    }

    Ok(captured)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_program_and_args() {
        let spec = CommandSpec::new("npm").args(["install", "--omit=dev"]);
        assert_eq!(spec.to_string(), "npm install --omit=dev");
    }

    #[test]
    fn missing_program_is_a_launch_error() {
        let spec = CommandSpec::new("nodecg-io-definitely-not-a-command");
        let mut out = Vec::new();
        let mut err = Vec::new();
        let result = execute_with_sinks(&spec, false, &mut out, &mut err);
        match result {
            Err(ExecError::Launch { command, source }) => {
                assert_eq!(command, "nodecg-io-definitely-not-a-command");
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected launch error, got {other:?}"),
        }
    }

    #[test]
    fn read_stream_limited_counts_dropped_bytes() {
        let captured = read_stream_limited(&b"abcdef"[..], 4).expect("read");
        assert_eq!(captured.bytes, b"abcd");
        assert_eq!(captured.truncated, 2);

        let drained = read_stream_limited(&b"abcdef"[..], 0).expect("read");
        assert!(drained.bytes.is_empty());
        assert_eq!(drained.truncated, 6);
    }

    #[cfg(unix)]
    fn sh(script: &str) -> CommandSpec {
        CommandSpec::new("sh").args(["-c", script])
    }

    #[cfg(unix)]
    #[test]
    fn failing_quiet_command_still_reports_stderr() {
        let spec = sh("echo progress; echo 'boom: missing package' >&2; exit 2");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = execute_with_sinks(&spec, false, &mut out, &mut err);

        let exec_err = result.expect_err("command should fail");
        assert_eq!(exec_err.exit_code(), Some(2));
        assert!(exec_err.to_string().contains('2'));
        assert!(exec_err.to_string().contains("sh -c"));
        assert!(out.is_empty(), "stdout must stay hidden");
        assert_eq!(String::from_utf8_lossy(&err), "boom: missing package\n");
    }

    #[cfg(unix)]
    #[test]
    fn successful_quiet_command_prints_nothing() {
        let spec = sh("echo hello; echo warning >&2");
        let mut out = Vec::new();
        let mut err = Vec::new();

        execute_with_sinks(&spec, false, &mut out, &mut err).expect("success");
        assert!(out.is_empty());
        assert!(err.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn streamed_command_forwards_everything() {
        let spec = sh("echo hello; echo warning >&2");
        let mut out = Vec::new();
        let mut err = Vec::new();

        execute_with_sinks(&spec, true, &mut out, &mut err).expect("success");
        let out = String::from_utf8_lossy(&out);
        assert!(out.starts_with(">>> sh -c"));
        assert!(out.contains("hello\n"));
        assert_eq!(String::from_utf8_lossy(&err), "warning\n");
    }

    #[cfg(unix)]
    #[test]
    fn streamed_failure_does_not_repeat_stderr() {
        let spec = sh("echo once >&2; exit 3");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let exec_err = execute_with_sinks(&spec, true, &mut out, &mut err).expect_err("fail");
        assert_eq!(exec_err.exit_code(), Some(3));
        assert_eq!(String::from_utf8_lossy(&err), "once\n");
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_requested_directory() {
        let temp = tempfile::tempdir().expect("tempdir");
        let spec = sh("test -f marker").current_dir(temp.path());
        let mut out = Vec::new();
        let mut err = Vec::new();

        assert!(execute_with_sinks(&spec, false, &mut out, &mut err).is_err());
        std::fs::write(temp.path().join("marker"), "").expect("write marker");
        execute_with_sinks(&spec, false, &mut out, &mut err).expect("marker visible");
    }
}
