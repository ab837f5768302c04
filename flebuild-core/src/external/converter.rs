// ============================================================================
// flebuild-core/src/external/converter.rs
// ============================================================================
//
// PROCESS CONVERTER: Subprocess Execution of FLEcli
//
// Runs the converter as `<tool> adif -o <source> <target>` with stdout and
// stderr piped into reader threads. The child is polled so a cancellation
// request can kill it; the exit status is the only thing interpreted.

use super::{Converter, check_dependency};
use crate::cancel::CancellationToken;
use crate::config::CONVERTER_SUBCOMMAND;
use crate::error::{
    CoreError, CoreResult, command_start_error, command_wait_error, conversion_failed_error,
};

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// How often a running converter is checked for exit or cancellation.
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// How long a converter killed by a signal waits for the interrupt handler
/// to mark the build cancelled.
const SIGNAL_GRACE: Duration = Duration::from_millis(250);

/// Converter backed by an external executable.
#[derive(Debug, Clone)]
pub struct ProcessConverter {
    program: String,
}

impl ProcessConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Builds the exact command line for one conversion.
    pub fn command(&self, source: &Path, target: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(CONVERTER_SUBCOMMAND)
            .arg("-o")
            .arg(source)
            .arg(target);
        cmd
    }
}

impl Converter for ProcessConverter {
    fn name(&self) -> &str {
        &self.program
    }

    fn ensure_available(&self) -> CoreResult<()> {
        check_dependency(&self.program).map(|_| ())
    }

    fn convert(&self, source: &Path, target: &Path, cancel: &CancellationToken) -> CoreResult<()> {
        let mut cmd = self.command(source, target);
        log::debug!("Running: {}", format_command(&cmd));

        let mut child = cmd
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| command_start_error(&self.program, e))?;

        let stdout_handle = child.stdout.take().map(|out| spawn_reader(out, "stdout"));
        let stderr_handle = child.stderr.take().map(|err| spawn_reader(err, "stderr"));

        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if cancel.is_cancelled() => {
                    log::debug!("Killing converter for {}", source.display());
                    let _ = child.kill();
                    let _ = child.wait();
                    // Readers are not joined: a grandchild may still hold the pipes.
                    drop(stdout_handle);
                    drop(stderr_handle);
                    return Err(CoreError::Cancelled(source.to_path_buf()));
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(command_wait_error(&self.program, e));
                }
            }
        };

        let stdout = collect_output(stdout_handle);
        let stderr = collect_output(stderr_handle);

        if status.success() {
            return Ok(());
        }
        // A terminal interrupt reaches the converter too, possibly before the
        // handler thread has set the token; its death is not a conversion
        // failure.
        let killed_by_signal = status.code().is_none();
        if cancel.is_cancelled() || (killed_by_signal && cancel_arrives(cancel, SIGNAL_GRACE)) {
            return Err(CoreError::Cancelled(source.to_path_buf()));
        }

        // Some converters report errors on stdout only.
        let diagnostics = if stderr.trim().is_empty() { stdout } else { stderr };
        Err(conversion_failed_error(source, status, diagnostics))
    }
}

/// Waits up to `grace` for the token to be set.
fn cancel_arrives(cancel: &CancellationToken, grace: Duration) -> bool {
    let deadline = Instant::now() + grace;
    while Instant::now() < deadline {
        if cancel.is_cancelled() {
            return true;
        }
        thread::sleep(POLL_INTERVAL);
    }
    cancel.is_cancelled()
}

fn spawn_reader<R>(mut stream: R, label: &'static str) -> JoinHandle<String>
where
    R: Read + Send + 'static,
{
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Err(e) = stream.read_to_end(&mut buf) {
            log::debug!("Error reading converter {}: {}", label, e);
        }
        let text = String::from_utf8_lossy(&buf).into_owned();
        for line in text.lines() {
            log::debug!("{}: {}", label.to_uppercase(), line);
        }
        text
    })
}

fn collect_output(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Renders a command for logs, e.g. `FLEcli adif -o src/a.fle out/a.adi`.
pub fn format_command(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|arg| arg.to_string_lossy().into_owned()));
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_converter_arguments_in_order() {
        let converter = ProcessConverter::new("FLEcli");
        let cmd = converter.command(Path::new("src/a.fle"), Path::new("out/a.adi"));

        assert_eq!(format_command(&cmd), "FLEcli adif -o src/a.fle out/a.adi");
    }

    #[test]
    fn missing_program_is_tool_missing_at_spawn() {
        let converter = ProcessConverter::new("flebuild-surely-not-installed-42");
        let err = converter
            .convert(
                Path::new("src/a.fle"),
                Path::new("out/a.adi"),
                &CancellationToken::new(),
            )
            .unwrap_err();
        assert!(err.is_tool_missing());
    }

    #[cfg(unix)]
    mod unix {
        use super::*;
        use std::fs;
        use std::os::unix::fs::PermissionsExt;
        use std::path::PathBuf;
        use tempfile::TempDir;

        fn script(dir: &TempDir, body: &str) -> PathBuf {
            let path = dir.path().join("fake-flecli");
            fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            path
        }

        #[test]
        fn success_writes_target() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(&dir, r#"cp "$3" "$4""#);
            let source = dir.path().join("a.fle");
            let target = dir.path().join("a.adi");
            fs::write(&source, "mycall N0CALL").unwrap();

            let converter = ProcessConverter::new(program.to_str().unwrap());
            converter
                .convert(&source, &target, &CancellationToken::new())
                .unwrap();

            assert_eq!(fs::read_to_string(&target).unwrap(), "mycall N0CALL");
        }

        #[test]
        fn failure_carries_status_and_stderr() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(&dir, "echo 'line 3: unknown band' >&2\nexit 4");
            let converter = ProcessConverter::new(program.to_str().unwrap());

            let err = converter
                .convert(
                    Path::new("b.fle"),
                    &dir.path().join("b.adi"),
                    &CancellationToken::new(),
                )
                .unwrap_err();

            match err {
                CoreError::ConversionFailed {
                    source_file,
                    status,
                    stderr,
                } => {
                    assert_eq!(source_file, PathBuf::from("b.fle"));
                    assert_eq!(status, Some(4));
                    assert_eq!(stderr, "line 3: unknown band\n");
                }
                e => panic!("Unexpected error type: {:?}", e),
            }
        }

        #[test]
        fn failure_falls_back_to_stdout() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(&dir, "echo 'parse error'\nexit 1");
            let converter = ProcessConverter::new(program.to_str().unwrap());

            let err = converter
                .convert(
                    Path::new("c.fle"),
                    &dir.path().join("c.adi"),
                    &CancellationToken::new(),
                )
                .unwrap_err();

            match err {
                CoreError::ConversionFailed { stderr, .. } => {
                    assert_eq!(stderr, "parse error\n")
                }
                e => panic!("Unexpected error type: {:?}", e),
            }
        }

        #[test]
        fn signal_death_before_cancel_flag_is_cancellation() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(&dir, "kill -TERM $$");
            let converter = ProcessConverter::new(program.to_str().unwrap());

            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            let handler = thread::spawn(move || {
                thread::sleep(Duration::from_millis(60));
                trigger.cancel();
            });

            let err = converter
                .convert(Path::new("e.fle"), &dir.path().join("e.adi"), &cancel)
                .unwrap_err();
            handler.join().unwrap();

            assert!(matches!(err, CoreError::Cancelled(_)));
        }

        #[test]
        fn signal_death_without_cancel_is_failure() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(&dir, "kill -TERM $$");
            let converter = ProcessConverter::new(program.to_str().unwrap());

            let err = converter
                .convert(
                    Path::new("f.fle"),
                    &dir.path().join("f.adi"),
                    &CancellationToken::new(),
                )
                .unwrap_err();

            match err {
                CoreError::ConversionFailed { status, .. } => assert_eq!(status, None),
                e => panic!("Unexpected error type: {:?}", e),
            }
        }

        #[test]
        fn cancellation_kills_running_converter() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(&dir, "exec sleep 30");
            let converter = ProcessConverter::new(program.to_str().unwrap());

            let cancel = CancellationToken::new();
            let trigger = cancel.clone();
            let canceller = thread::spawn(move || {
                thread::sleep(Duration::from_millis(200));
                trigger.cancel();
            });

            let start = Instant::now();
            let err = converter
                .convert(Path::new("d.fle"), &dir.path().join("d.adi"), &cancel)
                .unwrap_err();
            canceller.join().unwrap();

            assert!(matches!(err, CoreError::Cancelled(_)));
            assert!(start.elapsed() < Duration::from_secs(10));
        }
    }
}
