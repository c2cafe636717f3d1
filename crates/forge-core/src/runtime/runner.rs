//! External tool execution with streamed output
//!
//! Package managers, dev servers and bundlers are never linked in; they run
//! as child processes whose stdout/stderr lines are forwarded to a
//! [`ProgressSink`] as they arrive.

use crate::error::{ForgeError, Result};
use crate::progress::ProgressSink;
use std::fmt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines};
use tokio::process::{Child, Command as TokioCommand};
use tokio::task::JoinHandle;
use tokio::time::timeout;

/// Lines of stderr kept for the error of a failed run
const STDERR_TAIL: usize = 20;

/// A program plus arguments, e.g. `npm install`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Kill the child if it is still running after this long
    pub timeout: Option<Duration>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
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

    pub fn timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    fn spawn_child(&self, dir: &Path) -> Result<Child> {
        tracing::debug!(command = %self, dir = %dir.display(), "spawning");
        TokioCommand::new(&self.program)
            .args(&self.args)
            .current_dir(dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| self.failure(None, e.to_string()))
    }

    fn failure(&self, code: Option<i32>, stderr: impl Into<String>) -> ForgeError {
        ForgeError::ExternalTool {
            command: self.to_string(),
            code,
            stderr: stderr.into(),
        }
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

type LineReader<R> = Lines<BufReader<R>>;

fn take_streams(
    cmd: &ToolCommand,
    child: &mut Child,
) -> Result<(
    LineReader<tokio::process::ChildStdout>,
    LineReader<tokio::process::ChildStderr>,
)> {
    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| cmd.failure(None, "stdout was not captured"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| cmd.failure(None, "stderr was not captured"))?;
    Ok((BufReader::new(stdout).lines(), BufReader::new(stderr).lines()))
}

/// Forward both streams until each reaches end of file
///
/// stdout lines are reported as info, stderr lines as warnings. The last
/// stderr lines are kept in `stderr_tail`.
async fn forward_output<O, E>(
    mut stdout: LineReader<O>,
    mut stderr: LineReader<E>,
    sink: &dyn ProgressSink,
    stderr_tail: &mut Vec<String>,
) where
    O: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut stdout_open = true;
    let mut stderr_open = true;
    while stdout_open || stderr_open {
        tokio::select! {
            line = stdout.next_line(), if stdout_open => {
                match line {
                    Ok(Some(line)) => sink.info(&line),
                    Ok(None) => stdout_open = false,
                    Err(e) => {
                        tracing::warn!(error = %e, "error reading stdout");
                        stdout_open = false;
                    }
                }
            }
            line = stderr.next_line(), if stderr_open => {
                match line {
                    Ok(Some(line)) => {
                        sink.warning(&line);
                        if stderr_tail.len() == STDERR_TAIL {
                            stderr_tail.remove(0);
                        }
                        stderr_tail.push(line);
                    }
                    Ok(None) => stderr_open = false,
                    Err(e) => {
                        tracing::warn!(error = %e, "error reading stderr");
                        stderr_open = false;
                    }
                }
            }
        }
    }
}

pub struct ToolRunner;

impl ToolRunner {
    /// Run `cmd` in `dir` to completion, streaming its output to `sink`
    ///
    /// Returns the exit code. A non-zero exit, a spawn failure or an elapsed
    /// timeout (the child is killed) all yield [`ForgeError::ExternalTool`].
    pub async fn run(cmd: &ToolCommand, dir: &Path, sink: &dyn ProgressSink) -> Result<i32> {
        let mut child = cmd.spawn_child(dir)?;
        let (stdout, stderr) = take_streams(cmd, &mut child)?;

        let mut stderr_tail = Vec::new();
        let streaming = forward_output(stdout, stderr, sink, &mut stderr_tail);
        let finished = match cmd.timeout {
            Some(limit) => timeout(limit, streaming).await.is_ok(),
            None => {
                streaming.await;
                true
            }
        };

        if !finished {
            let _ = child.kill().await;
            let secs = cmd.timeout.map(|t| t.as_secs_f64()).unwrap_or_default();
            return Err(cmd.failure(None, format!("timed out after {}s", secs)));
        }

        let status = child
            .wait()
            .await
            .map_err(|e| cmd.failure(None, e.to_string()))?;
        tracing::debug!(command = %cmd, ?status, "finished");

        if status.success() {
            Ok(status.code().unwrap_or(0))
        } else {
            Err(cmd.failure(status.code(), stderr_tail.join("\n")))
        }
    }

    /// Start `cmd` in `dir` and return immediately
    ///
    /// Output is forwarded to `sink` by a background task. Must be called
    /// from within a tokio runtime.
    pub fn spawn(cmd: &ToolCommand, dir: &Path, sink: Arc<dyn ProgressSink>) -> Result<RunningTool> {
        let mut child = cmd.spawn_child(dir)?;
        let (stdout, stderr) = take_streams(cmd, &mut child)?;

        let forward = tokio::spawn(async move {
            let mut stderr_tail = Vec::new();
            forward_output(stdout, stderr, sink.as_ref(), &mut stderr_tail).await;
            stderr_tail
        });

        Ok(RunningTool {
            command: cmd.clone(),
            child,
            forward,
        })
    }
}

/// Handle to a child started by [`ToolRunner::spawn`]
pub struct RunningTool {
    command: ToolCommand,
    child: Child,
    forward: JoinHandle<Vec<String>>,
}

impl RunningTool {
    pub fn command(&self) -> &ToolCommand {
        &self.command
    }

    pub fn id(&self) -> Option<u32> {
        self.child.id()
    }

    /// Exit status if the child has already finished
    pub fn try_status(&mut self) -> Result<Option<ExitStatus>> {
        self.child
            .try_wait()
            .map_err(|e| self.command.failure(None, e.to_string()))
    }

    /// Kill the child; best effort, a child that already exited is fine
    pub async fn stop(&mut self) -> Result<()> {
        if self.try_status()?.is_some() {
            return Ok(());
        }
        tracing::debug!(command = %self.command, "stopping");
        self.child
            .kill()
            .await
            .map_err(|e| self.command.failure(None, e.to_string()))
    }

    /// Wait for the child to exit and its output to drain
    pub async fn wait(mut self) -> Result<i32> {
        let status = self
            .child
            .wait()
            .await
            .map_err(|e| self.command.failure(None, e.to_string()))?;
        let stderr_tail = self.forward.await.unwrap_or_default();
        if status.success() {
            Ok(status.code().unwrap_or(0))
        } else {
            Err(self.command.failure(status.code(), stderr_tail.join("\n")))
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::progress::{Recorder, Severity};

    fn sh(script: &str) -> ToolCommand {
        ToolCommand::new("sh").arg("-c").arg(script)
    }

    #[test]
    fn test_command_display() {
        let cmd = ToolCommand::new("npm").args(["run", "dev"]);
        assert_eq!(cmd.to_string(), "npm run dev");
    }

    #[tokio::test]
    async fn test_run_streams_output_by_severity() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::new();

        let code = ToolRunner::run(&sh("echo hello; echo careful 1>&2"), dir.path(), &recorder)
            .await
            .unwrap();

        assert_eq!(code, 0);
        let lines = recorder.lines();
        assert!(lines.contains(&(Severity::Info, "hello".to_string())));
        assert!(lines.contains(&(Severity::Warning, "careful".to_string())));
    }

    #[tokio::test]
    async fn test_run_reports_exit_code_and_stderr() {
        let dir = tempfile::tempdir().unwrap();

        let err = ToolRunner::run(&sh("echo broken 1>&2; exit 3"), dir.path(), &Recorder::new())
            .await
            .unwrap_err();

        match err {
            ForgeError::ExternalTool { code, stderr, .. } => {
                assert_eq!(code, Some(3));
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_run_kills_on_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = sh("sleep 5").timeout(Duration::from_millis(100));

        let err = ToolRunner::run(&cmd, dir.path(), &Recorder::new()).await.unwrap_err();
        assert!(matches!(err, ForgeError::ExternalTool { code: None, .. }));
    }

    #[tokio::test]
    async fn test_run_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let cmd = ToolCommand::new("definitely-not-a-real-program-tsx-forge");
        assert!(ToolRunner::run(&cmd, dir.path(), &Recorder::new()).await.is_err());
    }

    #[tokio::test]
    async fn test_spawn_then_wait_forwards_output() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder::new());

        let tool = ToolRunner::spawn(&sh("echo started"), dir.path(), recorder.clone()).unwrap();
        assert_eq!(tool.wait().await.unwrap(), 0);
        assert_eq!(recorder.messages(), vec!["started".to_string()]);
    }

    #[tokio::test]
    async fn test_spawn_then_stop() {
        let dir = tempfile::tempdir().unwrap();
        let mut tool = ToolRunner::spawn(&sh("sleep 30"), dir.path(), Arc::new(Recorder::new())).unwrap();

        assert!(tool.try_status().unwrap().is_none());
        tool.stop().await.unwrap();
        assert!(tool.try_status().unwrap().is_some());
    }
}
