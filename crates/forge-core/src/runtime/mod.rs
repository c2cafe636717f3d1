//! Toolchain detection and package-manager orchestration
//!
//! This module provides:
//! - Node.js / package manager detection
//! - Streaming execution of external tools
//! - Installing dependencies and starting the dev server of an export

pub mod check;
pub mod package_manager;
pub mod runner;

pub use check::{check_node, check_package_manager, check_toolchain, ToolInfo};
pub use package_manager::{dev_script, dev_server_url, PackageManager};
pub use runner::{RunningTool, ToolCommand, ToolRunner};

use crate::error::Result;
use crate::progress::ProgressSink;
use crate::scaffold::Target;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Timeout for dependency installation (10 minutes)
pub const INSTALL_TIMEOUT: Duration = Duration::from_secs(600);

/// Install the dependencies of an exported project and wait for completion
pub async fn install_dependencies(
    project_dir: &Path,
    manager: PackageManager,
    progress: &dyn ProgressSink,
) -> Result<()> {
    let cmd = manager.install_command().timeout(INSTALL_TIMEOUT);
    run_install(&cmd, project_dir, progress).await
}

async fn run_install(cmd: &ToolCommand, project_dir: &Path, progress: &dyn ProgressSink) -> Result<()> {
    progress.info(&format!("Installing dependencies ({})...", cmd));
    ToolRunner::run(cmd, project_dir, progress).await?;
    progress.success("Dependencies installed successfully!");
    Ok(())
}

/// Start the dev server of an exported project without waiting for it
///
/// The returned handle keeps the server alive; dropping it kills the child.
/// With `open_browser` the local URL is opened in the default browser; a
/// failure to open is reported but does not stop the server.
pub fn start_dev_server(
    project_dir: &Path,
    manager: PackageManager,
    target: Target,
    open_browser: bool,
    progress: Arc<dyn ProgressSink>,
) -> Result<RunningTool> {
    let cmd = manager.dev_server_command(target);
    spawn_dev_server(&cmd, dev_server_url(target), project_dir, open_browser, progress)
}

fn spawn_dev_server(
    cmd: &ToolCommand,
    url: &str,
    project_dir: &Path,
    open_browser: bool,
    progress: Arc<dyn ProgressSink>,
) -> Result<RunningTool> {
    progress.info(&format!("Starting development server ({})...", cmd));
    let tool = ToolRunner::spawn(cmd, project_dir, progress.clone())?;

    progress.success(&format!("Development server starting at {}", url));
    if open_browser {
        if let Err(e) = open::that(url) {
            tracing::warn!(error = %e, url, "could not open browser");
            progress.warning(&format!("Could not open {}: {}", url, e));
        }
    }
    Ok(tool)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::error::ForgeError;
    use crate::progress::Recorder;

    fn sh(script: &str) -> ToolCommand {
        ToolCommand::new("sh").arg("-c").arg(script)
    }

    #[tokio::test]
    async fn test_install_waits_for_completion() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::new();

        run_install(&sh("sleep 0.1; echo added 3 packages > installed.txt"), dir.path(), &recorder)
            .await
            .unwrap();

        assert!(dir.path().join("installed.txt").exists());
        let messages = recorder.messages();
        assert!(messages[0].starts_with("Installing dependencies (sh -c"));
        assert_eq!(messages.last().unwrap(), "Dependencies installed successfully!");
    }

    #[tokio::test]
    async fn test_install_failure_is_an_external_tool_error() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Recorder::new();

        let err = run_install(&sh("echo ERR! missing peer 1>&2; exit 1"), dir.path(), &recorder)
            .await
            .unwrap_err();

        match err {
            ForgeError::ExternalTool { code, stderr, .. } => {
                assert_eq!(code, Some(1));
                assert!(stderr.contains("missing peer"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!recorder
            .messages()
            .contains(&"Dependencies installed successfully!".to_string()));
    }

    #[tokio::test]
    async fn test_dev_server_returns_while_still_running() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = Arc::new(Recorder::new());

        let mut tool = spawn_dev_server(
            &sh("echo ready; sleep 30"),
            "http://localhost:3000",
            dir.path(),
            false,
            recorder.clone(),
        )
        .unwrap();

        assert!(tool.try_status().unwrap().is_none());
        assert!(recorder
            .messages()
            .contains(&"Development server starting at http://localhost:3000".to_string()));

        tool.stop().await.unwrap();
        assert!(tool.try_status().unwrap().is_some());
    }
}
