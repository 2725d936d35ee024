use std::{path::PathBuf, time::Duration};

use async_trait::async_trait;
use tokio::time;
use tracing::info;

use crate::{
    config::BuildSection,
    lib::{errors::BuildError, gradle},
};

/// Produces the artifact by running an external build.
#[async_trait]
pub trait BuildRunner: Send + Sync {
    /// Run the build to completion. `Ok` means the build exited successfully,
    /// not that the artifact exists.
    async fn run_build(&self) -> Result<(), BuildError>;
}

/// Runs the configured Gradle command in the project directory.
#[derive(Debug, Clone)]
pub struct GradleBuildRunner {
    argv: Vec<String>,
    project_dir: PathBuf,
    timeout: Duration,
}

impl GradleBuildRunner {
    pub fn new(project_dir: impl Into<PathBuf>, build: &BuildSection) -> Self {
        Self {
            argv: build.command.clone(),
            project_dir: project_dir.into(),
            timeout: build.timeout,
        }
    }
}

#[async_trait]
impl BuildRunner for GradleBuildRunner {
    async fn run_build(&self) -> Result<(), BuildError> {
        let mut command = gradle::build_gradle_command(gradle::GradleCommandConfig {
            argv: &self.argv,
            project_dir: &self.project_dir,
        })?;

        info!(
            target: "apk_drive_upload::build",
            command = ?self.argv,
            project_dir = %self.project_dir.display(),
            timeout_secs = self.timeout.as_secs(),
            "Starting release build"
        );

        let program = self.argv.first().cloned().unwrap_or_default();
        let status = time::timeout(self.timeout, command.status())
            .await
            .map_err(|_| BuildError::Timeout {
                duration_secs: self.timeout.as_secs(),
            })?
            .map_err(|source| BuildError::Spawn { program, source })?;

        if !status.success() {
            return Err(BuildError::CommandFailed {
                exit_code: status.code(),
            });
        }
        Ok(())
    }
}
