//! Artifact availability, build triggering and remote naming.
use std::{io::Write, path::Path};

use tracing::{info, warn};

use crate::lib::{console::Console, errors::BuildError};

mod build;
mod naming;

pub use build::{BuildRunner, GradleBuildRunner};
pub use naming::{compose_remote_name, UploadTarget, TIMESTAMP_FORMAT};

/// Result of the availability check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The artifact existed; no build ran.
    Present,
    /// The artifact was produced by the build.
    Built,
    /// The build exited successfully but produced no artifact.
    Missing,
}

impl Availability {
    pub fn is_available(&self) -> bool {
        !matches!(self, Availability::Missing)
    }
}

/// Make sure the artifact exists, running the build at most once.
///
/// Build failures propagate; a build that succeeds without producing the
/// artifact is reported as `Missing`.
pub async fn ensure_artifact<W: Write>(
    artifact: &Path,
    runner: &dyn BuildRunner,
    console: &mut Console<W>,
) -> Result<Availability, BuildError> {
    if artifact.exists() {
        return Ok(Availability::Present);
    }

    console.line(format!("APK not found at {}", artifact.display()));
    console.line("Building APK first...");
    runner.run_build().await?;

    if artifact.exists() {
        info!(
            target: "apk_drive_upload::build",
            artifact = %artifact.display(),
            "Build produced the artifact"
        );
        Ok(Availability::Built)
    } else {
        warn!(
            target: "apk_drive_upload::build",
            artifact = %artifact.display(),
            "Build finished without producing the artifact"
        );
        Ok(Availability::Missing)
    }
}
