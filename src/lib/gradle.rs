//! Shared helpers for building the Gradle release command.

use std::path::Path;

use tokio::process::Command;

use crate::lib::errors::BuildError;

pub struct GradleCommandConfig<'a> {
    /// Program followed by its arguments, e.g. `["./gradlew", "assembleRelease"]`.
    pub argv: &'a [String],
    pub project_dir: &'a Path,
}

/// Build the release command. Stdio is inherited so the operator sees build output.
pub fn build_gradle_command(config: GradleCommandConfig<'_>) -> Result<Command, BuildError> {
    let (program, args) = config.argv.split_first().ok_or(BuildError::EmptyCommand)?;
    if program.trim().is_empty() {
        return Err(BuildError::EmptyCommand);
    }

    let mut command = Command::new(program);
    command.kill_on_drop(true);
    command.current_dir(config.project_dir);
    command.args(args);
    Ok(command)
}
