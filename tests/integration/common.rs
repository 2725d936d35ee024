use std::{
    fs,
    path::{Path, PathBuf},
    process::Output,
};

use anyhow::{Context, Result};
use tokio::process::Command;

pub const UPLOAD_BINARY: &str = env!("CARGO_BIN_EXE_upload-to-drive");
pub const SETUP_BINARY: &str = env!("CARGO_BIN_EXE_setup-google-drive");

pub fn fixture(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

/// Lay out an Android-style project with the fixture build script.
pub fn seed_project(root: &Path) -> Result<()> {
    let app_dir = root.join("app");
    fs::create_dir_all(&app_dir).context("failed to create app dir")?;
    fs::copy(
        fixture("tests/fixtures/build.gradle.kts"),
        app_dir.join("build.gradle.kts"),
    )
    .context("failed to copy build script")?;
    Ok(())
}

pub fn artifact_path(root: &Path) -> PathBuf {
    root.join("app/build/outputs/apk/release/app-release.apk")
}

pub fn seed_artifact(root: &Path) -> Result<PathBuf> {
    let artifact = artifact_path(root);
    if let Some(parent) = artifact.parent() {
        fs::create_dir_all(parent).context("failed to create output dir")?;
    }
    fs::write(&artifact, b"PK\x03\x04release").context("failed to write artifact")?;
    Ok(artifact)
}

/// Write a config rooted at `root` with the given build command.
pub fn write_config(root: &Path, build_command: &[&str], extra: &str) -> Result<PathBuf> {
    let command = build_command
        .iter()
        .map(|arg| format!("{arg:?}"))
        .collect::<Vec<_>>()
        .join(", ");
    let contents = format!(
        r#"[paths]
project_dir = {root:?}

[build]
command = [{command}]
timeout_secs = 30

[auth]
open_browser = false
consent_timeout_secs = 1

[setup]
open_browser = false
{extra}"#,
        root = root.display().to_string(),
    );
    let path = root.join("drive_upload.toml");
    fs::write(&path, contents).context("failed to write config")?;
    Ok(path)
}

pub async fn run_binary(binary: &str, config: &Path, cwd: &Path) -> Result<Output> {
    Command::new(binary)
        .arg("--config")
        .arg(config)
        .current_dir(cwd)
        .env_remove("DRIVE_UPLOAD_CONFIG")
        .env("RUST_LOG", "warn")
        .kill_on_drop(true)
        .output()
        .await
        .with_context(|| format!("failed to run {binary}"))
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
