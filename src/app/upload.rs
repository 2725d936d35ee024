//! The upload workflow behind `upload-to-drive`.
use std::{io::Write, path::PathBuf, sync::Arc};

use chrono::Local;
use tracing::{info, warn};
use uuid::Uuid;

use super::UploadExit;
use crate::{
    artifact::{ensure_artifact, Availability, BuildRunner, GradleBuildRunner, UploadTarget},
    auth::{CredentialManager, GoogleOAuthClient, TokenCache},
    config::UploaderConfig,
    drive::{DriveApi, GoogleDriveClient},
    lib::{
        browser::{BrowserLauncher, NoBrowser, SystemBrowser},
        console::Console,
        errors::{UploadError, ACCESS_BLOCKED_FIX},
        fs::fingerprint,
        telemetry::StepSpan,
    },
    version::extract_version_info,
};

/// Collaborators of one upload run.
pub struct UploadDeps<'a> {
    pub build: &'a dyn BuildRunner,
    pub credentials: &'a CredentialManager<'a>,
    pub drive: &'a dyn DriveApi,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub remote_name: String,
    pub file_id: String,
    pub web_view_link: Option<String>,
    pub availability: Availability,
    pub artifact_path: PathBuf,
}

/// Make the artifact available, name it, authorize and upload it once.
pub async fn upload_artifact<W: Write>(
    config: &UploaderConfig,
    deps: &UploadDeps<'_>,
    console: &mut Console<W>,
) -> Result<UploadReceipt, UploadError> {
    let run_id = Uuid::new_v4();
    let artifact = &config.paths.artifact;

    let step = StepSpan::start(run_id, "ensure_artifact");
    let availability = match ensure_artifact(artifact, deps.build, console).await {
        Ok(availability) => availability,
        Err(err) => {
            step.finish("failed");
            return Err(err.into());
        }
    };
    if !availability.is_available() {
        step.finish("missing");
        console.line("Failed to build APK");
        return Err(UploadError::ArtifactMissing {
            path: artifact.clone(),
        });
    }
    step.finish("ok");

    let version = extract_version_info(&config.paths.build_script, &config.version);
    match fingerprint(artifact) {
        Ok(fingerprint) => info!(
            target: "apk_drive_upload::run",
            %run_id,
            artifact = %artifact.display(),
            size_bytes = fingerprint.size_bytes,
            sha256 = %fingerprint.sha256,
            "Artifact ready for upload"
        ),
        Err(err) => warn!(
            target: "apk_drive_upload::run",
            %run_id,
            reason = %err,
            "Could not fingerprint artifact"
        ),
    }

    let target = UploadTarget::new(config, &version, Local::now().naive_local());
    console.line(format!("Uploading {} to Google Drive...", target.remote_name));

    let step = StepSpan::start(run_id, "acquire_credential");
    let credential = match deps.credentials.acquire().await {
        Ok(credential) => credential,
        Err(err) => {
            step.finish("failed");
            warn!(
                target: "apk_drive_upload::run",
                %run_id,
                remediation = ACCESS_BLOCKED_FIX.code,
                "No credential available; upload skipped"
            );
            console.line(format!("Authentication failed: {err}"));
            console.blank();
            for line in ACCESS_BLOCKED_FIX.lines() {
                console.line(line);
            }
            return Err(UploadError::AuthorizationUnavailable(err));
        }
    };
    step.finish("ok");

    let step = StepSpan::start(run_id, "upload");
    let remote = match deps.drive.create_file(&credential, &target).await {
        Ok(remote) => remote,
        Err(err) => {
            step.finish("failed");
            return Err(err.into());
        }
    };
    step.finish("ok");

    let link = remote.web_view_link.as_deref().unwrap_or("None");
    console.line("Successfully uploaded to Google Drive!");
    console.line(format!("File: {}", target.remote_name));
    console.line(format!("Link: {link}"));
    console.line(format!("File ID: {}", remote.id));

    Ok(UploadReceipt {
        remote_name: target.remote_name,
        file_id: remote.id,
        web_view_link: remote.web_view_link,
        availability,
        artifact_path: target.artifact_path,
    })
}

/// Banner, workflow and final verdict.
pub async fn run<W: Write>(
    config: &UploaderConfig,
    deps: &UploadDeps<'_>,
    console: &mut Console<W>,
) -> Result<UploadReceipt, UploadExit> {
    console.line("Starting APK upload to Google Drive (OAuth)...");

    match upload_artifact(config, deps, console).await {
        Ok(receipt) => {
            console.line("Upload completed successfully!");
            Ok(receipt)
        }
        Err(err) => {
            if matches!(err, UploadError::Build(_) | UploadError::Drive(_)) {
                console.line(format!("Error uploading to Drive: {err}"));
            }
            warn!(
                target: "apk_drive_upload::run",
                reason = %err,
                "Upload run failed"
            );
            console.line("Upload failed!");
            Err(UploadExit::already_reported())
        }
    }
}

/// Wire the production collaborators from configuration and run.
pub async fn run_with_google<W: Write>(
    config: &UploaderConfig,
    console: &mut Console<W>,
) -> Result<UploadReceipt, UploadExit> {
    let browser: Arc<dyn BrowserLauncher> = if config.auth.open_browser {
        Arc::new(SystemBrowser)
    } else {
        Arc::new(NoBrowser)
    };
    let oauth = GoogleOAuthClient::new(&config.auth, browser);
    let drive = GoogleDriveClient::new(&config.drive);
    let build = GradleBuildRunner::new(&config.paths.project_dir, &config.build);
    let credentials = CredentialManager::new(
        TokenCache::new(&config.auth.token_file),
        &oauth,
        &oauth,
        config.auth.reauthorize_on_refresh_failure,
    );
    let deps = UploadDeps {
        build: &build,
        credentials: &credentials,
        drive: &drive,
    };

    run(config, &deps, console).await
}
