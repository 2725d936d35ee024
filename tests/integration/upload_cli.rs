use anyhow::Result;
use apk_drive_upload::auth::{Credential, TokenCache};
use chrono::{Duration, Utc};
use tempfile::tempdir;

use crate::{
    common::{
        run_binary, seed_artifact, seed_project, stderr_of, stdout_of, write_config, UPLOAD_BINARY,
    },
    stub_http::{StubResponse, StubServer},
};

#[cfg(unix)]
#[tokio::test]
async fn failing_build_exits_with_failure() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    let config = write_config(temp.path(), &["false"], "")?;

    let output = run_binary(UPLOAD_BINARY, &config, temp.path()).await?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.starts_with("Starting APK upload to Google Drive (OAuth)..."));
    assert!(stdout.contains("Building APK first..."));
    assert!(stdout.contains("Error uploading to Drive: Build command exited abnormally"));
    assert!(stdout.trim_end().ends_with("Upload failed!"));
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn build_without_artifact_reports_failed_build() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    let config = write_config(temp.path(), &["true"], "")?;

    let output = run_binary(UPLOAD_BINARY, &config, temp.path()).await?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(stdout.contains("Failed to build APK"));
    assert!(!stdout.contains("Uploading "));
    Ok(())
}

#[tokio::test]
async fn missing_client_secret_prints_remediation() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    seed_artifact(temp.path())?;
    let config = write_config(temp.path(), &["./gradlew", "assembleRelease"], "")?;

    let output = run_binary(UPLOAD_BINARY, &config, temp.path()).await?;

    assert_eq!(output.status.code(), Some(1));
    let stdout = stdout_of(&output);
    assert!(!stdout.contains("Building APK first..."));
    assert!(stdout.contains("Uploading SimInfoViewer_v2.3.1_build12_"));
    assert!(stdout.contains("Authentication failed: Failed to load client secret"));
    assert!(stdout.contains("To fix 'Access blocked' error:"));
    assert!(stdout.contains("4. Click 'Add Users' and add your email address"));
    assert!(!temp.path().join("token.json").exists());
    Ok(())
}

#[tokio::test]
async fn invalid_config_exits_before_any_work() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    let config = write_config(temp.path(), &["false"], "\n[drive]\nfolder_id = \"\"\n")?;

    let output = run_binary(UPLOAD_BINARY, &config, temp.path()).await?;

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout_of(&output).is_empty());
    assert!(stderr_of(&output).contains("drive.folder_id"));
    Ok(())
}

#[tokio::test]
async fn cached_token_upload_exits_zero_and_prints_link() -> Result<()> {
    let server = StubServer::start(vec![
        StubResponse::json(200, "").with_header("Location", "{base}/upload-session/1"),
        StubResponse::json(
            200,
            r#"{"id": "1AbC", "webViewLink": "https://drive.google.com/file/d/1AbC/view"}"#,
        ),
    ])
    .await;
    let temp = tempdir()?;
    seed_project(temp.path())?;
    seed_artifact(temp.path())?;
    TokenCache::new(temp.path().join("token.json")).store(&Credential {
        access_token: "ya29.cached".into(),
        refresh_token: Some("1//refresh".into()),
        expiry: Some(Utc::now() + Duration::hours(1)),
        scopes: vec!["https://www.googleapis.com/auth/drive.file".into()],
    })?;
    let drive = format!(
        "\n[drive]\nfolder_id = \"folder-XYZ\"\nupload_base_url = {:?}\n",
        server.base_url
    );
    let config = write_config(temp.path(), &["./gradlew", "assembleRelease"], &drive)?;

    let output = run_binary(UPLOAD_BINARY, &config, temp.path()).await?;

    let stdout = stdout_of(&output);
    assert_eq!(output.status.code(), Some(0), "stdout: {stdout}");
    assert!(!stdout.contains("Building APK first..."));
    assert!(stdout.contains("Successfully uploaded to Google Drive!"));
    assert!(stdout.contains("Link: https://drive.google.com/file/d/1AbC/view"));
    assert!(stdout.contains("File ID: 1AbC"));
    assert!(stdout.trim_end().ends_with("Upload completed successfully!"));

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].header("authorization"), Some("Bearer ya29.cached"));
    let metadata: serde_json::Value = serde_json::from_slice(&requests[0].body)?;
    assert_eq!(metadata["parents"][0], "folder-XYZ");
    assert_eq!(requests[1].body, b"PK\x03\x04release");
    Ok(())
}
