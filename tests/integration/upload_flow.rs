use std::{
    fs,
    sync::atomic::{AtomicUsize, Ordering},
};

use anyhow::Result;
use apk_drive_upload::{
    app::{self, UploadDeps},
    artifact::{Availability, BuildRunner, UploadTarget},
    auth::{Credential, CredentialManager, InteractiveAuthorizer, TokenCache, TokenRefresher},
    config::UploaderConfig,
    drive::{DriveApi, RemoteFile},
    lib::{
        console::Console,
        errors::{AuthError, BuildError, DriveError},
    },
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tempfile::tempdir;

use crate::common::{artifact_path, seed_artifact, seed_project};

struct WritesArtifact {
    calls: AtomicUsize,
    output: Option<std::path::PathBuf>,
}

#[async_trait]
impl BuildRunner for WritesArtifact {
    async fn run_build(&self) -> Result<(), BuildError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(path) = &self.output {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).expect("can create output dir");
            }
            fs::write(path, b"PK\x03\x04built").expect("can write artifact");
        }
        Ok(())
    }
}

fn no_build() -> WritesArtifact {
    WritesArtifact {
        calls: AtomicUsize::new(0),
        output: None,
    }
}

struct Oauth {
    grant: bool,
    authorizations: AtomicUsize,
}

#[async_trait]
impl TokenRefresher for Oauth {
    async fn refresh(&self, _credential: &Credential) -> Result<Credential, AuthError> {
        Err(AuthError::NotRefreshable)
    }
}

#[async_trait]
impl InteractiveAuthorizer for Oauth {
    async fn authorize(&self) -> Result<Credential, AuthError> {
        self.authorizations.fetch_add(1, Ordering::SeqCst);
        if self.grant {
            Ok(token("ya29.consented"))
        } else {
            Err(AuthError::Rejected {
                reason: "access_denied".into(),
            })
        }
    }
}

fn oauth(grant: bool) -> Oauth {
    Oauth {
        grant,
        authorizations: AtomicUsize::new(0),
    }
}

fn token(access: &str) -> Credential {
    Credential {
        access_token: access.into(),
        refresh_token: Some("1//refresh".into()),
        expiry: Some(Utc::now() + Duration::hours(1)),
        scopes: vec!["https://www.googleapis.com/auth/drive.file".into()],
    }
}

#[derive(Default)]
struct Drive {
    fail: bool,
    uploads: std::sync::Mutex<Vec<(String, UploadTarget)>>,
}

#[async_trait]
impl DriveApi for Drive {
    async fn create_file(
        &self,
        credential: &Credential,
        target: &UploadTarget,
    ) -> Result<RemoteFile, DriveError> {
        self.uploads
            .lock()
            .expect("lock")
            .push((credential.access_token.clone(), target.clone()));
        if self.fail {
            return Err(DriveError::Rejected {
                message: "backend error".into(),
            });
        }
        Ok(RemoteFile {
            id: "1AbC".into(),
            web_view_link: Some("https://drive.google.com/file/d/1AbC/view".into()),
        })
    }
}

/// `SimInfoViewer_v2.3.1_build12_YYYY-MM-DD_HH-MM-SS.apk`
fn assert_remote_name(name: &str) {
    let stamp = name
        .strip_prefix("SimInfoViewer_v2.3.1_build12_")
        .and_then(|rest| rest.strip_suffix(".apk"))
        .unwrap_or_else(|| panic!("unexpected remote name {name}"));
    assert_eq!(stamp.len(), 19, "timestamp in {name}");
    for (index, ch) in stamp.chars().enumerate() {
        match index {
            4 | 7 | 13 | 16 => assert_eq!(ch, '-', "{name}"),
            10 => assert_eq!(ch, '_', "{name}"),
            _ => assert!(ch.is_ascii_digit(), "{name}"),
        }
    }
}

#[tokio::test]
async fn cached_token_uploads_once_without_consent() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    seed_artifact(temp.path())?;
    let config = UploaderConfig::defaults_in(temp.path());
    let cache = TokenCache::new(&config.auth.token_file);
    cache.store(&token("ya29.cached"))?;

    let build = no_build();
    let oauth = oauth(false);
    let drive = Drive::default();
    let credentials = CredentialManager::new(cache, &oauth, &oauth, true);
    let deps = UploadDeps {
        build: &build,
        credentials: &credentials,
        drive: &drive,
    };
    let mut console = Console::buffer();

    let receipt = app::run(&config, &deps, &mut console)
        .await
        .expect("upload succeeds");

    assert_remote_name(&receipt.remote_name);
    assert_eq!(receipt.availability, Availability::Present);
    assert_eq!(receipt.file_id, "1AbC");
    assert_eq!(build.calls.load(Ordering::SeqCst), 0);
    assert_eq!(oauth.authorizations.load(Ordering::SeqCst), 0);

    let uploads = drive.uploads.lock().expect("lock");
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].0, "ya29.cached");
    assert_eq!(uploads[0].1.folder_id, "1iAnksDL91fhW2RfHEoG5o9ID6I9BYCp9");
    assert_eq!(
        uploads[0].1.mime_type,
        "application/vnd.android.package-archive"
    );

    let output = console.contents();
    assert!(output.starts_with("Starting APK upload to Google Drive (OAuth)...\n"));
    assert!(output.contains("Link: https://drive.google.com/file/d/1AbC/view"));
    assert!(output.contains("File ID: 1AbC"));
    assert!(output.trim_end().ends_with("Upload completed successfully!"));
    Ok(())
}

#[tokio::test]
async fn missing_artifact_is_built_then_uploaded() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    let config = UploaderConfig::defaults_in(temp.path());
    let build = WritesArtifact {
        calls: AtomicUsize::new(0),
        output: Some(artifact_path(temp.path())),
    };
    let oauth = oauth(true);
    let drive = Drive::default();
    let credentials = CredentialManager::new(
        TokenCache::new(&config.auth.token_file),
        &oauth,
        &oauth,
        true,
    );
    let deps = UploadDeps {
        build: &build,
        credentials: &credentials,
        drive: &drive,
    };
    let mut console = Console::buffer();

    let receipt = app::run(&config, &deps, &mut console)
        .await
        .expect("upload succeeds");

    assert_eq!(receipt.availability, Availability::Built);
    assert_eq!(build.calls.load(Ordering::SeqCst), 1);
    assert_eq!(oauth.authorizations.load(Ordering::SeqCst), 1);
    assert!(
        config.auth.token_file.exists(),
        "consented token is persisted for the next run"
    );
    Ok(())
}

#[tokio::test]
async fn drive_failure_is_reported_once_without_retry() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    seed_artifact(temp.path())?;
    let config = UploaderConfig::defaults_in(temp.path());
    TokenCache::new(&config.auth.token_file).store(&token("ya29.cached"))?;

    let build = no_build();
    let oauth = oauth(false);
    let drive = Drive {
        fail: true,
        ..Drive::default()
    };
    let credentials = CredentialManager::new(
        TokenCache::new(&config.auth.token_file),
        &oauth,
        &oauth,
        true,
    );
    let deps = UploadDeps {
        build: &build,
        credentials: &credentials,
        drive: &drive,
    };
    let mut console = Console::buffer();

    let exit = app::run(&config, &deps, &mut console)
        .await
        .expect_err("upload fails");

    assert!(exit.message().is_none());
    assert_eq!(drive.uploads.lock().expect("lock").len(), 1);
    let output = console.contents();
    assert!(output.contains("Error uploading to Drive: Drive API rejected the upload: backend error"));
    assert!(output.trim_end().ends_with("Upload failed!"));
    Ok(())
}

#[tokio::test]
async fn denied_consent_skips_upload_and_prints_fix() -> Result<()> {
    let temp = tempdir()?;
    seed_project(temp.path())?;
    seed_artifact(temp.path())?;
    let config = UploaderConfig::defaults_in(temp.path());

    let build = no_build();
    let oauth = oauth(false);
    let drive = Drive::default();
    let credentials = CredentialManager::new(
        TokenCache::new(&config.auth.token_file),
        &oauth,
        &oauth,
        true,
    );
    let deps = UploadDeps {
        build: &build,
        credentials: &credentials,
        drive: &drive,
    };
    let mut console = Console::buffer();

    app::run(&config, &deps, &mut console)
        .await
        .expect_err("no credential");

    assert!(drive.uploads.lock().expect("lock").is_empty());
    assert!(!config.auth.token_file.exists());
    let output = console.contents();
    assert!(output
        .contains("Authentication failed: Google rejected the authorization: access_denied"));
    assert!(output.contains("To fix 'Access blocked' error:"));
    assert!(output.contains("1. Go to: https://console.cloud.google.com/apis/credentials/consent"));
    Ok(())
}
