use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Failures of the external build step. These abort the run.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Build command is empty")]
    EmptyCommand,
    #[error("Failed to launch build command `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Build command exited abnormally (exit={exit_code:?})")]
    CommandFailed { exit_code: Option<i32> },
    #[error("Build timed out after {duration_secs} seconds")]
    Timeout { duration_secs: u64 },
}

/// Errors occurring while inspecting the artifact on disk.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("I/O failed for file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Errors raised by the local token cache.
#[derive(Debug, Error)]
pub enum TokenCacheError {
    #[error("Failed to read token file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write token file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Token file {path} is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Token file {path} has unsupported format version {version}")]
    UnsupportedVersion { path: PathBuf, version: u32 },
}

/// Failures of the OAuth authorization and refresh flows.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Failed to load client secret {path}: {source}")]
    ClientSecret {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to set up the OAuth authenticator: {0}")]
    Setup(#[source] io::Error),
    #[error("Timed out after {duration_secs} seconds waiting for browser consent")]
    ConsentTimeout { duration_secs: u64 },
    #[error("Google rejected the authorization: {reason}")]
    Rejected { reason: String },
    #[error("Google did not accept the refresh token")]
    RefreshRejected,
    #[error("Token refresh did not complete in time")]
    RefreshTimeout,
    #[error("OAuth flow failed: {0}")]
    Flow(#[from] yup_oauth2::Error),
    #[error("Token endpoint returned no access token")]
    MissingAccessToken,
    #[error("Token exchange aborted: {message}")]
    Aborted { message: String },
    #[error("Credential has no refresh token")]
    NotRefreshable,
}

/// Failures of the Drive upload call.
#[derive(Debug, Error)]
pub enum DriveError {
    #[error("Failed to read artifact {path}: {source}")]
    Artifact {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Not a valid MIME type: {mime_type}")]
    MimeType { mime_type: String },
    #[error("Drive API rejected the upload: {message}")]
    Rejected { message: String },
    #[error("Drive request failed: {message}")]
    Request { message: String },
    #[error("Drive did not answer within {duration_secs} seconds")]
    Timeout { duration_secs: u64 },
    #[error("Drive API did not return a file ID")]
    MissingFileId,
}

/// Outcome of a failed upload run, as seen by the top-level driver.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("Artifact {path} is still missing after the build")]
    ArtifactMissing { path: PathBuf },
    #[error("Authentication failed: {0}")]
    AuthorizationUnavailable(#[source] AuthError),
    #[error(transparent)]
    Drive(#[from] DriveError),
}

/// Operator-facing guidance for a known misconfiguration.
#[derive(Debug, Clone, Copy)]
pub struct Remediation {
    /// Stable identifier used in logs.
    pub code: &'static str,
    /// One-line headline.
    pub summary: &'static str,
    /// Ordered steps the operator should follow.
    pub steps: &'static [&'static str],
}

impl Remediation {
    pub const fn new(
        code: &'static str,
        summary: &'static str,
        steps: &'static [&'static str],
    ) -> Self {
        Self {
            code,
            summary,
            steps,
        }
    }

    /// Render the headline followed by numbered steps.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.steps.len() + 1);
        lines.push(self.summary.to_string());
        for (index, step) in self.steps.iter().enumerate() {
            lines.push(format!("{}. {step}", index + 1));
        }
        lines
    }
}

/// Shown before the browser opens for consent.
pub const ACCESS_BLOCKED_HINT: Remediation = Remediation::new(
    "ACCESS_BLOCKED_HINT",
    "If you see 'Access blocked', please:",
    &[
        "Go to Google Cloud Console > OAuth consent screen",
        "Add your email as a test user",
        "Try again",
    ],
);

/// Shown when no credential could be obtained.
pub const ACCESS_BLOCKED_FIX: Remediation = Remediation::new(
    "ACCESS_BLOCKED_FIX",
    "To fix 'Access blocked' error:",
    &[
        "Go to: https://console.cloud.google.com/apis/credentials/consent",
        "Click on your OAuth consent screen",
        "Scroll to 'Test users' section",
        "Click 'Add Users' and add your email address",
        "Save and try again",
    ],
);
