use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths};

pub const DEFAULT_CLIENT_SECRET_FILE: &str = "credentials.json";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";
pub const DEFAULT_SCOPES: &[&str] = &["https://www.googleapis.com/auth/drive.file"];
pub const DEFAULT_CONSENT_TIMEOUT_SECS: u64 = 5 * 60;

/// OAuth settings. File paths are resolved against the project directory.
#[derive(Debug, Clone)]
pub struct AuthSection {
    pub client_secret_file: PathBuf,
    pub token_file: PathBuf,
    pub scopes: Vec<String>,
    pub consent_timeout: Duration,
    pub reauthorize_on_refresh_failure: bool,
    pub open_browser: bool,
}

impl AuthSection {
    pub fn defaults_in(project_dir: &Path) -> Self {
        Self {
            client_secret_file: project_dir.join(DEFAULT_CLIENT_SECRET_FILE),
            token_file: project_dir.join(DEFAULT_TOKEN_FILE),
            scopes: DEFAULT_SCOPES.iter().map(|scope| scope.to_string()).collect(),
            consent_timeout: Duration::from_secs(DEFAULT_CONSENT_TIMEOUT_SECS),
            reauthorize_on_refresh_failure: true,
            open_browser: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawAuthSection {
    pub client_secret_file: Option<PathBuf>,
    pub token_file: Option<PathBuf>,
    pub scopes: Option<Vec<String>>,
    pub consent_timeout_secs: Option<u64>,
    pub reauthorize_on_refresh_failure: Option<bool>,
    pub open_browser: Option<bool>,
}

pub fn parse_auth_section(
    raw: Option<RawAuthSection>,
    project_dir: &Path,
    path: &Path,
) -> Result<AuthSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = AuthSection::defaults_in(project_dir);

    let client_secret_file = raw
        .client_secret_file
        .map(|file| paths::resolve_under(project_dir, &file))
        .unwrap_or(defaults.client_secret_file);
    let token_file = raw
        .token_file
        .map(|file| paths::resolve_under(project_dir, &file))
        .unwrap_or(defaults.token_file);
    if token_file == client_secret_file {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "auth.token_file",
            message: "Token file must differ from the client secret file".into(),
        });
    }

    let scopes = raw.scopes.unwrap_or(defaults.scopes);
    if scopes.is_empty() || scopes.iter().any(|scope| scope.trim().is_empty()) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "auth.scopes",
            message: "At least one non-empty scope is required".into(),
        });
    }

    let consent_timeout_secs = raw
        .consent_timeout_secs
        .unwrap_or(DEFAULT_CONSENT_TIMEOUT_SECS);
    if consent_timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "auth.consent_timeout_secs",
            message: "Timeout must be at least one second".into(),
        });
    }

    Ok(AuthSection {
        client_secret_file,
        token_file,
        scopes,
        consent_timeout: Duration::from_secs(consent_timeout_secs),
        reauthorize_on_refresh_failure: raw
            .reauthorize_on_refresh_failure
            .unwrap_or(defaults.reauthorize_on_refresh_failure),
        open_browser: raw.open_browser.unwrap_or(defaults.open_browser),
    })
}
