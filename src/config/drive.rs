use std::{path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::lib::errors::ConfigError;

pub const DEFAULT_FOLDER_ID: &str = "1iAnksDL91fhW2RfHEoG5o9ID6I9BYCp9";
pub const DEFAULT_MIME_TYPE: &str = "application/vnd.android.package-archive";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://www.googleapis.com";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10 * 60;

/// Drive destination and transport settings.
#[derive(Debug, Clone)]
pub struct DriveSection {
    pub folder_id: String,
    pub mime_type: String,
    /// Scheme and host without a trailing slash.
    pub upload_base_url: String,
    pub http_timeout: Duration,
}

impl DriveSection {
    /// Browser link to the destination folder.
    pub fn folder_url(&self) -> String {
        format!("https://drive.google.com/drive/folders/{}", self.folder_id)
    }
}

impl Default for DriveSection {
    fn default() -> Self {
        Self {
            folder_id: DEFAULT_FOLDER_ID.to_string(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawDriveSection {
    pub folder_id: Option<String>,
    pub mime_type: Option<String>,
    pub upload_base_url: Option<String>,
    pub http_timeout_secs: Option<u64>,
}

pub fn parse_drive_section(
    raw: Option<RawDriveSection>,
    path: &Path,
) -> Result<DriveSection, ConfigError> {
    let raw = raw.unwrap_or_default();

    let folder_id = raw
        .folder_id
        .unwrap_or_else(|| DEFAULT_FOLDER_ID.to_string());
    validate_folder_id(path, &folder_id)?;

    let mime_type = raw
        .mime_type
        .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string());
    if !mime_type.contains('/') {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "drive.mime_type",
            message: format!("Not a MIME type: {mime_type}"),
        });
    }

    let raw_url = raw
        .upload_base_url
        .unwrap_or_else(|| DEFAULT_UPLOAD_BASE_URL.to_string());
    let parsed = Url::parse(&raw_url).map_err(|err| ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "drive.upload_base_url",
        message: format!("{raw_url}: {err}"),
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "drive.upload_base_url",
            message: format!("Only http(s) URLs are supported: {raw_url}"),
        });
    }

    let http_timeout_secs = raw.http_timeout_secs.unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS);
    if http_timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "drive.http_timeout_secs",
            message: "Timeout must be at least one second".into(),
        });
    }

    Ok(DriveSection {
        folder_id,
        mime_type,
        upload_base_url: raw_url.trim_end_matches('/').to_string(),
        http_timeout: Duration::from_secs(http_timeout_secs),
    })
}

fn validate_folder_id(path: &Path, folder_id: &str) -> Result<(), ConfigError> {
    if folder_id.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "drive.folder_id",
            message: "Folder ID cannot be empty".into(),
        });
    }
    if !folder_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "drive.folder_id",
            message: format!("Folder ID contains unexpected characters: {folder_id}"),
        });
    }
    Ok(())
}
