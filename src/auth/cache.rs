use std::{
    fs, io,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Credential;
use crate::lib::{errors::TokenCacheError, fs as cache_fs};

/// Format version written to the token file.
pub const TOKEN_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    version: u32,
    access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<DateTime<Utc>>,
    #[serde(default)]
    scopes: Vec<String>,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: u32,
}

/// Versioned JSON token file kept between runs.
#[derive(Debug, Clone)]
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when the file does not exist.
    pub fn load(&self) -> Result<Option<Credential>, TokenCacheError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(TokenCacheError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let header: VersionHeader =
            serde_json::from_str(&contents).map_err(|source| TokenCacheError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        if header.version != TOKEN_FORMAT_VERSION {
            return Err(TokenCacheError::UnsupportedVersion {
                path: self.path.clone(),
                version: header.version,
            });
        }

        let stored: StoredToken =
            serde_json::from_str(&contents).map_err(|source| TokenCacheError::Malformed {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            target: "apk_drive_upload::auth",
            path = %self.path.display(),
            has_refresh_token = stored.refresh_token.is_some(),
            "Loaded cached token"
        );
        Ok(Some(Credential {
            access_token: stored.access_token,
            refresh_token: stored.refresh_token,
            expiry: stored.expiry,
            scopes: stored.scopes,
        }))
    }

    /// Overwrite the token file with `credential`.
    pub fn store(&self, credential: &Credential) -> Result<(), TokenCacheError> {
        let stored = StoredToken {
            version: TOKEN_FORMAT_VERSION,
            access_token: credential.access_token.clone(),
            refresh_token: credential.refresh_token.clone(),
            expiry: credential.expiry,
            scopes: credential.scopes.clone(),
        };
        let json = serde_json::to_vec_pretty(&stored).map_err(|err| TokenCacheError::Write {
            path: self.path.clone(),
            source: io::Error::new(io::ErrorKind::InvalidData, err),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| TokenCacheError::Write {
                path: self.path.clone(),
                source,
            })?;
        }
        cache_fs::write_atomically(&self.path, &json).map_err(|source| TokenCacheError::Write {
            path: self.path.clone(),
            source,
        })
    }
}
