//! Google Drive v3 file creation.
use async_trait::async_trait;

use crate::{artifact::UploadTarget, auth::Credential, lib::errors::DriveError};

mod client;

pub use client::GoogleDriveClient;

/// The created file as reported by Drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    pub id: String,
    pub web_view_link: Option<String>,
}

/// Seam between the upload workflow and the Drive API.
#[async_trait]
pub trait DriveApi: Send + Sync {
    /// Create one file in the target folder. Never retried.
    async fn create_file(
        &self,
        credential: &Credential,
        target: &UploadTarget,
    ) -> Result<RemoteFile, DriveError>;
}
