use std::{fs::File, time::Duration};

use async_trait::async_trait;
use google_drive3::{
    api::{File as DriveFile, Scope},
    hyper::{self, client::HttpConnector},
    hyper_rustls::{self, HttpsConnector},
    DriveHub, Error as ApiError,
};
use serde_json::Value;
use tracing::{debug, info};

use super::{DriveApi, RemoteFile};
use crate::{
    artifact::UploadTarget, auth::Credential, config::DriveSection, lib::errors::DriveError,
};

const RESPONSE_FIELDS: &str = "id,webViewLink";

type Connector = HttpsConnector<HttpConnector>;

/// Drive v3 client using the resumable upload protocol.
pub struct GoogleDriveClient {
    http: hyper::Client<Connector>,
    root_url: String,
    http_timeout: Duration,
}

impl GoogleDriveClient {
    pub fn new(drive: &DriveSection) -> Self {
        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .expect("failed to load native TLS root certificates")
            .https_or_http()
            .enable_http1()
            .build();
        Self {
            http: hyper::Client::builder().build(connector),
            root_url: format!("{}/", drive.upload_base_url),
            http_timeout: drive.http_timeout,
        }
    }

    /// One hub per call; the hub authorizes with the given access token.
    fn hub(&self, credential: &Credential) -> DriveHub<Connector> {
        let mut hub = DriveHub::new(self.http.clone(), credential.access_token.clone());
        hub.root_url(self.root_url.clone());
        hub.base_url(format!("{}drive/v3/", self.root_url));
        hub
    }
}

#[async_trait]
impl DriveApi for GoogleDriveClient {
    async fn create_file(
        &self,
        credential: &Credential,
        target: &UploadTarget,
    ) -> Result<RemoteFile, DriveError> {
        let mime_type: mime::Mime = target.mime_type.parse().map_err(|_| DriveError::MimeType {
            mime_type: target.mime_type.clone(),
        })?;
        let artifact_error = |source| DriveError::Artifact {
            path: target.artifact_path.clone(),
            source,
        };
        let reader = File::open(&target.artifact_path).map_err(artifact_error)?;
        let size_bytes = reader.metadata().map_err(artifact_error)?.len();

        let metadata = DriveFile {
            name: Some(target.remote_name.clone()),
            parents: Some(vec![target.folder_id.clone()]),
            ..DriveFile::default()
        };
        debug!(
            target: "apk_drive_upload::drive",
            remote_name = %target.remote_name,
            size_bytes,
            "Starting resumable upload"
        );

        let hub = self.hub(credential);
        let call = hub
            .files()
            .create(metadata)
            .param("fields", RESPONSE_FIELDS)
            .add_scope(Scope::File)
            .upload_resumable(reader, mime_type);
        let (_, created) = tokio::time::timeout(self.http_timeout, call)
            .await
            .map_err(|_| DriveError::Timeout {
                duration_secs: self.http_timeout.as_secs(),
            })?
            .map_err(describe_api_error)?;

        let remote = RemoteFile {
            id: created.id.ok_or(DriveError::MissingFileId)?,
            web_view_link: created.web_view_link,
        };
        info!(
            target: "apk_drive_upload::drive",
            file_id = %remote.id,
            remote_name = %target.remote_name,
            size_bytes,
            "Uploaded artifact to Drive"
        );
        Ok(remote)
    }
}

/// Prefer the message of Google's `{"error": {"message": ..}}` envelope.
fn describe_api_error(err: ApiError) -> DriveError {
    match err {
        ApiError::BadRequest(body) => DriveError::Rejected {
            message: body
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string()),
        },
        ApiError::Failure(response) => DriveError::Rejected {
            message: format!("HTTP {}", response.status()),
        },
        other => DriveError::Request {
            message: other.to_string(),
        },
    }
}
