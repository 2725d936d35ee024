use std::path::PathBuf;

use chrono::NaiveDateTime;

use crate::{config::UploaderConfig, version::VersionInfo};

/// Second-resolution local timestamp embedded in remote names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Everything the Drive client needs to place the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub artifact_path: PathBuf,
    pub folder_id: String,
    pub remote_name: String,
    pub mime_type: String,
}

impl UploadTarget {
    pub fn new(config: &UploaderConfig, version: &VersionInfo, timestamp: NaiveDateTime) -> Self {
        let extension = config
            .paths
            .artifact
            .extension()
            .and_then(|ext| ext.to_str());
        Self {
            artifact_path: config.paths.artifact.clone(),
            folder_id: config.drive.folder_id.clone(),
            remote_name: compose_remote_name(&config.product_name, version, timestamp, extension),
            mime_type: config.drive.mime_type.clone(),
        }
    }
}

/// `{product}_v{display}_build{build}_{YYYY-MM-DD_HH-MM-SS}[.ext]`.
///
/// Names are not deduplicated; two runs in the same second collide.
pub fn compose_remote_name(
    product: &str,
    version: &VersionInfo,
    timestamp: NaiveDateTime,
    extension: Option<&str>,
) -> String {
    let mut name = format!(
        "{product}_v{}_build{}_{}",
        version.display_version,
        version.build_number,
        timestamp.format(TIMESTAMP_FORMAT)
    );
    if let Some(extension) = extension.filter(|ext| !ext.is_empty()) {
        name.push('.');
        name.push_str(extension);
    }
    name
}
