use tracing::info;

use super::UploaderConfig;

pub fn log_loaded(config: &UploaderConfig) {
    let source = config
        .source_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "<built-in defaults>".to_string());
    info!(
        target: "apk_drive_upload::config",
        source = %source,
        project_dir = %config.paths.project_dir.display(),
        artifact = %config.paths.artifact.display(),
        folder_id = %config.drive.folder_id,
        build_timeout_secs = config.build.timeout.as_secs(),
        consent_timeout_secs = config.auth.consent_timeout.as_secs(),
        "Configuration loaded successfully"
    );
}
