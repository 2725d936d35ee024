//! Command-line arguments of the two binaries.
use std::path::PathBuf;

use clap::Parser;

/// Arguments of `upload-to-drive`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "upload-to-drive",
    author,
    version,
    about = "Upload the release APK to Google Drive with a versioned, timestamped name",
    long_about = None
)]
pub struct UploadArgs {
    /// Path to a TOML config file (overrides DRIVE_UPLOAD_CONFIG).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
}

/// Arguments of `setup-google-drive`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "setup-google-drive",
    author,
    version,
    about = "Walk through configuring Google Drive API access",
    long_about = None
)]
pub struct SetupArgs {
    /// Path to a TOML config file (overrides DRIVE_UPLOAD_CONFIG).
    #[arg(long = "config")]
    pub config_override: Option<PathBuf>,
}
