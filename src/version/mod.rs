//! Best-effort extraction of version metadata from the Gradle build script.
//!
//! Version metadata only feeds the remote file name, so nothing here can fail:
//! unreadable files and missing keys fall back to fixed defaults.
use std::{fmt, fs, path::Path};

use tracing::{debug, warn};

use crate::config::VersionKeys;

pub const DEFAULT_BUILD_NUMBER: &str = "1";
pub const DEFAULT_DISPLAY_VERSION: &str = "1.0";

/// Build number and human-readable version of the artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionInfo {
    pub build_number: String,
    pub display_version: String,
}

impl VersionInfo {
    pub fn new(build_number: impl Into<String>, display_version: impl Into<String>) -> Self {
        Self {
            build_number: build_number.into(),
            display_version: display_version.into(),
        }
    }
}

impl Default for VersionInfo {
    fn default() -> Self {
        Self::new(DEFAULT_BUILD_NUMBER, DEFAULT_DISPLAY_VERSION)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{} (build {})", self.display_version, self.build_number)
    }
}

/// Read `path` and extract version info; read errors yield the defaults.
pub fn extract_version_info(path: &Path, keys: &VersionKeys) -> VersionInfo {
    match fs::read_to_string(path) {
        Ok(content) => {
            let info = parse_version_info(&content, keys);
            debug!(
                target: "apk_drive_upload::version",
                path = %path.display(),
                build_number = %info.build_number,
                display_version = %info.display_version,
                "Extracted version info"
            );
            info
        }
        Err(err) => {
            warn!(
                target: "apk_drive_upload::version",
                path = %path.display(),
                reason = %err,
                "Error reading version info; using defaults"
            );
            VersionInfo::default()
        }
    }
}

/// Scan every line; later matches overwrite earlier ones.
///
/// A line matching the build-number token is never considered for the
/// display version. An empty right-hand side is a match like any other.
pub fn parse_version_info(content: &str, keys: &VersionKeys) -> VersionInfo {
    let mut build_number = None;
    let mut display_version = None;

    for line in content.lines() {
        let Some((_, rhs)) = line.split_once('=') else {
            continue;
        };
        if line.contains(keys.build_number_key.as_str()) {
            build_number = Some(rhs.trim().to_string());
        } else if line.contains(keys.display_version_key.as_str()) {
            display_version = Some(strip_quotes(rhs.trim()));
        }
    }

    VersionInfo {
        build_number: build_number.unwrap_or_else(|| DEFAULT_BUILD_NUMBER.to_string()),
        display_version: display_version.unwrap_or_else(|| DEFAULT_DISPLAY_VERSION.to_string()),
    }
}

fn strip_quotes(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, '"' | '\''))
        .collect::<String>()
        .trim()
        .to_string()
}
