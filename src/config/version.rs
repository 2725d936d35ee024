use std::path::Path;

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_BUILD_NUMBER_KEY: &str = "versionCode";
pub const DEFAULT_DISPLAY_VERSION_KEY: &str = "versionName";

/// Tokens recognized as substrings when scanning the build script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionKeys {
    pub build_number_key: String,
    pub display_version_key: String,
}

impl Default for VersionKeys {
    fn default() -> Self {
        Self {
            build_number_key: DEFAULT_BUILD_NUMBER_KEY.to_string(),
            display_version_key: DEFAULT_DISPLAY_VERSION_KEY.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawVersionSection {
    pub build_number_key: Option<String>,
    pub display_version_key: Option<String>,
}

pub fn parse_version_section(
    raw: Option<RawVersionSection>,
    path: &Path,
) -> Result<VersionKeys, ConfigError> {
    let raw = raw.unwrap_or_default();
    let build_number_key = raw
        .build_number_key
        .unwrap_or_else(|| DEFAULT_BUILD_NUMBER_KEY.to_string());
    validate_key(path, "version.build_number_key", &build_number_key)?;

    let display_version_key = raw
        .display_version_key
        .unwrap_or_else(|| DEFAULT_DISPLAY_VERSION_KEY.to_string());
    validate_key(path, "version.display_version_key", &display_version_key)?;

    Ok(VersionKeys {
        build_number_key,
        display_version_key,
    })
}

fn validate_key(path: &Path, field: &'static str, key: &str) -> Result<(), ConfigError> {
    if key.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field,
            message: "Key token cannot be empty".into(),
        });
    }
    if key.contains('=') {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field,
            message: format!("Key token cannot contain '=': {key}"),
        });
    }
    Ok(())
}
