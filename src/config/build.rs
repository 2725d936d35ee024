use std::{path::Path, time::Duration};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_BUILD_COMMAND: &[&str] = &["./gradlew", "assembleRelease"];
pub const DEFAULT_BUILD_TIMEOUT_SECS: u64 = 30 * 60;

/// External build invoked when the artifact is missing.
#[derive(Debug, Clone)]
pub struct BuildSection {
    pub command: Vec<String>,
    pub timeout: Duration,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            command: DEFAULT_BUILD_COMMAND
                .iter()
                .map(|arg| arg.to_string())
                .collect(),
            timeout: Duration::from_secs(DEFAULT_BUILD_TIMEOUT_SECS),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawBuildSection {
    pub command: Option<Vec<String>>,
    pub timeout_secs: Option<u64>,
}

pub fn parse_build_section(
    raw: Option<RawBuildSection>,
    path: &Path,
) -> Result<BuildSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = BuildSection::default();

    let command = raw.command.unwrap_or(defaults.command);
    match command.first() {
        Some(program) if !program.trim().is_empty() => {}
        _ => {
            return Err(ConfigError::InvalidField {
                path: path.to_path_buf(),
                field: "build.command",
                message: "Build command must name a program".into(),
            })
        }
    }

    let timeout_secs = raw.timeout_secs.unwrap_or(DEFAULT_BUILD_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "build.timeout_secs",
            message: "Timeout must be at least one second".into(),
        });
    }

    Ok(BuildSection {
        command,
        timeout: Duration::from_secs(timeout_secs),
    })
}
