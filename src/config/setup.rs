use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths};

pub const DEFAULT_MARKER_FILE: &str = "service_account.json";
pub const DEFAULT_CONSOLE_URL: &str = "https://console.cloud.google.com/";

/// Settings for the setup guide.
#[derive(Debug, Clone)]
pub struct SetupSection {
    pub marker_file: PathBuf,
    pub console_url: String,
    pub open_browser: bool,
}

impl SetupSection {
    pub fn defaults_in(project_dir: &Path) -> Self {
        Self {
            marker_file: project_dir.join(DEFAULT_MARKER_FILE),
            console_url: DEFAULT_CONSOLE_URL.to_string(),
            open_browser: true,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSetupSection {
    pub marker_file: Option<PathBuf>,
    pub console_url: Option<String>,
    pub open_browser: Option<bool>,
}

pub fn parse_setup_section(
    raw: Option<RawSetupSection>,
    project_dir: &Path,
    path: &Path,
) -> Result<SetupSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let defaults = SetupSection::defaults_in(project_dir);

    let marker_file = raw
        .marker_file
        .map(|file| paths::resolve_under(project_dir, &file))
        .unwrap_or(defaults.marker_file);

    let console_url = raw.console_url.unwrap_or(defaults.console_url);
    if !console_url.starts_with("https://") {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "setup.console_url",
            message: format!("Console URL must use https: {console_url}"),
        });
    }

    Ok(SetupSection {
        marker_file,
        console_url,
        open_browser: raw.open_browser.unwrap_or(defaults.open_browser),
    })
}
