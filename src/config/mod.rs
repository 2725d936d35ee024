//! Load and validate uploader configuration.
//!
//! Every key is optional; a missing key falls back to a built-in constant,
//! so running without any configuration file uses the fixed defaults.
use std::path::{Path, PathBuf};

use config::FileFormat;
use serde::Deserialize;
use tracing::{error, info};

use crate::lib::errors::ConfigError;

pub mod auth;
pub mod build;
pub mod drive;
pub mod project;
pub mod setup;
pub mod telemetry;
pub mod version;

pub use auth::{parse_auth_section, AuthSection, RawAuthSection};
pub use build::{parse_build_section, BuildSection, RawBuildSection, DEFAULT_BUILD_COMMAND};
pub use drive::{parse_drive_section, DriveSection, RawDriveSection, DEFAULT_FOLDER_ID};
pub use project::{
    parse_paths_section, parse_product_name, PathsSection, RawPathsSection, DEFAULT_PRODUCT_NAME,
};
pub use setup::{parse_setup_section, RawSetupSection, SetupSection};
pub use version::{parse_version_section, RawVersionSection, VersionKeys};

pub const CONFIG_ENV_KEY: &str = "DRIVE_UPLOAD_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "drive_upload.toml";

/// Where the configuration file comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by `--config` or `DRIVE_UPLOAD_CONFIG`; must exist.
    Explicit(PathBuf),
    /// The conventional file in the working directory; may be absent.
    Default(PathBuf),
}

impl ConfigSource {
    pub fn path(&self) -> &Path {
        match self {
            ConfigSource::Explicit(path) | ConfigSource::Default(path) => path,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, ConfigSource::Explicit(_))
    }
}

/// Top-level configuration container shared by both binaries.
#[derive(Debug, Clone)]
pub struct UploaderConfig {
    pub product_name: String,
    pub paths: PathsSection,
    pub version: VersionKeys,
    pub build: BuildSection,
    pub auth: AuthSection,
    pub drive: DriveSection,
    pub setup: SetupSection,
    pub source_path: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
struct RawUploaderConfig {
    product_name: Option<String>,
    paths: Option<RawPathsSection>,
    version: Option<RawVersionSection>,
    build: Option<RawBuildSection>,
    auth: Option<RawAuthSection>,
    drive: Option<RawDriveSection>,
    setup: Option<RawSetupSection>,
}

impl UploaderConfig {
    /// Built-in configuration with every path rooted at `project_dir`.
    pub fn defaults_in(project_dir: impl Into<PathBuf>) -> Self {
        let project_dir = project_dir.into();
        Self {
            product_name: DEFAULT_PRODUCT_NAME.to_string(),
            version: VersionKeys::default(),
            build: BuildSection::default(),
            auth: AuthSection::defaults_in(&project_dir),
            drive: DriveSection::default(),
            setup: SetupSection::defaults_in(&project_dir),
            paths: PathsSection::defaults_in(project_dir),
            source_path: None,
        }
    }

    /// Load configuration from the resolved source.
    pub fn load(source: &ConfigSource) -> Result<Self, ConfigError> {
        let path = source.path().to_path_buf();
        info!(
            target: "apk_drive_upload::config",
            path = %path.display(),
            required = source.is_required(),
            "Starting configuration load"
        );

        let file_present = path.is_file();
        let builder = config::Config::builder().add_source(
            config::File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(source.is_required()),
        );
        let document = builder.build().map_err(|err| {
            let error = ConfigError::from_read_error(path.clone(), err);
            error!(
                target: "apk_drive_upload::config",
                path = %path.display(),
                reason = %error,
                "Failed to read configuration file"
            );
            error
        })?;

        let raw: RawUploaderConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "apk_drive_upload::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let source_path = file_present.then(|| path.clone());
        let config = Self::from_raw(raw, &path, source_path).map_err(|err| {
            error!(
                target: "apk_drive_upload::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    fn from_raw(
        raw: RawUploaderConfig,
        path: &Path,
        source_path: Option<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let product_name = parse_product_name(raw.product_name, path)?;
        let paths = parse_paths_section(raw.paths, path)?;
        let version = parse_version_section(raw.version, path)?;
        let build = parse_build_section(raw.build, path)?;
        let auth = parse_auth_section(raw.auth, &paths.project_dir, path)?;
        let drive = parse_drive_section(raw.drive, path)?;
        let setup = parse_setup_section(raw.setup, &paths.project_dir, path)?;

        Ok(Self {
            product_name,
            paths,
            version,
            build,
            auth,
            drive,
            setup,
            source_path,
        })
    }
}
