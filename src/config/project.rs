use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, paths};

pub const DEFAULT_PRODUCT_NAME: &str = "SimInfoViewer";
pub const DEFAULT_PROJECT_DIR: &str = ".";
pub const DEFAULT_BUILD_SCRIPT: &str = "app/build.gradle.kts";
pub const DEFAULT_ARTIFACT_PATH: &str = "app/build/outputs/apk/release/app-release.apk";

/// Project layout. `build_script` and `artifact` are already resolved against `project_dir`.
#[derive(Debug, Clone)]
pub struct PathsSection {
    pub project_dir: PathBuf,
    pub build_script: PathBuf,
    pub artifact: PathBuf,
}

impl PathsSection {
    pub fn defaults_in(project_dir: PathBuf) -> Self {
        Self {
            build_script: project_dir.join(DEFAULT_BUILD_SCRIPT),
            artifact: project_dir.join(DEFAULT_ARTIFACT_PATH),
            project_dir,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RawPathsSection {
    pub project_dir: Option<PathBuf>,
    pub build_script: Option<PathBuf>,
    pub artifact: Option<PathBuf>,
}

pub fn parse_product_name(raw: Option<String>, path: &Path) -> Result<String, ConfigError> {
    let name = raw.unwrap_or_else(|| DEFAULT_PRODUCT_NAME.to_string());
    if name.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "product_name",
            message: "Product name cannot be empty".into(),
        });
    }
    if name.contains(['/', '\\']) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "product_name",
            message: format!("Product name cannot contain path separators: {name}"),
        });
    }
    Ok(name)
}

pub fn parse_paths_section(
    raw: Option<RawPathsSection>,
    path: &Path,
) -> Result<PathsSection, ConfigError> {
    let raw = raw.unwrap_or_default();

    let project_dir = raw
        .project_dir
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROJECT_DIR));
    if paths::is_empty(&project_dir) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "paths.project_dir",
            message: "Project directory cannot be empty".into(),
        });
    }

    let build_script = raw
        .build_script
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_SCRIPT));
    let artifact = raw
        .artifact
        .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTIFACT_PATH));
    if paths::is_empty(&artifact) {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "paths.artifact",
            message: "Artifact path cannot be empty".into(),
        });
    }

    Ok(PathsSection {
        build_script: paths::resolve_under(&project_dir, &build_script),
        artifact: paths::resolve_under(&project_dir, &artifact),
        project_dir,
    })
}
