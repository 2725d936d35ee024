//! Config source resolution.
use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::config::{ConfigSource, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

/// Resolve the config source in the order: CLI override → env var → default.
pub fn resolve_config_source(override_path: Option<PathBuf>) -> Result<ConfigSource> {
    let cwd = env::current_dir().context("failed to obtain current directory")?;
    let from_env = env::var_os(CONFIG_ENV_KEY)
        .filter(|value| !value.is_empty())
        .map(PathBuf::from);
    Ok(select_config_source(override_path, from_env, &cwd))
}

/// Pure half of [`resolve_config_source`].
pub fn select_config_source(
    override_path: Option<PathBuf>,
    from_env: Option<PathBuf>,
    cwd: &Path,
) -> ConfigSource {
    let absolute = |path: PathBuf| {
        if path.is_absolute() {
            path
        } else {
            cwd.join(path)
        }
    };
    match override_path.or(from_env) {
        Some(path) => ConfigSource::Explicit(absolute(path)),
        None => ConfigSource::Default(absolute(PathBuf::from(DEFAULT_CONFIG_PATH))),
    }
}
