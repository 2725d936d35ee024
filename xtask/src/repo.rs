use std::env;
use std::path::{Path, PathBuf};

/// Walk up from the working directory to the workspace root.
pub fn repo_root() -> anyhow::Result<PathBuf> {
    let mut dir = env::current_dir()?;
    loop {
        if looks_like_workspace_root(&dir) {
            return Ok(dir);
        }
        if !dir.pop() {
            anyhow::bail!("failed to find repository root (no workspace Cargo.toml found)");
        }
    }
}

fn looks_like_workspace_root(dir: &Path) -> bool {
    let manifest = dir.join("Cargo.toml");
    std::fs::read_to_string(manifest)
        .map(|content| content.contains("[workspace]"))
        .unwrap_or(false)
        || dir.join(".git").is_dir()
}
