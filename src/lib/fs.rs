//! File helpers for the artifact and the token cache.

use std::{
    fs::File,
    io::{self, Read, Write},
    path::Path,
};

use sha2::{Digest, Sha256};
use tempfile::NamedTempFile;

use crate::lib::errors::ArtifactError;

/// Size and digest of an artifact about to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactFingerprint {
    pub size_bytes: u64,
    pub sha256: String,
}

/// Return the SHA256 of any file as a hex string.
pub fn compute_sha256(path: &Path) -> Result<String, ArtifactError> {
    let mut file = File::open(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 8192];
    loop {
        let read = file.read(&mut buffer).map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Collect size and SHA256 of an artifact.
pub fn fingerprint(path: &Path) -> Result<ArtifactFingerprint, ArtifactError> {
    let size_bytes = path
        .metadata()
        .map_err(|source| ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        })?
        .len();
    let sha256 = compute_sha256(path)?;
    Ok(ArtifactFingerprint { size_bytes, sha256 })
}

/// Replace `path` with `contents` through a sibling temp file.
///
/// Readers never observe a half-written file. On unix the file is created
/// with owner-only permissions.
pub fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(contents)?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|err| err.error)?;
    Ok(())
}
