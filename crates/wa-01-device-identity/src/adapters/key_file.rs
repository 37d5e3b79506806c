//! JSON key file adapter.
//!
//! Writes go to a temp file in the same directory and are renamed into
//! place, so a crash never leaves a half-written key file. On Unix the file
//! is mode `0600`.

use crate::domain::errors::IdentityError;
use crate::domain::identity::StoredKeys;
use crate::ports::outbound::KeyPersistence;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Key material stored as pretty-printed JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonKeyFile {
    path: PathBuf,
}

impl JsonKeyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl KeyPersistence for JsonKeyFile {
    fn load(&self) -> Result<Option<StoredKeys>, IdentityError> {
        let data = match std::fs::read(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(IdentityError::Persistence(e)),
        };

        serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| IdentityError::CorruptKeys(e.to_string()))
    }

    fn save(&self, keys: &StoredKeys) -> Result<(), IdentityError> {
        let data =
            serde_json::to_vec_pretty(keys).map_err(|e| IdentityError::Encoding(e.to_string()))?;

        let dir = self.parent_dir();
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        restrict_to_owner(tmp.as_file())?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| IdentityError::Persistence(e.error))?;

        Ok(())
    }
}

#[cfg(unix)]
fn restrict_to_owner(file: &std::fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_file: &std::fs::File) -> std::io::Result<()> {
    Ok(())
}
