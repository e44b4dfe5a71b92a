use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use tempfile::NamedTempFile;
use tracing::warn;

/// An uploaded PDF persisted for the duration of one request.
///
/// The file is removed when this value is dropped, on every exit path.
pub struct ScopedUpload {
    file: NamedTempFile,
}

impl ScopedUpload {
    pub fn create(bytes: &[u8]) -> Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("cv-")
            .suffix(".pdf")
            .tempfile()
            .context("failed to create temporary file")?;

        file.write_all(bytes)
            .and_then(|()| file.flush())
            .context("failed to write temporary file")?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Removes the file now, logging instead of failing if removal goes wrong.
    pub fn close(self) {
        let path = self.file.path().to_path_buf();
        if let Err(e) = self.file.close() {
            warn!("Failed to remove temporary upload {}: {e}", path.display());
        }
    }
}
