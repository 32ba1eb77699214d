//! Source file handle

use std::path::{Path, PathBuf};

/// A user-selected file, identified by its path and display name.
///
/// The handle is cheap to clone; the payload is only read on demand, once for
/// the preview and again in full for the upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: PathBuf,
    name: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("file")
            .to_string();
        Self { path, name }
    }

    /// Create a handle with a name that differs from the path's file name
    pub fn with_name(path: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared extension, lower-cased, without the dot
    pub fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }

    /// Read the full payload
    pub async fn read_bytes(&self) -> crate::Result<Vec<u8>> {
        Ok(tokio::fs::read(&self.path).await?)
    }

    /// Payload size in bytes
    pub async fn size(&self) -> crate::Result<u64> {
        Ok(tokio::fs::metadata(&self.path).await?.len())
    }
}
