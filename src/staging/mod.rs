//! Scoped on-disk staging for uploaded images.
//!
//! Every upload is streamed into its own uniquely named temporary file under
//! the configured staging directory. The file belongs to exactly one request
//! and is removed when the [`StagedImage`] goes away: explicitly through
//! [`StagedImage::close`] on the normal paths, or by its destructor when the
//! handler bails out early, panics or is cancelled because the client hung up.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::StagingConfig;
use crate::error::Result;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

const FILE_PREFIX: &str = "upload-";

/// Creates staging files in one directory.
#[derive(Debug, Clone)]
pub struct Stager {
    directory: PathBuf,
}

impl Stager {
    pub fn new(config: &StagingConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Start a new staged upload.
    pub fn create(
        &self,
        content_type: Option<String>,
        file_name: Option<String>,
    ) -> Result<StagingWriter> {
        let temp = tempfile::Builder::new()
            .prefix(FILE_PREFIX)
            .tempfile_in(&self.directory)?;
        let out = tokio::fs::File::from_std(temp.reopen()?);

        debug!("Staging upload at {}", temp.path().display());

        Ok(StagingWriter {
            temp,
            out,
            size: 0,
            content_type,
            file_name,
        })
    }

    /// Whether the staging directory exists and accepts new files.
    pub fn check_writable(&self) -> std::result::Result<(), String> {
        if !self.directory.is_dir() {
            return Err(format!("{} is not a directory", self.directory.display()));
        }
        tempfile::Builder::new()
            .prefix(".probe-")
            .tempfile_in(&self.directory)
            .and_then(NamedTempFile::close)
            .map_err(|e| format!("{} is not writable: {}", self.directory.display(), e))
    }
}

/// An upload being written. Dropping it deletes the partial file.
pub struct StagingWriter {
    temp: NamedTempFile,
    out: tokio::fs::File,
    size: u64,
    content_type: Option<String>,
    file_name: Option<String>,
}

impl StagingWriter {
    pub async fn write(&mut self, chunk: &[u8]) -> Result<()> {
        self.out.write_all(chunk).await?;
        self.size += chunk.len() as u64;
        Ok(())
    }

    /// Flush everything to disk and hand over the finished upload.
    pub async fn finish(mut self) -> Result<StagedImage> {
        self.out.flush().await?;
        self.out.sync_all().await?;

        Ok(StagedImage {
            file: self.temp,
            size: self.size,
            content_type: self.content_type,
            file_name: self.file_name,
        })
    }
}

/// A fully written upload waiting to be forwarded.
pub struct StagedImage {
    file: NamedTempFile,
    size: u64,
    content_type: Option<String>,
    file_name: Option<String>,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Fresh read handle positioned at the start of the upload.
    pub fn open(&self) -> Result<tokio::fs::File> {
        Ok(tokio::fs::File::from_std(self.file.reopen()?))
    }

    /// Delete the file now and report whether that worked.
    pub fn close(self) -> std::io::Result<()> {
        let path = self.file.path().to_path_buf();
        self.file.close()?;
        debug!("Removed staged upload {}", path.display());
        Ok(())
    }
}

impl std::fmt::Debug for StagedImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedImage")
            .field("path", &self.file.path())
            .field("size", &self.size)
            .field("content_type", &self.content_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;

    fn stager(dir: &Path) -> Stager {
        Stager::new(&StagingConfig {
            directory: dir.to_string_lossy().to_string(),
        })
    }

    fn entries(dir: &Path) -> usize {
        std::fs::read_dir(dir).unwrap().count()
    }

    #[tokio::test]
    async fn test_stage_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path());

        let mut writer = stager
            .create(Some("image/png".to_string()), Some("leaf.png".to_string()))
            .unwrap();
        writer.write(b"first-").await.unwrap();
        writer.write(b"second").await.unwrap();
        let staged = writer.finish().await.unwrap();

        assert_eq!(staged.size(), 12);
        assert_eq!(staged.content_type(), Some("image/png"));
        assert_eq!(staged.file_name(), Some("leaf.png"));
        assert!(staged.path().starts_with(dir.path()));

        let mut contents = Vec::new();
        staged.open().unwrap().read_to_end(&mut contents).await.unwrap();
        assert_eq!(contents, b"first-second");

        staged.close().unwrap();
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_drop_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path());

        let mut writer = stager.create(None, None).unwrap();
        writer.write(b"bytes").await.unwrap();
        let staged = writer.finish().await.unwrap();
        assert_eq!(entries(dir.path()), 1);

        drop(staged);
        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_abandoned_writer_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(dir.path());

        let mut writer = stager.create(None, None).unwrap();
        writer.write(b"partial").await.unwrap();
        drop(writer);

        assert_eq!(entries(dir.path()), 0);
    }

    #[tokio::test]
    async fn test_empty_upload() {
        let dir = tempfile::tempdir().unwrap();
        let staged = stager(dir.path())
            .create(None, None)
            .unwrap()
            .finish()
            .await
            .unwrap();
        assert!(staged.is_empty());
    }

    #[test]
    fn test_check_writable() {
        let dir = tempfile::tempdir().unwrap();
        assert!(stager(dir.path()).check_writable().is_ok());
        assert_eq!(entries(dir.path()), 0);

        let missing = dir.path().join("missing");
        assert!(stager(&missing).check_writable().is_err());
    }

    #[test]
    fn test_create_in_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let stager = stager(&dir.path().join("missing"));
        assert!(stager.create(None, None).is_err());
    }
}
