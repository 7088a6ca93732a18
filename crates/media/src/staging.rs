use std::path::Path;

use tempfile::TempPath;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::MediaError;

/// Largest accepted upload, in bytes (10 MiB).
pub const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Whether a declared content type names an image (`image/*`).
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type
        .get(..6)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// Streams one upload part into a temp file while enforcing the size limit.
///
/// If the writer is dropped before [`finish`](Self::finish), the temp file is
/// removed.
pub struct ImageWriter {
    file: tokio::fs::File,
    path: TempPath,
    file_name: Option<String>,
    content_type: String,
    written: u64,
    limit: u64,
}

impl ImageWriter {
    /// Create a temp file in `dir` for an upload part.
    pub fn create(
        dir: &Path,
        file_name: Option<String>,
        content_type: impl Into<String>,
    ) -> Result<Self, MediaError> {
        let (file, path) = tempfile::Builder::new()
            .prefix("nodal-upload-")
            .tempfile_in(dir)?
            .into_parts();

        Ok(Self {
            file: tokio::fs::File::from_std(file),
            path,
            file_name,
            content_type: content_type.into(),
            written: 0,
            limit: MAX_IMAGE_BYTES,
        })
    }

    /// Override the size limit.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Append a chunk of the upload.
    pub async fn write_chunk(&mut self, chunk: &[u8]) -> Result<(), MediaError> {
        let next = self.written + chunk.len() as u64;
        if next > self.limit {
            return Err(MediaError::TooLarge { limit: self.limit });
        }
        self.file.write_all(chunk).await?;
        self.written = next;
        Ok(())
    }

    /// Flush the temp file and hand it over as a [`StagedImage`].
    pub async fn finish(mut self) -> Result<StagedImage, MediaError> {
        if self.written == 0 {
            return Err(MediaError::Empty);
        }
        self.file.flush().await?;
        drop(self.file);

        Ok(StagedImage {
            path: self.path,
            file_name: self.file_name,
            content_type: self.content_type,
            size: self.written,
        })
    }
}

/// An accepted upload sitting in a temp file.
///
/// The temp file lives exactly as long as this value.
#[derive(Debug)]
pub struct StagedImage {
    path: TempPath,
    file_name: Option<String>,
    content_type: String,
    size: u64,
}

impl StagedImage {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The filename the client declared, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// Read the whole file into memory.
    pub async fn read(&self) -> Result<Vec<u8>, MediaError> {
        Ok(tokio::fs::read(&*self.path).await?)
    }

    /// Remove the temp file now. Failures are logged and otherwise ignored.
    pub fn discard(self) {
        let path_str = self.path.display().to_string();
        if let Err(e) = self.path.close() {
            debug!(path = %path_str, error = %e, "failed to remove staged upload");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_content_types() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("image/svg+xml"));
        assert!(is_image_content_type("IMAGE/JPEG"));
        assert!(!is_image_content_type("text/plain"));
        assert!(!is_image_content_type("application/octet-stream"));
        assert!(!is_image_content_type("image"));
        assert!(!is_image_content_type(""));
    }

    #[tokio::test]
    async fn finish_produces_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer =
            ImageWriter::create(dir.path(), Some("cat.png".into()), "image/png").unwrap();
        writer.write_chunk(b"\x89PNG").await.unwrap();
        writer.write_chunk(b"rest").await.unwrap();

        let staged = writer.finish().await.unwrap();
        assert_eq!(staged.size(), 8);
        assert_eq!(staged.file_name(), Some("cat.png"));
        assert_eq!(staged.content_type(), "image/png");
        assert_eq!(staged.read().await.unwrap(), b"\x89PNGrest");

        let path = staged.path().to_path_buf();
        staged.discard();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn empty_upload_is_rejected_and_removed() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ImageWriter::create(dir.path(), None, "image/png").unwrap();

        let err = writer.finish().await.unwrap_err();
        assert!(matches!(err, MediaError::Empty));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageWriter::create(dir.path(), None, "image/jpeg")
            .unwrap()
            .with_limit(4);

        writer.write_chunk(b"abcd").await.unwrap();
        let err = writer.write_chunk(b"e").await.unwrap_err();
        assert!(matches!(err, MediaError::TooLarge { limit: 4 }));

        drop(writer);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn dropping_staged_image_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageWriter::create(dir.path(), None, "image/gif").unwrap();
        writer.write_chunk(b"GIF89a").await.unwrap();
        let staged = writer.finish().await.unwrap();
        let path = staged.path().to_path_buf();
        assert!(path.exists());

        drop(staged);
        assert!(!path.exists());
    }
}
