use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;

use crate::error::MediaError;
use crate::staging::StagedImage;
use crate::store::{ImageStore, StorageStrategy, StoredImage};

/// Returns the image itself as a `data:<mime>;base64,...` URI.
#[derive(Debug, Default, Clone, Copy)]
pub struct InlineImageStore;

impl InlineImageStore {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{content_type};base64,{}", B64.encode(bytes))
}

#[async_trait]
impl ImageStore for InlineImageStore {
    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::Inline
    }

    async fn store(&self, image: &StagedImage) -> Result<StoredImage, MediaError> {
        let bytes = image.read().await?;
        Ok(StoredImage {
            url: data_uri(image.content_type(), &bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::staging::ImageWriter;

    #[test]
    fn data_uri_format() {
        assert_eq!(data_uri("image/png", b"hi"), "data:image/png;base64,aGk=");
    }

    #[tokio::test]
    async fn stores_as_data_uri() {
        let dir = tempfile::tempdir().unwrap();
        let mut writer = ImageWriter::create(dir.path(), Some("a.gif".into()), "image/gif").unwrap();
        writer.write_chunk(b"GIF89a").await.unwrap();
        let staged = writer.finish().await.unwrap();

        let stored = InlineImageStore::new().store(&staged).await.unwrap();
        assert_eq!(stored.url, "data:image/gif;base64,R0lGODlh");
    }
}
