use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use crate::error::MediaError;
use crate::staging::StagedImage;
use crate::store::{ImageStore, StorageStrategy, StoredImage};

/// Directory under the public root that holds uploaded images.
pub const IMAGE_DIR: &str = "blog-images";

/// Copies uploads under `<public_dir>/blog-images` and returns a
/// site-relative `/blog-images/<name>` URL.
#[derive(Debug, Clone)]
pub struct DiskImageStore {
    dir: PathBuf,
}

impl DiskImageStore {
    pub fn new(public_dir: impl AsRef<Path>) -> Self {
        Self {
            dir: public_dir.as_ref().join(IMAGE_DIR),
        }
    }

    /// The directory images are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Pick a file extension (with the leading dot) for a stored image.
///
/// The client's filename wins; otherwise the MIME subtype is used
/// (`image/svg+xml` gives `.svg`). Anything that is not short and
/// alphanumeric is dropped.
pub(crate) fn extension_for(file_name: Option<&str>, content_type: &str) -> String {
    let clean = |ext: &str| -> Option<String> {
        let ok = !ext.is_empty() && ext.len() <= 10 && ext.bytes().all(|b| b.is_ascii_alphanumeric());
        ok.then(|| format!(".{}", ext.to_ascii_lowercase()))
    };

    let from_name = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .and_then(clean);

    from_name
        .or_else(|| {
            let subtype = content_type.split_once('/')?.1;
            let subtype = subtype.split([';', '+']).next()?.trim();
            clean(subtype)
        })
        .unwrap_or_default()
}

fn unique_name(ext: &str) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{}-{}{ext}", Utc::now().timestamp_millis(), &random[..12])
}

#[async_trait]
impl ImageStore for DiskImageStore {
    fn strategy(&self) -> StorageStrategy {
        StorageStrategy::Disk
    }

    async fn store(&self, image: &StagedImage) -> Result<StoredImage, MediaError> {
        tokio::fs::create_dir_all(&self.dir).await?;

        let ext = extension_for(image.file_name(), image.content_type());
        let name = unique_name(&ext);
        let target = self.dir.join(&name);
        tokio::fs::copy(image.path(), &target).await?;

        debug!(path = %target.display(), bytes = image.size(), "stored image on disk");
        Ok(StoredImage {
            url: format!("/{IMAGE_DIR}/{name}"),
        })
    }
}
