use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use secrecy::ExposeSecret;

use nodal_media::{
    CloudinaryConfig, CloudinaryImageStore, DiskImageStore, ImageStore, InlineImageStore,
    StorageStrategy,
};

use crate::config::{CloudinarySettings, UploadsConfig};
use crate::error::ServerError;

fn cloudinary_config(settings: &CloudinarySettings) -> Result<CloudinaryConfig, ServerError> {
    let missing = |name: &str| {
        ServerError::Config(format!("cloudinary strategy requires [uploads.cloudinary] {name}"))
    };
    let cloud_name = settings.cloud_name.as_deref().ok_or_else(|| missing("cloud_name"))?;
    let api_key = settings.api_key.as_deref().ok_or_else(|| missing("api_key"))?;
    let api_secret = settings.api_secret.as_ref().ok_or_else(|| missing("api_secret"))?;

    let mut config = CloudinaryConfig::new(cloud_name, api_key, api_secret.expose_secret().clone());
    config.folder.clone_from(&settings.folder);
    config.api_base_url.clone_from(&settings.api_base_url);
    config.timeout = Duration::from_secs(settings.timeout_seconds);
    Ok(config)
}

/// Create the image store for the resolved upload strategy.
pub fn create_image_store(
    config: &UploadsConfig,
    public_dir: &Path,
) -> Result<Arc<dyn ImageStore>, ServerError> {
    let store: Arc<dyn ImageStore> = match config.resolved_strategy() {
        StorageStrategy::Inline => Arc::new(InlineImageStore::new()),
        StorageStrategy::Disk => Arc::new(DiskImageStore::new(public_dir)),
        StorageStrategy::Cloudinary => Arc::new(
            CloudinaryImageStore::new(cloudinary_config(&config.cloudinary)?)
                .map_err(|e| ServerError::Config(e.to_string()))?,
        ),
    };
    Ok(store)
}

#[cfg(test)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn complete() -> CloudinarySettings {
        CloudinarySettings {
            cloud_name: Some("demo".into()),
            api_key: Some("key".into()),
            api_secret: Some(SecretString::new("secret".into())),
            folder: Some("blog".into()),
            ..CloudinarySettings::default()
        }
    }

    #[test]
    fn disk_without_credentials() {
        let store = create_image_store(&UploadsConfig::default(), Path::new("public")).unwrap();
        assert_eq!(store.strategy(), StorageStrategy::Disk);
    }

    #[test]
    fn cloudinary_when_credentials_complete() {
        let config = UploadsConfig {
            cloudinary: complete(),
            ..UploadsConfig::default()
        };
        let store = create_image_store(&config, Path::new("public")).unwrap();
        assert_eq!(store.strategy(), StorageStrategy::Cloudinary);
    }

    #[test]
    fn explicit_strategy_wins() {
        let config = UploadsConfig {
            strategy: Some(StorageStrategy::Inline),
            cloudinary: complete(),
            ..UploadsConfig::default()
        };
        let store = create_image_store(&config, Path::new("public")).unwrap();
        assert_eq!(store.strategy(), StorageStrategy::Inline);
    }

    #[test]
    fn explicit_cloudinary_without_secret_fails() {
        let config = UploadsConfig {
            strategy: Some(StorageStrategy::Cloudinary),
            cloudinary: CloudinarySettings {
                api_secret: None,
                ..complete()
            },
            ..UploadsConfig::default()
        };
        let err = create_image_store(&config, Path::new("public")).err().unwrap();
        assert!(err.to_string().contains("api_secret"));
    }
}
