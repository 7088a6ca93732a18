use secrecy::SecretString;

use nodal_media::StorageStrategy;

use super::NodalConfig;
use crate::error::ServerError;

impl NodalConfig {
    /// Apply environment overrides read through `lookup`.
    ///
    /// Empty values are treated as unset. `DATABASE_URL` also switches the
    /// backend to `postgres`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ServerError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ServerError::Config(format!("invalid PORT: {port}")))?;
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(env) = var("NODAL_ENV") {
            self.server.production = env.trim().eq_ignore_ascii_case("production");
        }

        if let Some(url) = var("DATABASE_URL") {
            self.database.url = Some(url);
            self.database.backend = "postgres".to_owned();
        }

        if let Some(origin) = var("FRONTEND_URL") {
            self.cors.frontend_url = Some(origin);
        }

        if let Some(passcode) = var("ADMIN_PASSCODE") {
            self.admin.passcode = Some(SecretString::new(passcode));
        }

        if let Some(strategy) = var("UPLOAD_STRATEGY") {
            self.uploads.strategy = Some(
                strategy
                    .parse::<StorageStrategy>()
                    .map_err(|e| ServerError::Config(e.to_string()))?,
            );
        }
        let cloudinary = &mut self.uploads.cloudinary;
        if let Some(v) = var("CLOUDINARY_CLOUD_NAME") {
            cloudinary.cloud_name = Some(v);
        }
        if let Some(v) = var("CLOUDINARY_API_KEY") {
            cloudinary.api_key = Some(v);
        }
        if let Some(v) = var("CLOUDINARY_API_SECRET") {
            cloudinary.api_secret = Some(SecretString::new(v));
        }
        if let Some(v) = var("CLOUDINARY_FOLDER") {
            cloudinary.folder = Some(v);
        }

        Ok(())
    }
}
