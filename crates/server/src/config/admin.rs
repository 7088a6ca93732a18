use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Admin settings for the bulk-replace endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct AdminConfig {
    /// Shared passcode required by `POST /blogs`.
    ///
    /// Wrapped in [`SecretString`] so it is redacted in logs. When unset or
    /// empty, the check is skipped.
    pub passcode: Option<SecretString>,
}

impl AdminConfig {
    /// The configured passcode, if any non-empty one is set.
    pub fn passcode(&self) -> Option<&str> {
        self.passcode
            .as_ref()
            .map(|p| p.expose_secret().as_str())
            .filter(|p| !p.is_empty())
    }
}
