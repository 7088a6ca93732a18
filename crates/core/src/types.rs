use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Engine-assigned identifier of a blog post.
///
/// Identifiers are time-ordered UUIDv7 values rendered as hyphenated strings
/// on the wire. They are only ever minted by a store; identifiers supplied by
/// callers are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlogId(Uuid);

impl BlogId {
    /// Mint a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::now_v7())
    }

    /// Wrap an identifier read back from storage.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for BlogId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for BlogId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for BlogId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = BlogId::generate();
        let b = BlogId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn display_parses_back() {
        let id = BlogId::generate();
        let parsed: BlogId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn malformed_id_is_rejected() {
        assert!("not-a-uuid".parse::<BlogId>().is_err());
        assert!("507f1f77bcf86cd799439011".parse::<BlogId>().is_err());
    }

    #[test]
    fn surrounding_whitespace_is_rejected() {
        let id = BlogId::generate();
        assert!(format!(" {id} ").parse::<BlogId>().is_err());
        assert!(format!("{id}\n").parse::<BlogId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = BlogId::generate();
        let json = serde_json::to_value(id).unwrap();
        assert_eq!(json, serde_json::Value::String(id.to_string()));
    }
}
