use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::types::BlogId;

/// A persisted blog post as returned by the API.
///
/// The identifier is serialized as `_id` because the existing front end reads
/// that key; every other field is camelCase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlogPost {
    /// Engine-assigned identifier.
    #[serde(rename = "_id")]
    #[cfg_attr(
        feature = "openapi",
        schema(value_type = String, example = "01927c3e-8f2a-7d41-b3c5-6a1e2f9d0b7c")
    )]
    pub id: BlogId,
    /// Post title, never empty.
    #[cfg_attr(feature = "openapi", schema(example = "Welcome to Nodal"))]
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Free-form display date (not parsed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "openapi", schema(example = "October 18, 2026"))]
    pub date: Option<String>,
    /// Author display name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_name: Option<String>,
    /// Absolute URL, site-relative path, or data URI.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_profile_picture: Option<String>,
    /// When the post was inserted.
    pub created_at: DateTime<Utc>,
    /// When the post was last written.
    pub updated_at: DateTime<Utc>,
}

/// The content fields of a post that is about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewBlogPost {
    pub title: String,
    pub content: String,
    pub date: Option<String>,
    pub author_name: Option<String>,
    pub author_profile_picture: Option<String>,
}

impl NewBlogPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    #[must_use]
    pub fn with_author_name(mut self, name: impl Into<String>) -> Self {
        self.author_name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_author_profile_picture(mut self, picture: impl Into<String>) -> Self {
        self.author_profile_picture = Some(picture.into());
        self
    }

    /// Materialize the post with a fresh identifier and the given timestamp.
    pub fn into_post(self, now: DateTime<Utc>) -> BlogPost {
        BlogPost {
            id: BlogId::generate(),
            title: self.title,
            content: self.content,
            date: self.date,
            author_name: self.author_name,
            author_profile_picture: self.author_profile_picture,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<&BlogPost> for NewBlogPost {
    fn from(post: &BlogPost) -> Self {
        Self {
            title: post.title.clone(),
            content: post.content.clone(),
            date: post.date.clone(),
            author_name: post.author_name.clone(),
            author_profile_picture: post.author_profile_picture.clone(),
        }
    }
}

/// One element of a bulk-replace payload.
///
/// Only the five content fields are read. Identifiers, timestamps and any
/// other keys the caller sends along are dropped here, so a replace always
/// reissues identifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct BlogPostInput {
    /// Required, non-empty.
    #[serde(default)]
    pub title: Option<String>,
    /// Missing content is stored as an empty string.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub author_profile_picture: Option<String>,
}

impl BlogPostInput {
    /// Check the entry and convert it into an insertable post.
    pub fn into_new_post(self, index: usize) -> Result<NewBlogPost, ValidationError> {
        let title = match self.title {
            Some(title) if !title.is_empty() => title,
            _ => return Err(ValidationError::MissingTitle { index }),
        };

        Ok(NewBlogPost {
            title,
            content: self.content.unwrap_or_default(),
            date: self.date,
            author_name: self.author_name,
            author_profile_picture: self.author_profile_picture,
        })
    }
}

/// Turn the raw `blogs` value of a bulk-replace request into insertable posts.
///
/// Every entry is checked before anything is returned, so a rejected payload
/// never reaches the store.
pub fn parse_bulk_payload(blogs: &serde_json::Value) -> Result<Vec<NewBlogPost>, ValidationError> {
    let entries = blogs.as_array().ok_or(ValidationError::NotAnArray)?;

    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| {
            let input = BlogPostInput::deserialize(entry).map_err(|e| {
                ValidationError::MalformedEntry {
                    index,
                    message: e.to_string(),
                }
            })?;
            input.into_new_post(index)
        })
        .collect()
}
