use async_trait::async_trait;

use nodal_core::{BlogId, BlogPost, NewBlogPost};

use crate::error::StoreError;

/// Trait for persisting the blog post collection.
///
/// Listing order is "newest first": `created_at` descending, with posts
/// written by the same call keeping the order they were passed in.
///
/// Implementations must be `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Return every post, newest first.
    async fn list(&self) -> Result<Vec<BlogPost>, StoreError>;

    /// Fetch a single post. Returns `None` if no post has this identifier.
    async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError>;

    /// Append posts to the collection, assigning fresh identifiers and a
    /// shared creation timestamp. Returns the number of posts written.
    async fn insert_many(&self, posts: &[NewBlogPost]) -> Result<u64, StoreError>;

    /// Drop every existing post, then insert `posts`.
    ///
    /// Backends apply the delete and the insert as one unit: either the new
    /// collection is fully visible or the old one is left untouched.
    async fn replace_all(&self, posts: &[NewBlogPost]) -> Result<u64, StoreError>;

    /// Release any held connections. Called once during shutdown.
    async fn close(&self) {}
}
