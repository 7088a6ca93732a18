use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use nodal_core::{BlogId, BlogPost, NewBlogPost};
use nodal_store::error::StoreError;
use nodal_store::store::BlogStore;

/// A stored post together with its insertion sequence number.
#[derive(Debug, Clone)]
struct Entry {
    seq: u64,
    post: BlogPost,
}

#[derive(Debug, Default)]
struct Inner {
    entries: Vec<Entry>,
    next_seq: u64,
}

impl Inner {
    fn append(&mut self, posts: &[NewBlogPost]) -> u64 {
        let now = Utc::now();
        for new in posts {
            let seq = self.next_seq;
            self.next_seq += 1;
            self.entries.push(Entry {
                seq,
                post: new.clone().into_post(now),
            });
        }
        posts.len() as u64
    }
}

/// In-memory [`BlogStore`] backed by a single [`RwLock`]ed vector.
///
/// Every write takes the lock once, so a replace is observed either entirely
/// or not at all. Contents are lost when the process exits.
#[derive(Debug, Default)]
pub struct MemoryBlogStore {
    inner: RwLock<Inner>,
}

impl MemoryBlogStore {
    /// Create a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryBlogStore {
    async fn list(&self) -> Result<Vec<BlogPost>, StoreError> {
        let inner = self.inner.read().await;
        let mut entries = inner.entries.clone();
        drop(inner);

        entries.sort_by_key(|e| (Reverse(e.post.created_at), e.seq));
        Ok(entries.into_iter().map(|e| e.post).collect())
    }

    async fn get(&self, id: &BlogId) -> Result<Option<BlogPost>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .entries
            .iter()
            .find(|e| e.post.id == *id)
            .map(|e| e.post.clone()))
    }

    async fn insert_many(&self, posts: &[NewBlogPost]) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.append(posts))
    }

    async fn replace_all(&self, posts: &[NewBlogPost]) -> Result<u64, StoreError> {
        let mut inner = self.inner.write().await;
        inner.entries.clear();
        Ok(inner.append(posts))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nodal_store::testing::run_store_conformance_tests;

    use super::*;

    #[tokio::test]
    async fn conformance() {
        let store = MemoryBlogStore::new();
        run_store_conformance_tests(&store)
            .await
            .expect("conformance tests should pass");
    }

    #[tokio::test]
    async fn concurrent_replaces_never_interleave() {
        let store = Arc::new(MemoryBlogStore::new());

        let batch = |prefix: &str| -> Vec<NewBlogPost> {
            (0..50)
                .map(|i| NewBlogPost::new(format!("{prefix}-{i}"), "body"))
                .collect()
        };

        let mut handles = Vec::new();
        for prefix in ["a", "b", "c", "d"] {
            let store = Arc::clone(&store);
            let posts = batch(prefix);
            handles.push(tokio::spawn(async move {
                store.replace_all(&posts).await.unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let posts = store.list().await.unwrap();
        assert_eq!(posts.len(), 50);
        let prefix = posts[0].title.split('-').next().unwrap().to_owned();
        assert!(
            posts.iter().all(|p| p.title.starts_with(&format!("{prefix}-"))),
            "final collection must come from a single writer"
        );
    }

    #[tokio::test]
    async fn list_returns_snapshot() {
        let store = MemoryBlogStore::new();
        store
            .insert_many(&[NewBlogPost::new("one", "1")])
            .await
            .unwrap();

        let snapshot = store.list().await.unwrap();
        store.replace_all(&[]).await.unwrap();

        assert_eq!(snapshot.len(), 1);
        assert!(store.list().await.unwrap().is_empty());
    }
}
