use std::collections::HashSet;

use nodal_core::{BlogId, NewBlogPost};

use crate::error::StoreError;
use crate::store::BlogStore;

fn post(title: &str) -> NewBlogPost {
    NewBlogPost::new(title, format!("# {title}"))
}

/// Run the full blog store conformance test suite.
///
/// Call this from your backend's test module with a fresh, empty store.
/// The tests run in sequence and leave the store holding a small collection.
///
/// # Errors
///
/// Returns an error if a store operation fails. Assertion failures panic.
pub async fn run_store_conformance_tests(store: &dyn BlogStore) -> Result<(), StoreError> {
    test_list_empty(store).await?;
    test_get_missing(store).await?;
    test_insert_and_get(store).await?;
    test_batch_keeps_payload_order(store).await?;
    test_newer_batches_come_first(store).await?;
    test_replace_reissues_ids(store).await?;
    test_replace_with_empty_clears(store).await?;
    Ok(())
}

async fn test_list_empty(store: &dyn BlogStore) -> Result<(), StoreError> {
    let posts = store.list().await?;
    assert!(posts.is_empty(), "a fresh store should be empty");
    Ok(())
}

async fn test_get_missing(store: &dyn BlogStore) -> Result<(), StoreError> {
    let found = store.get(&BlogId::generate()).await?;
    assert!(found.is_none(), "get on unknown id should return None");
    Ok(())
}

async fn test_insert_and_get(store: &dyn BlogStore) -> Result<(), StoreError> {
    let new = NewBlogPost::new("Hello", "Body")
        .with_date("June 2, 2025")
        .with_author_name("Ada")
        .with_author_profile_picture("data:image/png;base64,AAAA");
    let written = store.insert_many(std::slice::from_ref(&new)).await?;
    assert_eq!(written, 1);

    let posts = store.list().await?;
    assert_eq!(posts.len(), 1);
    assert_eq!(NewBlogPost::from(&posts[0]), new);
    assert_eq!(posts[0].created_at, posts[0].updated_at);

    let fetched = store.get(&posts[0].id).await?;
    assert_eq!(fetched.as_ref(), Some(&posts[0]));
    Ok(())
}

async fn test_batch_keeps_payload_order(store: &dyn BlogStore) -> Result<(), StoreError> {
    store
        .replace_all(&[post("first"), post("second"), post("third")])
        .await?;
    let titles: Vec<String> = store.list().await?.into_iter().map(|p| p.title).collect();
    assert_eq!(titles, ["first", "second", "third"]);
    Ok(())
}

async fn test_newer_batches_come_first(store: &dyn BlogStore) -> Result<(), StoreError> {
    // Timestamps have microsecond resolution in some backends.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    store.insert_many(&[post("newer-a"), post("newer-b")]).await?;

    let titles: Vec<String> = store.list().await?.into_iter().map(|p| p.title).collect();
    assert_eq!(titles, ["newer-a", "newer-b", "first", "second", "third"]);
    Ok(())
}

async fn test_replace_reissues_ids(store: &dyn BlogStore) -> Result<(), StoreError> {
    let before: HashSet<BlogId> = store.list().await?.into_iter().map(|p| p.id).collect();
    let existing = store.list().await?;
    let resubmitted: Vec<NewBlogPost> = existing.iter().map(NewBlogPost::from).collect();

    let written = store.replace_all(&resubmitted).await?;
    assert_eq!(written, resubmitted.len() as u64);

    let after = store.list().await?;
    assert_eq!(after.len(), existing.len());
    for p in &after {
        assert!(!before.contains(&p.id), "replace must issue new identifiers");
    }
    for old in &existing {
        assert!(
            store.get(&old.id).await?.is_none(),
            "replaced posts must no longer resolve"
        );
    }
    let contents: Vec<NewBlogPost> = after.iter().map(NewBlogPost::from).collect();
    assert_eq!(contents, resubmitted);
    Ok(())
}

async fn test_replace_with_empty_clears(store: &dyn BlogStore) -> Result<(), StoreError> {
    let written = store.replace_all(&[]).await?;
    assert_eq!(written, 0);
    assert!(store.list().await?.is_empty());

    store.insert_many(&[post("after-clear")]).await?;
    assert_eq!(store.list().await?.len(), 1);
    Ok(())
}
