use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use secrecy::ExposeSecret;
use subtle::ConstantTimeEq;
use tracing::{debug, info};

use nodal_core::{BlogId, BlogPost, parse_bulk_payload};

use super::AppState;
use super::schemas::{ErrorResponse, ReplaceBlogsRequest};
use crate::error::ServerError;

/// Compare the submitted passcode against the configured one.
///
/// Anything other than a JSON string never matches.
fn passcode_matches(expected: &str, given: Option<&serde_json::Value>) -> bool {
    match given {
        Some(serde_json::Value::String(given)) => {
            given.as_bytes().ct_eq(expected.as_bytes()).into()
        }
        _ => false,
    }
}

/// `GET /blogs` -- list every post, newest first.
///
/// An empty collection is seeded with the welcome post before returning.
#[utoipa::path(
    get,
    path = "/blogs",
    tag = "Blogs",
    summary = "List blog posts",
    description = "Returns all posts, newest first. When the collection is empty the default welcome post is inserted first.",
    responses(
        (status = 200, description = "All posts", body = Vec<BlogPost>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_blogs(State(state): State<AppState>) -> Result<Json<Vec<BlogPost>>, ServerError> {
    let posts = state.store.list().await?;
    if !posts.is_empty() || state.seed.is_empty() {
        return Ok(Json(posts));
    }

    let _guard = state.seed_lock.lock().await;
    let posts = state.store.list().await?;
    if !posts.is_empty() {
        return Ok(Json(posts));
    }

    let seeded = state.store.insert_many(&state.seed).await?;
    info!(seeded, "blog collection was empty, inserted seed posts");
    Ok(Json(state.store.list().await?))
}

/// `POST /blogs` -- replace the whole collection.
#[utoipa::path(
    post,
    path = "/blogs",
    tag = "Blogs",
    summary = "Replace all blog posts",
    description = "Deletes every post and inserts the submitted list with fresh identifiers. Only title, content, date, authorName and authorProfilePicture are read from each entry.",
    request_body = ReplaceBlogsRequest,
    responses(
        (status = 200, description = "The new collection, newest first", body = Vec<BlogPost>),
        (status = 400, description = "Payload is not a list of valid posts", body = ErrorResponse),
        (status = 401, description = "Passcode missing or wrong", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn replace_blogs(
    State(state): State<AppState>,
    payload: Result<Json<ReplaceBlogsRequest>, JsonRejection>,
) -> Result<Json<Vec<BlogPost>>, ServerError> {
    let Json(request) =
        payload.map_err(|e| ServerError::bad_request_with("Invalid JSON body", e.body_text()))?;

    if let Some(expected) = &state.passcode
        && !passcode_matches(expected.expose_secret(), request.passcode.as_ref())
    {
        debug!("bulk replace rejected: invalid passcode");
        return Err(ServerError::Unauthorized("Invalid passcode".into()));
    }

    let posts = parse_bulk_payload(&request.blogs)?;

    let written = state.store.replace_all(&posts).await?;
    info!(written, "replaced blog collection");

    Ok(Json(state.store.list().await?))
}

/// `GET /blogs/{id}` -- fetch one post.
#[utoipa::path(
    get,
    path = "/blogs/{id}",
    tag = "Blogs",
    summary = "Get a blog post",
    params(("id" = String, Path, description = "Post identifier (`_id`)")),
    responses(
        (status = 200, description = "The post", body = BlogPost),
        (status = 400, description = "Empty identifier", body = ErrorResponse),
        (status = 404, description = "No post with this identifier", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn get_blog(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, ServerError> {
    if id.trim().is_empty() {
        return Err(ServerError::bad_request("Blog ID is required"));
    }

    // An identifier that cannot exist is simply not found.
    let Ok(id) = id.parse::<BlogId>() else {
        return Err(ServerError::NotFound("Blog not found".into()));
    };

    state
        .store
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ServerError::NotFound("Blog not found".into()))
}

/// `GET /blogs/` -- the path-parameter route with the identifier left out.
pub async fn missing_blog_id() -> ServerError {
    ServerError::bad_request("Blog ID is required")
}
