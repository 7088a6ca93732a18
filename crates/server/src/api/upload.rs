use std::path::Path;

use axum::Json;
use axum::extract::State;
use axum::extract::multipart::{Multipart, MultipartRejection};
use tracing::{debug, info};

use nodal_media::{ImageWriter, StagedImage, is_image_content_type};

use super::AppState;
use super::schemas::{ErrorResponse, UploadForm, UploadResponse};
use crate::error::ServerError;

fn parse_error(details: impl ToString) -> ServerError {
    ServerError::bad_request_with("Failed to parse form data", details)
}

/// Stream the form and stage the first image part under `image`, falling
/// back to the first under `file`.
///
/// Parts with a non-image content type are skipped. Everything staged but
/// not returned is removed on drop.
async fn stage_upload(
    multipart: &mut Multipart,
    dir: &Path,
) -> Result<Option<StagedImage>, ServerError> {
    let mut image: Option<StagedImage> = None;
    let mut file: Option<StagedImage> = None;

    while let Some(mut field) = multipart.next_field().await.map_err(parse_error)? {
        let slot = match field.name() {
            Some("image") => &mut image,
            Some("file") => &mut file,
            _ => continue,
        };
        if slot.is_some() {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_owned();
        if !is_image_content_type(&content_type) {
            debug!(content_type = %content_type, "skipping non-image upload part");
            continue;
        }

        let file_name = field.file_name().map(str::to_owned);
        let mut writer = ImageWriter::create(dir, file_name, content_type)?;
        while let Some(chunk) = field.chunk().await.map_err(parse_error)? {
            writer.write_chunk(&chunk).await?;
        }
        *slot = Some(writer.finish().await?);
    }

    Ok(image.or(file))
}

/// `POST /upload-image` -- store an image and return its reference.
#[utoipa::path(
    post,
    path = "/upload-image",
    tag = "Uploads",
    summary = "Upload an image",
    description = "Accepts one image (max 10 MiB) under the `image` or `file` form field and stores it with the configured strategy.",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored image reference", body = UploadResponse),
        (status = 400, description = "Missing, empty, oversized or non-image file", body = ErrorResponse),
        (status = 500, description = "The storage strategy failed", body = ErrorResponse)
    )
)]
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ServerError> {
    let mut multipart = multipart.map_err(|e| parse_error(e.body_text()))?;

    let Some(staged) = stage_upload(&mut multipart, &state.upload_dir).await? else {
        return Err(ServerError::bad_request("No image file provided"));
    };
    if !is_image_content_type(staged.content_type()) {
        return Err(ServerError::bad_request("Only image files are allowed"));
    }

    let result = state.images.store(&staged).await;
    let (bytes, content_type) = (staged.size(), staged.content_type().to_owned());
    staged.discard();
    let stored = result?;

    info!(
        strategy = %state.images.strategy(),
        bytes,
        content_type = %content_type,
        "image uploaded"
    );
    Ok(Json(UploadResponse { url: stored.url }))
}
