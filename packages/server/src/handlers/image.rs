use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use common::storage::ContentHash;
use sea_orm::*;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use crate::entity::review_image;
use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{hash}",
    tag = "Images",
    operation_id = "getImage",
    summary = "Serve a stored review photo",
    description = "Streams the image with the given content hash. Content addressing \
        makes the body immutable for a given URL, so responses are cached aggressively.",
    params(("hash" = String, Path, description = "SHA-256 content hash (64 hex chars)")),
    responses(
        (status = 200, description = "Image bytes"),
        (status = 400, description = "Malformed hash (VALIDATION_ERROR)", body = ErrorBody),
        (status = 404, description = "Image not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_image(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Response, AppError> {
    let hash = ContentHash::from_hex(&hash)?;

    // The blob itself carries no type; recover it from any reference row.
    let content_type = review_image::Entity::find()
        .filter(review_image::Column::ContentHash.eq(hash.to_hex()))
        .one(&state.db)
        .await?
        .and_then(|row| row.content_type)
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let reader = state.images.get_stream(&hash).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}
