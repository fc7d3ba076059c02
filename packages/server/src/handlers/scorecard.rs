use axum::Json;
use axum::extract::{Path, State};
use engine::ComputedReview;
use tracing::instrument;
use uuid::Uuid;

use crate::error::{AppError, ErrorBody};
use crate::handlers::review::{find_review, image_urls_for_review};
use crate::models::review::{ScorecardResponse, to_engine};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{id}/scorecard",
    tag = "Scorecard",
    operation_id = "generateScorecard",
    summary = "Generate a shareable scorecard graphic",
    description = "Asks the image-generation gateway to render a social-media scorecard \
        for this review. Failures are non-fatal: the review stays fully usable, the \
        caller just gets a 502 and can retry.",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Scorecard rendered", body = ScorecardResponse),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
        (status = 502, description = "Gateway failure (SCORECARD_FAILED)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(review_id = %id))]
pub async fn generate_scorecard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ScorecardResponse>, AppError> {
    let model = find_review(&state.db, id).await?;
    let urls = image_urls_for_review(&state.db, id).await?;
    let computed = ComputedReview::from(to_engine(model, urls)?);

    let image_url = state.scorecard.generate(&computed).await?;

    Ok(Json(ScorecardResponse { image_url }))
}
