use std::collections::HashMap;

use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use engine::{ComputedReview, ReviewFilter, filter_reviews, rank_top};
use sea_orm::*;
use tracing::instrument;
use uuid::Uuid;

use crate::entity::{review, review_image};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::review::*;
use crate::state::AppState;

/// Photo uploads may carry several images in one request.
pub fn photo_upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(32 * 1024 * 1024) // 32 MB
}

const MAX_PHOTOS_PER_REVIEW: u64 = 6;

#[utoipa::path(
    get,
    path = "/",
    tag = "Reviews",
    operation_id = "listReviews",
    summary = "List reviews with optional filters",
    description = "Returns all reviews, newest first, with computed category scores and \
        price tiers. Filters compose with AND: a case-insensitive text search over outlet \
        name, address, and city; an exact city match (`all` disables it); and a product \
        type filter.",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Filtered review list", body = ReviewListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(query): Query<ReviewListQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let computed = load_computed_reviews(&state.db).await?;

    let filter = ReviewFilter {
        search_term: query.search,
        city: query.city,
        product_type: query.product_type.unwrap_or_default(),
    };
    let hits = filter_reviews(&computed, &filter);

    let total = hits.len() as u64;
    let reviews = hits.into_iter().map(ReviewResponse::from).collect();

    Ok(Json(ReviewListResponse { reviews, total }))
}

#[utoipa::path(
    get,
    path = "/top",
    tag = "Reviews",
    operation_id = "topReviews",
    summary = "Best-value reviews",
    description = "Returns the `top` best reviews (default 5) ranked by a value-for-money \
        measure that rewards high scores at low prices. Ties keep their insertion order.",
    params(TopQuery),
    responses(
        (status = 200, description = "Top reviews, best value first", body = ReviewListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn top_reviews(
    State(state): State<AppState>,
    Query(query): Query<TopQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    let engine_reviews = load_engine_reviews(&state.db).await?;

    let ranked = rank_top(&engine_reviews, query.top.unwrap_or(5));
    let total = ranked.len() as u64;
    let reviews = ranked.into_iter().map(ReviewResponse::from).collect();

    Ok(Json(ReviewListResponse { reviews, total }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "getReview",
    summary = "Get a single review",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 200, description = "Review with computed scores", body = ReviewResponse),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state), fields(review_id = %id))]
pub async fn get_review(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ReviewResponse>, AppError> {
    let model = find_review(&state.db, id).await?;
    let urls = image_urls_for_review(&state.db, id).await?;
    let engine_review = to_engine(model, urls)?;

    Ok(Json(ReviewResponse::from(ComputedReview::from(engine_review))))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Reviews",
    operation_id = "createReview",
    summary = "Create a review",
    description = "Creates a review and caches its weighted overall score. Admin only.",
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(outlet = %payload.outlet_name))]
pub async fn create_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateReviewRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_create_review(&payload)?;

    let now = chrono::Utc::now();
    let mut model = review::Model {
        id: Uuid::now_v7(),
        outlet_name: payload.outlet_name.trim().to_string(),
        address: payload.address.trim().to_string(),
        city: payload.city.trim().to_string(),
        visit_date: payload.visit_date,
        price: payload.price as i32,
        product_type: payload.product_type.as_str().to_string(),
        notes: payload.notes.map(|s| s.trim().to_string()),
        google_map_url: payload.google_map_url,
        image_url: None,
        kuah_kekentalan: payload.kuah_kekentalan,
        kuah_kaldu: payload.kuah_kaldu,
        kuah_keseimbangan: payload.kuah_keseimbangan,
        kuah_aroma: payload.kuah_aroma,
        mie_tekstur: payload.mie_tekstur,
        mie_tipe: payload.mie_tipe.map(|s| s.trim().to_string()),
        ayam_bumbu: payload.ayam_bumbu,
        ayam_potongan: payload.ayam_potongan,
        fasilitas_kebersihan: payload.fasilitas_kebersihan,
        fasilitas_alat_makan: payload.fasilitas_alat_makan,
        fasilitas_tempat: payload.fasilitas_tempat,
        service_durasi: payload.service_durasi,
        complexity: payload.complexity,
        sweetness: payload.sweetness,
        overall_score: None,
        created_at: now,
        updated_at: now,
    };

    let engine_review = to_engine(model.clone(), Vec::new())?;
    model.overall_score = Some(engine::overall_score(&engine_review));

    active_for_write(model.clone()).insert(&state.db).await?;

    let engine_review = to_engine(model, Vec::new())?;
    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse::from(ComputedReview::from(engine_review))),
    ))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "updateReview",
    summary = "Update a review",
    description = "Applies a partial update and recomputes the cached overall score in \
        the same transaction. Absent fields stay unchanged; explicit nulls clear \
        nullable fields. Admin only.",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body = UpdateReviewRequest,
    responses(
        (status = 200, description = "Updated review", body = ReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(review_id = %id))]
pub async fn update_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    auth_user.require_admin()?;
    validate_update_review(&payload)?;

    // Patch, score recomputation, and persist happen atomically so a
    // stored row can never carry a stale overall_score.
    let txn = state.db.begin().await?;

    let mut model = find_review(&txn, id).await?;
    apply_update(&mut model, payload);

    let engine_review = to_engine(model.clone(), Vec::new())?;
    model.overall_score = Some(engine::overall_score(&engine_review));
    model.updated_at = chrono::Utc::now();

    active_for_write(model.clone()).update(&txn).await?;
    txn.commit().await?;

    let urls = image_urls_for_review(&state.db, id).await?;
    let engine_review = to_engine(model, urls)?;
    Ok(Json(ReviewResponse::from(ComputedReview::from(engine_review))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Reviews",
    operation_id = "deleteReview",
    summary = "Delete a review",
    description = "Deletes a review and its photo references. Stored blobs are kept; \
        identical bytes may be shared across reviews. Admin only.",
    params(("id" = Uuid, Path, description = "Review ID")),
    responses(
        (status = 204, description = "Review deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(review_id = %id))]
pub async fn delete_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;

    find_review(&txn, id).await?;

    review_image::Entity::delete_many()
        .filter(review_image::Column::ReviewId.eq(id))
        .exec(&txn)
        .await?;
    review::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/{id}/photos",
    tag = "Reviews",
    operation_id = "uploadPhotos",
    summary = "Upload photos to a review",
    description = "Accepts one or more `file` multipart fields. Photos are content \
        addressed, so re-uploading identical bytes is a no-op at the storage layer. A \
        review holds at most 6 photos. Admin only.",
    params(("id" = Uuid, Path, description = "Review ID")),
    request_body(content_type = "multipart/form-data", description = "One or more image files"),
    responses(
        (status = 201, description = "Photos attached", body = UploadPhotosResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Review not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(review_id = %id))]
pub async fn upload_photos(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    find_review(&state.db, id).await?;

    let existing = review_image::Entity::find()
        .filter(review_image::Column::ReviewId.eq(id))
        .count(&state.db)
        .await?;

    // Read every part up front so the cap check covers the whole batch
    // before anything is written.
    let mut files: Vec<(String, axum::body::Bytes)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        if field.name() != Some("file") {
            continue; // Ignore unknown fields.
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("File field must have a filename".into()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?;

        files.push((filename, data));
    }

    if files.is_empty() {
        return Err(AppError::Validation("Missing 'file' field".into()));
    }
    check_photo_capacity(existing, files.len())?;

    let mut stored = Vec::with_capacity(files.len());
    for (filename, data) in &files {
        stored.push(state.images.put(data, filename).await?);
    }

    // Reference rows land together or not at all. The blob writes above
    // are content addressed, so an aborted request leaves no reachable
    // URL behind.
    let txn = state.db.begin().await?;
    let mut position = existing as i32;
    for image in &stored {
        let row = review_image::ActiveModel {
            id: Set(Uuid::now_v7()),
            review_id: Set(id),
            url: Set(image.url.clone()),
            content_hash: Set(image.hash.to_hex()),
            content_type: Set(image.content_type.clone()),
            position: Set(position),
            created_at: Set(chrono::Utc::now()),
        };
        row.insert(&txn).await?;
        position += 1;
    }
    txn.commit().await?;

    let created = stored.len();
    let image_urls = image_urls_for_review(&state.db, id).await?;

    Ok((
        StatusCode::CREATED,
        Json(UploadPhotosResponse { created, image_urls }),
    ))
}

/// Reject a batch that would push the review past the photo cap. Runs
/// before any blob or row write so a rejected request changes nothing.
fn check_photo_capacity(existing: u64, incoming: usize) -> Result<(), AppError> {
    if existing + incoming as u64 > MAX_PHOTOS_PER_REVIEW {
        return Err(AppError::Validation(format!(
            "A review can have at most {MAX_PHOTOS_PER_REVIEW} photos"
        )));
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/cities",
    tag = "Reviews",
    operation_id = "listCities",
    summary = "Distinct review cities",
    description = "Returns every city that has at least one review, sorted alphabetically. \
        Backs the city filter dropdown.",
    responses(
        (status = 200, description = "City list", body = CitiesResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn list_cities(State(state): State<AppState>) -> Result<Json<CitiesResponse>, AppError> {
    let cities: Vec<String> = review::Entity::find()
        .select_only()
        .column(review::Column::City)
        .distinct()
        .order_by_asc(review::Column::City)
        .into_tuple()
        .all(&state.db)
        .await?;

    Ok(Json(CitiesResponse { cities }))
}

#[utoipa::path(
    get,
    path = "/perceptual-map",
    tag = "Reviews",
    operation_id = "perceptualMap",
    summary = "Flavor perceptual map",
    description = "Plots every outlet on complexity/sweetness axes re-centered from the \
        0-10 rating scale to [-5, 5]. Outlets without those ratings sit at the origin.",
    responses(
        (status = 200, description = "Perceptual map points", body = PerceptualMapResponse),
    ),
)]
#[instrument(skip(state))]
pub async fn perceptual_map(
    State(state): State<AppState>,
) -> Result<Json<PerceptualMapResponse>, AppError> {
    let engine_reviews = load_engine_reviews(&state.db).await?;

    let points = engine_reviews
        .into_iter()
        .map(|r| PerceptualPoint {
            name: r.outlet_name,
            complexity: r.complexity.unwrap_or(5.0) - 5.0,
            sweetness: r.sweetness.unwrap_or(5.0) - 5.0,
            product_type: r.product_type,
        })
        .collect();

    Ok(Json(PerceptualMapResponse { points }))
}

pub(crate) async fn find_review<C: ConnectionTrait>(
    db: &C,
    id: Uuid,
) -> Result<review::Model, AppError> {
    review::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Review not found".into()))
}

/// Photo URLs for one review, in display order.
pub(crate) async fn image_urls_for_review<C: ConnectionTrait>(
    db: &C,
    review_id: Uuid,
) -> Result<Vec<String>, AppError> {
    let rows = review_image::Entity::find()
        .filter(review_image::Column::ReviewId.eq(review_id))
        .order_by_asc(review_image::Column::Position)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.url).collect())
}

/// All reviews as engine records, newest first, photo URLs attached.
pub(crate) async fn load_engine_reviews<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<engine::Review>, AppError> {
    let models = review::Entity::find()
        .order_by_desc(review::Column::CreatedAt)
        .all(db)
        .await?;

    let image_rows = review_image::Entity::find()
        .order_by_asc(review_image::Column::Position)
        .all(db)
        .await?;
    let mut urls_by_review: HashMap<Uuid, Vec<String>> = HashMap::new();
    for row in image_rows {
        urls_by_review.entry(row.review_id).or_default().push(row.url);
    }

    models
        .into_iter()
        .map(|m| {
            let urls = urls_by_review.remove(&m.id).unwrap_or_default();
            to_engine(m, urls)
        })
        .collect()
}

async fn load_computed_reviews<C: ConnectionTrait>(
    db: &C,
) -> Result<Vec<ComputedReview>, AppError> {
    Ok(load_engine_reviews(db)
        .await?
        .into_iter()
        .map(ComputedReview::from)
        .collect())
}

/// Active model with every column marked for write. Used by both insert
/// and the transactional update path, which rewrites the full row.
fn active_for_write(m: review::Model) -> review::ActiveModel {
    review::ActiveModel {
        id: Set(m.id),
        outlet_name: Set(m.outlet_name),
        address: Set(m.address),
        city: Set(m.city),
        visit_date: Set(m.visit_date),
        price: Set(m.price),
        product_type: Set(m.product_type),
        notes: Set(m.notes),
        google_map_url: Set(m.google_map_url),
        image_url: Set(m.image_url),
        kuah_kekentalan: Set(m.kuah_kekentalan),
        kuah_kaldu: Set(m.kuah_kaldu),
        kuah_keseimbangan: Set(m.kuah_keseimbangan),
        kuah_aroma: Set(m.kuah_aroma),
        mie_tekstur: Set(m.mie_tekstur),
        mie_tipe: Set(m.mie_tipe),
        ayam_bumbu: Set(m.ayam_bumbu),
        ayam_potongan: Set(m.ayam_potongan),
        fasilitas_kebersihan: Set(m.fasilitas_kebersihan),
        fasilitas_alat_makan: Set(m.fasilitas_alat_makan),
        fasilitas_tempat: Set(m.fasilitas_tempat),
        service_durasi: Set(m.service_durasi),
        complexity: Set(m.complexity),
        sweetness: Set(m.sweetness),
        overall_score: Set(m.overall_score),
        created_at: Set(m.created_at),
        updated_at: Set(m.updated_at),
    }
}
