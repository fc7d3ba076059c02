use chrono::{DateTime, NaiveDate, Utc};
use engine::{CategoryScores, ComputedReview, PriceCategory, ProductType, TypeFilter, categorize_price};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entity::review;
use crate::error::AppError;
use super::shared::{
    double_option, validate_optional_text, validate_optional_url, validate_price, validate_rating,
    validate_text,
};

/// Query parameters for the review listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct ReviewListQuery {
    /// Case-insensitive substring match on outlet name, address, or city.
    pub search: Option<String>,
    /// Exact city filter; `all` or absent disables it.
    pub city: Option<String>,
    /// Product type filter: `kuah`, `goreng`, or `all`.
    pub product_type: Option<TypeFilter>,
}

/// Query parameters for the top-N listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct TopQuery {
    /// Number of entries to return (default 5).
    pub top: Option<usize>,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateReviewRequest {
    pub outlet_name: String,
    pub address: String,
    pub city: String,
    pub visit_date: NaiveDate,
    /// Price in whole rupiah (1-1000000).
    pub price: u32,
    pub product_type: ProductType,
    pub notes: Option<String>,
    pub google_map_url: Option<String>,

    pub kuah_kekentalan: Option<f64>,
    pub kuah_kaldu: Option<f64>,
    pub kuah_keseimbangan: Option<f64>,
    pub kuah_aroma: Option<f64>,
    pub mie_tekstur: Option<f64>,
    pub mie_tipe: Option<String>,
    pub ayam_bumbu: Option<f64>,
    pub ayam_potongan: Option<f64>,
    pub fasilitas_kebersihan: Option<f64>,
    pub fasilitas_alat_makan: Option<f64>,
    pub fasilitas_tempat: Option<f64>,
    pub service_durasi: Option<f64>,
    pub complexity: Option<f64>,
    pub sweetness: Option<f64>,
}

/// PATCH body for updating a review. Absent fields stay unchanged;
/// nullable fields use the absent / null / value triple.
#[derive(Deserialize, Default, utoipa::ToSchema)]
pub struct UpdateReviewRequest {
    pub outlet_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub visit_date: Option<NaiveDate>,
    pub price: Option<u32>,
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "double_option")]
    pub notes: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub google_map_url: Option<Option<String>>,

    #[serde(default, deserialize_with = "double_option")]
    pub kuah_kekentalan: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub kuah_kaldu: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub kuah_keseimbangan: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub kuah_aroma: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub mie_tekstur: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub mie_tipe: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ayam_bumbu: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub ayam_potongan: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub fasilitas_kebersihan: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub fasilitas_alat_makan: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub fasilitas_tempat: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub service_durasi: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub complexity: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub sweetness: Option<Option<f64>>,
}

/// A review with its computed category scores and price tier.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewResponse {
    pub id: Uuid,
    pub outlet_name: String,
    pub address: String,
    pub city: String,
    pub visit_date: NaiveDate,
    pub price: u32,
    pub price_category: PriceCategory,
    pub product_type: ProductType,
    pub notes: Option<String>,
    pub google_map_url: Option<String>,
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,

    pub kuah_kekentalan: Option<f64>,
    pub kuah_kaldu: Option<f64>,
    pub kuah_keseimbangan: Option<f64>,
    pub kuah_aroma: Option<f64>,
    pub mie_tekstur: Option<f64>,
    pub mie_tipe: Option<String>,
    pub ayam_bumbu: Option<f64>,
    pub ayam_potongan: Option<f64>,
    pub fasilitas_kebersihan: Option<f64>,
    pub fasilitas_alat_makan: Option<f64>,
    pub fasilitas_tempat: Option<f64>,
    pub service_durasi: Option<f64>,
    pub complexity: Option<f64>,
    pub sweetness: Option<f64>,

    /// Persisted product-type-weighted headline score.
    pub overall_score: Option<f64>,
    /// Per-category scores, rounded to one decimal.
    pub scores: CategoryScores,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ComputedReview> for ReviewResponse {
    fn from(computed: ComputedReview) -> Self {
        let r = computed.review;
        Self {
            price_category: categorize_price(r.price),
            id: r.id,
            outlet_name: r.outlet_name,
            address: r.address,
            city: r.city,
            visit_date: r.visit_date,
            price: r.price,
            product_type: r.product_type,
            notes: r.notes,
            google_map_url: r.google_map_url,
            image_url: r.image_url,
            image_urls: r.image_urls,
            kuah_kekentalan: r.kuah_kekentalan,
            kuah_kaldu: r.kuah_kaldu,
            kuah_keseimbangan: r.kuah_keseimbangan,
            kuah_aroma: r.kuah_aroma,
            mie_tekstur: r.mie_tekstur,
            mie_tipe: r.mie_tipe,
            ayam_bumbu: r.ayam_bumbu,
            ayam_potongan: r.ayam_potongan,
            fasilitas_kebersihan: r.fasilitas_kebersihan,
            fasilitas_alat_makan: r.fasilitas_alat_makan,
            fasilitas_tempat: r.fasilitas_tempat,
            service_durasi: r.service_durasi,
            complexity: r.complexity,
            sweetness: r.sweetness,
            overall_score: r.overall_score,
            scores: computed.scores,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewResponse>,
    pub total: u64,
}

/// Distinct cities that currently have at least one review.
#[derive(Serialize, utoipa::ToSchema)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PerceptualMapResponse {
    pub points: Vec<PerceptualPoint>,
}

/// Response for the photo upload endpoint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadPhotosResponse {
    /// Number of photos accepted in this request.
    pub created: usize,
    /// All photo URLs attached to the review, in display order.
    pub image_urls: Vec<String>,
}

/// One outlet on the perceptual map. Axes are re-centered from the 0-10
/// rating scale to [-5, 5], with unrated values sitting at the origin.
#[derive(Serialize, utoipa::ToSchema)]
pub struct PerceptualPoint {
    pub name: String,
    pub complexity: f64,
    pub sweetness: f64,
    pub product_type: ProductType,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ScorecardResponse {
    /// URL of the generated scorecard graphic.
    pub image_url: String,
}

/// Convert a database row plus its photo URLs into the engine's record
/// shape. Fails only on data corruption (bad product type, non-positive
/// price), which no write path should produce.
pub fn to_engine(model: review::Model, image_urls: Vec<String>) -> Result<engine::Review, AppError> {
    let product_type: ProductType = model
        .product_type
        .parse()
        .map_err(|e: String| AppError::Internal(format!("{e} in review {}", model.id)))?;
    let price = u32::try_from(model.price).ok().filter(|p| *p > 0).ok_or_else(|| {
        AppError::Internal(format!(
            "Non-positive price {} in review {}",
            model.price, model.id
        ))
    })?;

    Ok(engine::Review {
        id: model.id,
        outlet_name: model.outlet_name,
        address: model.address,
        city: model.city,
        visit_date: model.visit_date,
        price,
        product_type,
        notes: model.notes,
        google_map_url: model.google_map_url,
        image_url: model.image_url,
        image_urls,
        kuah_kekentalan: model.kuah_kekentalan,
        kuah_kaldu: model.kuah_kaldu,
        kuah_keseimbangan: model.kuah_keseimbangan,
        kuah_aroma: model.kuah_aroma,
        mie_tekstur: model.mie_tekstur,
        mie_tipe: model.mie_tipe,
        ayam_bumbu: model.ayam_bumbu,
        ayam_potongan: model.ayam_potongan,
        fasilitas_kebersihan: model.fasilitas_kebersihan,
        fasilitas_alat_makan: model.fasilitas_alat_makan,
        fasilitas_tempat: model.fasilitas_tempat,
        service_durasi: model.service_durasi,
        complexity: model.complexity,
        sweetness: model.sweetness,
        overall_score: model.overall_score,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn validate_create_review(req: &CreateReviewRequest) -> Result<(), AppError> {
    validate_text(&req.outlet_name, "Outlet name", 200)?;
    validate_text(&req.address, "Address", 500)?;
    validate_text(&req.city, "City", 100)?;
    validate_price(req.price)?;
    validate_optional_text(req.notes.as_deref(), "Notes", 1000)?;
    validate_optional_text(req.mie_tipe.as_deref(), "Noodle type", 100)?;
    validate_optional_url(req.google_map_url.as_deref(), "google_map_url")?;
    for (value, name) in [
        (req.kuah_kekentalan, "kuah_kekentalan"),
        (req.kuah_kaldu, "kuah_kaldu"),
        (req.kuah_keseimbangan, "kuah_keseimbangan"),
        (req.kuah_aroma, "kuah_aroma"),
        (req.mie_tekstur, "mie_tekstur"),
        (req.ayam_bumbu, "ayam_bumbu"),
        (req.ayam_potongan, "ayam_potongan"),
        (req.fasilitas_kebersihan, "fasilitas_kebersihan"),
        (req.fasilitas_alat_makan, "fasilitas_alat_makan"),
        (req.fasilitas_tempat, "fasilitas_tempat"),
        (req.service_durasi, "service_durasi"),
        (req.complexity, "complexity"),
        (req.sweetness, "sweetness"),
    ] {
        validate_rating(value, name)?;
    }
    Ok(())
}

pub fn validate_update_review(req: &UpdateReviewRequest) -> Result<(), AppError> {
    if let Some(ref v) = req.outlet_name {
        validate_text(v, "Outlet name", 200)?;
    }
    if let Some(ref v) = req.address {
        validate_text(v, "Address", 500)?;
    }
    if let Some(ref v) = req.city {
        validate_text(v, "City", 100)?;
    }
    if let Some(price) = req.price {
        validate_price(price)?;
    }
    if let Some(Some(ref v)) = req.notes {
        validate_optional_text(Some(v), "Notes", 1000)?;
    }
    if let Some(Some(ref v)) = req.mie_tipe {
        validate_optional_text(Some(v), "Noodle type", 100)?;
    }
    if let Some(Some(ref v)) = req.google_map_url {
        validate_optional_url(Some(v), "google_map_url")?;
    }
    for (value, name) in [
        (req.kuah_kekentalan, "kuah_kekentalan"),
        (req.kuah_kaldu, "kuah_kaldu"),
        (req.kuah_keseimbangan, "kuah_keseimbangan"),
        (req.kuah_aroma, "kuah_aroma"),
        (req.mie_tekstur, "mie_tekstur"),
        (req.ayam_bumbu, "ayam_bumbu"),
        (req.ayam_potongan, "ayam_potongan"),
        (req.fasilitas_kebersihan, "fasilitas_kebersihan"),
        (req.fasilitas_alat_makan, "fasilitas_alat_makan"),
        (req.fasilitas_tempat, "fasilitas_tempat"),
        (req.service_durasi, "service_durasi"),
        (req.complexity, "complexity"),
        (req.sweetness, "sweetness"),
    ] {
        if let Some(v) = value {
            validate_rating(v, name)?;
        }
    }
    Ok(())
}

/// Apply a PATCH body onto a loaded row, leaving absent fields alone.
pub fn apply_update(model: &mut review::Model, req: UpdateReviewRequest) {
    if let Some(v) = req.outlet_name {
        model.outlet_name = v.trim().to_string();
    }
    if let Some(v) = req.address {
        model.address = v.trim().to_string();
    }
    if let Some(v) = req.city {
        model.city = v.trim().to_string();
    }
    if let Some(v) = req.visit_date {
        model.visit_date = v;
    }
    if let Some(v) = req.price {
        model.price = v as i32;
    }
    if let Some(v) = req.product_type {
        model.product_type = v.as_str().to_string();
    }
    if let Some(v) = req.notes {
        model.notes = v.map(|s| s.trim().to_string());
    }
    if let Some(v) = req.google_map_url {
        model.google_map_url = v;
    }
    if let Some(v) = req.mie_tipe {
        model.mie_tipe = v.map(|s| s.trim().to_string());
    }
    if let Some(v) = req.kuah_kekentalan {
        model.kuah_kekentalan = v;
    }
    if let Some(v) = req.kuah_kaldu {
        model.kuah_kaldu = v;
    }
    if let Some(v) = req.kuah_keseimbangan {
        model.kuah_keseimbangan = v;
    }
    if let Some(v) = req.kuah_aroma {
        model.kuah_aroma = v;
    }
    if let Some(v) = req.mie_tekstur {
        model.mie_tekstur = v;
    }
    if let Some(v) = req.ayam_bumbu {
        model.ayam_bumbu = v;
    }
    if let Some(v) = req.ayam_potongan {
        model.ayam_potongan = v;
    }
    if let Some(v) = req.fasilitas_kebersihan {
        model.fasilitas_kebersihan = v;
    }
    if let Some(v) = req.fasilitas_alat_makan {
        model.fasilitas_alat_makan = v;
    }
    if let Some(v) = req.fasilitas_tempat {
        model.fasilitas_tempat = v;
    }
    if let Some(v) = req.service_durasi {
        model.service_durasi = v;
    }
    if let Some(v) = req.complexity {
        model.complexity = v;
    }
    if let Some(v) = req.sweetness {
        model.sweetness = v;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_request() -> CreateReviewRequest {
        CreateReviewRequest {
            outlet_name: "Mie Ayam Pak Budi".into(),
            address: "Jl. Sudirman 12".into(),
            city: "Solo".into(),
            visit_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            price: 10000,
            product_type: ProductType::Kuah,
            notes: None,
            google_map_url: None,
            kuah_kekentalan: Some(8.0),
            kuah_kaldu: Some(7.0),
            kuah_keseimbangan: Some(9.0),
            kuah_aroma: Some(6.0),
            mie_tekstur: Some(7.0),
            mie_tipe: None,
            ayam_bumbu: Some(8.0),
            ayam_potongan: Some(6.0),
            fasilitas_kebersihan: Some(9.0),
            fasilitas_alat_makan: Some(8.0),
            fasilitas_tempat: Some(7.0),
            service_durasi: None,
            complexity: None,
            sweetness: None,
        }
    }

    fn row() -> review::Model {
        let now = Utc::now();
        review::Model {
            id: Uuid::now_v7(),
            outlet_name: "Mie Ayam Pak Budi".into(),
            address: "Jl. Sudirman 12".into(),
            city: "Solo".into(),
            visit_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            price: 10000,
            product_type: "kuah".into(),
            notes: None,
            google_map_url: None,
            image_url: None,
            kuah_kekentalan: Some(8.0),
            kuah_kaldu: Some(7.0),
            kuah_keseimbangan: Some(9.0),
            kuah_aroma: Some(6.0),
            mie_tekstur: Some(7.0),
            mie_tipe: None,
            ayam_bumbu: Some(8.0),
            ayam_potongan: Some(6.0),
            fasilitas_kebersihan: Some(9.0),
            fasilitas_alat_makan: Some(8.0),
            fasilitas_tempat: Some(7.0),
            service_durasi: None,
            complexity: None,
            sweetness: None,
            overall_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn create_validation_accepts_good_request() {
        assert!(validate_create_review(&create_request()).is_ok());
    }

    #[test]
    fn create_validation_rejects_out_of_range_rating() {
        let mut req = create_request();
        req.kuah_aroma = Some(11.0);
        assert!(validate_create_review(&req).is_err());
    }

    #[test]
    fn row_converts_to_engine_record() {
        let engine_review = to_engine(row(), vec!["/api/v1/images/abc".into()]).unwrap();
        assert_eq!(engine_review.product_type, ProductType::Kuah);
        assert_eq!(engine_review.price, 10000);
        assert_eq!(engine_review.image_urls.len(), 1);

        let scores = engine::compute_scores(&engine_review);
        assert_eq!(scores.kuah, 7.5);
        assert_eq!(scores.fasilitas, 8.0);
    }

    #[test]
    fn corrupt_product_type_is_internal_error() {
        let mut bad = row();
        bad.product_type = "rebus".into();
        assert!(matches!(
            to_engine(bad, Vec::new()),
            Err(AppError::Internal(_))
        ));
    }

    #[test]
    fn patch_clears_nullable_field_and_keeps_absent_ones() {
        let mut model = row();
        model.notes = Some("old note".into());

        let req = UpdateReviewRequest {
            price: Some(12000),
            notes: Some(None),
            ..Default::default()
        };
        apply_update(&mut model, req);

        assert_eq!(model.price, 12000);
        assert_eq!(model.notes, None);
        // Untouched fields survive.
        assert_eq!(model.kuah_kekentalan, Some(8.0));
        assert_eq!(model.outlet_name, "Mie Ayam Pak Budi");
    }

    #[test]
    fn response_includes_scores_and_price_tier() {
        let engine_review = to_engine(row(), Vec::new()).unwrap();
        let response = ReviewResponse::from(ComputedReview::from(engine_review));
        assert_eq!(response.scores.ayam, 7.0);
        assert_eq!(response.price_category.label, "Murah");
        assert_eq!(response.price_category.tier, 2);
    }
}
