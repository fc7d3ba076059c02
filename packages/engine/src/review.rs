use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Dish variant of a reviewed outlet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    /// Served with broth.
    Kuah,
    /// Fried, no broth component.
    Goreng,
}

impl ProductType {
    pub fn as_str(self) -> &'static str {
        match self {
            ProductType::Kuah => "kuah",
            ProductType::Goreng => "goreng",
        }
    }
}

impl std::str::FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "kuah" => Ok(ProductType::Kuah),
            "goreng" => Ok(ProductType::Goreng),
            other => Err(format!("unknown product type '{other}'")),
        }
    }
}

/// A review record as persisted.
///
/// Every sub-rating is on a 0-10 scale and optional. `None` means the
/// attribute was never rated; aggregation treats it as 0 (a documented
/// policy, not a bug), but the distinction is kept at the type level.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub outlet_name: String,
    pub address: String,
    pub city: String,
    pub visit_date: NaiveDate,
    /// Price in whole rupiah. Always positive; enforced at the write boundary.
    pub price: u32,
    pub product_type: ProductType,
    pub notes: Option<String>,
    pub google_map_url: Option<String>,
    /// Legacy single-image column, superseded by `image_urls`.
    pub image_url: Option<String>,
    pub image_urls: Vec<String>,

    // Broth attributes, meaningful only for `kuah` outlets.
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

    /// Serving duration rating.
    pub service_durasi: Option<f64>,

    // Perceptual-map axes, conceptually centered at 5 on the 0-10 scale.
    pub complexity: Option<f64>,
    pub sweetness: Option<f64>,

    /// Weighted overall score cached at write time so listings can sort
    /// without recomputing. Rewritten on every update.
    pub overall_score: Option<f64>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-category scores, each in [0, 10], rounded to one decimal place.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CategoryScores {
    pub kuah: f64,
    pub mie: f64,
    pub ayam: f64,
    pub fasilitas: f64,
}

/// A review annotated with its computed scores.
///
/// `value_score` is a ranking-only quantity: unbounded above, rewards low
/// price and high quality. It is deliberately distinct from the persisted
/// `overall_score` and is never shown as a star rating.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ComputedReview {
    #[serde(flatten)]
    pub review: Review,
    pub scores: CategoryScores,
    pub value_score: f64,
}

impl From<Review> for ComputedReview {
    fn from(review: Review) -> Self {
        let scores = crate::score::compute_scores(&review);
        let value_score = crate::score::value_score(&review);
        Self {
            review,
            scores,
            value_score,
        }
    }
}
