use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review")]
pub struct Model {
    /// UUIDv7 primary key, immutable once created.
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub outlet_name: String,
    pub address: String,
    pub city: String,
    pub visit_date: Date,
    /// Price in whole rupiah, always positive.
    pub price: i32,
    /// `kuah` or `goreng`.
    pub product_type: String,
    pub notes: Option<String>,
    pub google_map_url: Option<String>,
    /// Legacy single-image column, kept for rows predating multi-photo
    /// uploads. New photos go through `review_image`.
    pub image_url: Option<String>,

    // Sub-ratings, 0-10 scale, absent when never rated.
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

    /// Weighted overall score cached at write time; recomputed on every
    /// update together with the sub-ratings that feed it.
    pub overall_score: Option<f64>,

    #[sea_orm(has_many)]
    pub images: HasMany<super::review_image::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
