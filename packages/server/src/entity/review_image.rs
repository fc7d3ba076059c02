use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// An uploaded photo attached to a review, at most 6 per review
/// (enforced at the upload handler, not here).
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "review_image")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(belongs_to, from = "review_id", to = "id")]
    pub review: BelongsTo<super::review::Entity>,
    pub review_id: Uuid,

    /// Public URL under which the server serves the blob.
    pub url: String,
    pub content_hash: String,
    pub content_type: Option<String>,
    /// Display order within the review, assigned at upload.
    pub position: i32,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
