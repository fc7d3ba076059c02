use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Role grantable to a user.
pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// A role granted to a user. The admin/user split is the only
/// authorization boundary in the system.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_role")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: BelongsTo<super::user::Entity>,
    pub user_id: i32,

    pub role: String,
}

impl ActiveModelBehavior for ActiveModel {}
