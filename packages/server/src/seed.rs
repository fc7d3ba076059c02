use sea_orm::*;
use tracing::info;

use crate::config::AuthConfig;
use crate::entity::{user, user_role};
use crate::utils::hash;

/// Ensure the configured bootstrap admin account exists.
///
/// Mirrors a one-shot "create admin" provisioning step: creates the user
/// with the configured credentials and grants the admin role, doing
/// nothing when the account is already present. Skipped entirely when no
/// bootstrap credentials are configured.
pub async fn seed_bootstrap_admin(db: &DatabaseConnection, auth: &AuthConfig) -> anyhow::Result<()> {
    let username = auth.bootstrap_admin_username.trim();
    if username.is_empty() || auth.bootstrap_admin_password.is_empty() {
        return Ok(());
    }

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    let user_id = match existing {
        Some(u) => u.id,
        None => {
            let password_hash = hash::hash_password(&auth.bootstrap_admin_password)
                .map_err(|e| anyhow::anyhow!("Password hash error: {e}"))?;
            let model = user::ActiveModel {
                username: Set(username.to_string()),
                password: Set(password_hash),
                created_at: Set(chrono::Utc::now()),
                ..Default::default()
            };
            let created = model.insert(db).await?;
            info!("Created bootstrap admin user '{username}'");
            created.id
        }
    };

    let has_admin = user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user_id))
        .filter(user_role::Column::Role.eq(user_role::ROLE_ADMIN))
        .one(db)
        .await?
        .is_some();

    if !has_admin {
        let grant = user_role::ActiveModel {
            id: Set(uuid::Uuid::now_v7()),
            user_id: Set(user_id),
            role: Set(user_role::ROLE_ADMIN.to_string()),
        };
        grant.insert(db).await?;
        info!("Granted admin role to '{username}'");
    }

    Ok(())
}

/// Load the roles granted to a user, for embedding into a session token.
pub async fn roles_for_user(db: &DatabaseConnection, user_id: i32) -> Result<Vec<String>, DbErr> {
    let rows = user_role::Entity::find()
        .filter(user_role::Column::UserId.eq(user_id))
        .all(db)
        .await?;
    Ok(rows.into_iter().map(|r| r.role).collect())
}
