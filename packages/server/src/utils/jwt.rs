use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

/// JWT Claims structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Username.
    pub sub: String,
    /// User ID.
    pub uid: i32,
    /// Roles granted to the user ("admin", "user").
    pub roles: Vec<String>,
    /// Expiration timestamp.
    pub exp: usize,
}

/// Sign a new JWT token for a user, valid for 7 days.
pub fn sign(user_id: i32, username: &str, roles: Vec<String>, secret: &str) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(7))
        .expect("valid timestamp")
        .timestamp();

    let claims = Claims {
        sub: username.to_owned(),
        uid: user_id,
        roles,
        exp: expiration as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

/// Verify and decode a JWT token.
pub fn verify(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_verify_round_trip() {
        let token = sign(7, "ranger", vec!["admin".into()], "test-secret").unwrap();
        let claims = verify(&token, "test-secret").unwrap();
        assert_eq!(claims.uid, 7);
        assert_eq!(claims.sub, "ranger");
        assert_eq!(claims.roles, ["admin"]);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = sign(1, "ranger", Vec::new(), "secret-a").unwrap();
        assert!(verify(&token, "secret-b").is_err());
    }
}
