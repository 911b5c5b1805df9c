//! Session and API authentication model.
//!
//! The browser flow stores the claims JSON in the actix-identity session;
//! the JSON API accepts the same claims as a bearer JWT minted from the
//! settings page. Both paths resolve to [`AuthenticatedUser`].

use actix_identity::Identity;
use actix_web::dev::Payload;
use actix_web::error::ErrorUnauthorized;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, web};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::config::ServerConfig;

/// Role granting read access to every page.
pub const ACCESS_ROLE: &str = "dba";
/// Role granting mutating operations (scripts, projects, settings, writes).
pub const ADMIN_ROLE: &str = "dba_admin";

/// Claims describing the signed-in operator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AuthenticatedUser {
    /// Login name.
    pub sub: String,
    pub email: String,
    pub roles: Vec<String>,
    /// Token id, for audit correlation.
    pub jti: String,
    /// Expiry (seconds since epoch).
    pub exp: i64,
}

impl AuthenticatedUser {
    /// Claims for the configured administrator account.
    pub fn admin(username: &str, email: &str, ttl_secs: i64) -> Self {
        Self {
            sub: username.to_string(),
            email: email.to_string(),
            roles: vec![ACCESS_ROLE.to_string(), ADMIN_ROLE.to_string()],
            jti: Uuid::new_v4().to_string(),
            exp: Utc::now().timestamp() + ttl_secs,
        }
    }

    /// Read-only claims for the demo session.
    pub fn demo() -> Self {
        Self {
            sub: "demo".to_string(),
            email: "demo@localhost".to_string(),
            roles: vec![ACCESS_ROLE.to_string()],
            jti: Uuid::new_v4().to_string(),
            exp: Utc::now().timestamp() + 12 * 3600,
        }
    }

    /// Mint an HS256 bearer token carrying these claims.
    pub fn to_jwt(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Verify a bearer token and return its claims. Expiry is checked.
    pub fn from_jwt(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
    }
}

fn from_session(identity: &Identity) -> Option<AuthenticatedUser> {
    let raw = identity.id().ok()?;
    serde_json::from_str(&raw).ok()
}

fn from_bearer(req: &HttpRequest) -> Option<AuthenticatedUser> {
    let config = req.app_data::<web::Data<ServerConfig>>()?;
    let header = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    match AuthenticatedUser::from_jwt(token, &config.secret) {
        Ok(user) => Some(user),
        Err(e) => {
            log::warn!("Rejected bearer token: {e}");
            None
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        Box::pin(async move {
            if let Ok(identity) = Identity::from_request(&req, &mut Payload::None).await
                && let Some(user) = from_session(&identity)
            {
                return Ok(user);
            }
            if let Some(user) = from_bearer(&req) {
                return Ok(user);
            }
            Err(ErrorUnauthorized("authentication required"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789012345678901234567890101234567890123456789012345678901";

    #[test]
    fn jwt_round_trip_preserves_claims() {
        let user = AuthenticatedUser::admin("admin", "admin@localhost", 3600);
        let token = user.to_jwt(SECRET).unwrap();
        let decoded = AuthenticatedUser::from_jwt(&token, SECRET).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let mut user = AuthenticatedUser::admin("admin", "admin@localhost", 3600);
        user.exp = Utc::now().timestamp() - 600;
        let token = user.to_jwt(SECRET).unwrap();
        assert!(AuthenticatedUser::from_jwt(&token, SECRET).is_err());
    }

    #[test]
    fn demo_claims_are_read_only() {
        let user = AuthenticatedUser::demo();
        assert!(user.roles.contains(&ACCESS_ROLE.to_string()));
        assert!(!user.roles.contains(&ADMIN_ROLE.to_string()));
    }
}
