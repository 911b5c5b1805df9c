//! Login verification against the configured administrator account.

use crate::models::auth::AuthenticatedUser;
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult};

/// Browser sessions are re-issued on login with this lifetime.
pub const SESSION_TTL_SECS: i64 = 12 * 3600;

/// Verifies the login form against the configured admin account.
pub fn authenticate(
    config: &ServerConfig,
    username: &str,
    password: &str,
) -> ServiceResult<AuthenticatedUser> {
    if username != config.admin.username || !verify_password(&config.admin.password, password) {
        return Err(ServiceError::Unauthorized);
    }

    Ok(AuthenticatedUser::admin(
        &config.admin.username,
        &config.admin.email,
        SESSION_TTL_SECS,
    ))
}

/// Read-only claims for the demo login button.
pub fn demo_session() -> AuthenticatedUser {
    AuthenticatedUser::demo()
}

/// The configured password may be stored as a bcrypt hash or, for local
/// setups, as plaintext.
fn verify_password(expected: &str, provided: &str) -> bool {
    if expected.starts_with("$2") {
        bcrypt::verify(provided, expected).unwrap_or(false)
    } else {
        constant_time_eq(expected.as_bytes(), provided.as_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::ADMIN_ROLE;
    use crate::models::config::AdminConfig;

    fn config_with_password(password: &str) -> ServerConfig {
        ServerConfig {
            domain: "localhost".to_string(),
            address: "127.0.0.1".to_string(),
            port: 8080,
            secret: "x".repeat(64),
            database_url: ":memory:".to_string(),
            templates_dir: "templates/**/*.html".to_string(),
            app_title: "sqldeck".to_string(),
            admin: AdminConfig {
                username: "admin".to_string(),
                password: password.to_string(),
                email: "admin@localhost".to_string(),
            },
            supabase: None,
            remote: None,
            monitoring: Default::default(),
        }
    }

    #[test]
    fn plaintext_password_authenticates() {
        let config = config_with_password("s3cret");
        let user = authenticate(&config, "admin", "s3cret").unwrap();
        assert!(user.roles.contains(&ADMIN_ROLE.to_string()));

        assert!(matches!(
            authenticate(&config, "admin", "wrong"),
            Err(ServiceError::Unauthorized)
        ));
        assert!(matches!(
            authenticate(&config, "root", "s3cret"),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn bcrypt_password_authenticates() {
        let hash = bcrypt::hash("s3cret", 4).unwrap();
        let config = config_with_password(&hash);
        assert!(authenticate(&config, "admin", "s3cret").is_ok());
        assert!(authenticate(&config, "admin", "wrong").is_err());
    }

    #[test]
    fn demo_session_has_no_admin_role() {
        let user = demo_session();
        assert!(!user.roles.contains(&ADMIN_ROLE.to_string()));
    }
}
