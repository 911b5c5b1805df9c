//! Settings page services: application settings, connection status,
//! and API token minting.

use std::time::Duration;

use crate::capabilities::CapabilitySet;
use crate::domain::activity::NewActivityEntry;
use crate::domain::settings::AppSettings;
use crate::dto::settings::SettingsPageData;
use crate::forms::settings::{SettingsForm, TokenForm};
use crate::inspector::DatabaseInspector;
use crate::models::auth::{ACCESS_ROLE, ADMIN_ROLE, AuthenticatedUser};
use crate::models::config::ServerConfig;
use crate::services::{ServiceError, ServiceResult, ensure_role};

/// Loads the settings page: stored settings, capability flags, and the
/// table names offered in the monitored-tables selector.
pub async fn load_settings_page<R>(
    repo: &R,
    inspector: &dyn DatabaseInspector,
    capabilities: CapabilitySet,
    user: &AuthenticatedUser,
) -> ServiceResult<SettingsPageData>
where
    R: crate::repository::SettingsReader + ?Sized,
{
    ensure_role(user, ACCESS_ROLE)?;

    let settings = repo.load_settings()?;

    // The selector is best-effort; a backend failure leaves it empty.
    let available_tables = match inspector.list_tables().await {
        Ok(tables) => tables.into_iter().map(|t| t.name).collect(),
        Err(e) => {
            log::warn!("Failed to list tables for the settings page: {e}");
            Vec::new()
        }
    };

    Ok(SettingsPageData {
        settings,
        capabilities,
        backend_name: inspector.backend_name(),
        live: inspector.is_live(),
        available_tables,
        app_version: env!("CARGO_PKG_VERSION"),
    })
}

/// Clamps and persists the settings form.
pub fn save_settings<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: SettingsForm,
) -> ServiceResult<AppSettings>
where
    R: crate::repository::SettingsWriter + crate::repository::ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    let settings: AppSettings = form.into();
    repo.save_settings(&settings).map_err(|err| {
        log::error!("Failed to save settings: {err}");
        err
    })?;
    repo.log_activity(&NewActivityEntry::new(&user.sub, "Settings saved"))?;

    Ok(settings)
}

/// Round-trips the backend and returns the observed latency.
pub async fn test_connection(
    inspector: &dyn DatabaseInspector,
    user: &AuthenticatedUser,
) -> ServiceResult<Duration> {
    ensure_role(user, ACCESS_ROLE)?;

    let latency = inspector.ping().await.map_err(|err| {
        log::warn!("Connection test failed: {err}");
        err
    })?;

    Ok(latency)
}

/// Mints a bearer token for the JSON API, carrying the admin claims.
pub fn mint_api_token<R>(
    repo: &R,
    config: &ServerConfig,
    user: &AuthenticatedUser,
    form: TokenForm,
) -> ServiceResult<String>
where
    R: crate::repository::ActivityWriter + ?Sized,
{
    ensure_role(user, ADMIN_ROLE)?;

    let ttl_days = form.ttl_days.clamp(1, 365);
    let claims = AuthenticatedUser::admin(
        &config.admin.username,
        &config.admin.email,
        ttl_days * 24 * 3600,
    );
    let token = claims
        .to_jwt(&config.secret)
        .map_err(|e| ServiceError::Internal(format!("failed to sign token: {e}")))?;

    repo.log_activity(
        &NewActivityEntry::new(&user.sub, "API token minted")
            .details(format!("valid {ttl_days} days, id {}", claims.jti)),
    )?;

    Ok(token)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::repository::mock::MockRepository;

    #[test]
    fn save_settings_requires_admin_role() {
        let mut repo = MockRepository::new();
        repo.expect_save_settings().times(0);

        let form = SettingsForm {
            items_per_page: 20,
            max_result_rows: 100,
            allow_writes: None,
            slow_query_ms: 5000,
            monitored_tables: vec![],
        };
        let result = save_settings(&repo, &AuthenticatedUser::demo(), form);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn saved_settings_are_clamped() {
        let mut repo = MockRepository::new();
        repo.expect_save_settings().times(1).returning(|_| Ok(()));
        repo.expect_log_activity().times(1).returning(|_| Ok(()));

        let form = SettingsForm {
            items_per_page: 1_000,
            max_result_rows: 100,
            allow_writes: Some("on".to_string()),
            slow_query_ms: 5_000,
            monitored_tables: vec![],
        };
        let user = AuthenticatedUser::admin("admin", "admin@localhost", 3600);
        let settings = save_settings(&repo, &user, form).unwrap();
        assert_eq!(settings.items_per_page, 100);
        assert!(settings.allow_writes);
    }
}
