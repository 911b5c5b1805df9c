//! Page services: pure business logic between routes and the repositories.

use thiserror::Error;

use crate::inspector::InspectorError;
use crate::models::auth::AuthenticatedUser;
use crate::repository::errors::RepositoryError;

pub mod auth;
pub mod dashboard;
pub mod editor;
pub mod projects;
pub mod settings;
pub mod tables;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Form error: {0}")]
    Form(String),

    #[error(transparent)]
    Inspector(#[from] InspectorError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ValidationError(msg) => ServiceError::Form(msg),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// True when the user carries the given role.
pub fn check_role(role: &str, roles: &[String]) -> bool {
    roles.iter().any(|r| r == role)
}

/// Guards a service entry point behind a role.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    if check_role(role, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_role_matches_exactly() {
        let roles = vec!["dba".to_string(), "dba_admin".to_string()];
        assert!(check_role("dba", &roles));
        assert!(check_role("dba_admin", &roles));
        assert!(!check_role("dba_", &roles));
        assert!(!check_role("admin", &roles));
    }

    #[test]
    fn repository_not_found_maps_to_service_not_found() {
        let err: ServiceError = RepositoryError::NotFound.into();
        assert!(matches!(err, ServiceError::NotFound));
    }
}
