//! Business rules behind the JSON API.
//!
//! Services are generic over the repository traits they need so they can be
//! exercised against [`crate::repository::mock::MockRepository`].

use std::collections::BTreeSet;
use std::str::FromStr;

use thiserror::Error;

use crate::domain::types::{TypeConstraintError, UserId};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::ResultPage;
use crate::query::descriptor::{FilterKey, FilterValue, QueryDescriptor};
use crate::query::filters::{STATUS_DISABLED, STATUS_ENABLED};
use crate::query::QueryError;
use crate::repository::UserReader;
use crate::repository::errors::RepositoryError;

pub mod applications;
pub mod catalog;
pub mod jobs;
pub mod users;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Caller lacks the role or ownership the operation needs.
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    /// Duplicate name, repeated application or a record still in use.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => ServiceError::Internal(other.to_string()),
        }
    }
}

/// Fails with [`ServiceError::Unauthorized`] unless the caller holds `role`.
pub fn ensure_role(user: &AuthenticatedUser, role: &str) -> ServiceResult<()> {
    ensure_any_role(user, &[role])
}

pub fn ensure_any_role(user: &AuthenticatedUser, roles: &[&str]) -> ServiceResult<()> {
    if roles.iter().any(|role| user.has_role(role)) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Resolves the caller's account and rejects unknown or disabled ones.
pub fn ensure_active_account<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<UserId>
where
    R: UserReader + ?Sized,
{
    let user_id = user.user_id()?;
    match repo.get_user_by_id(user_id)? {
        Some(account) if account.enabled => Ok(user_id),
        Some(_) => {
            log::warn!("Disabled account {user_id} attempted a write");
            Err(ServiceError::Unauthorized)
        }
        None => Err(ServiceError::Unauthorized),
    }
}

/// Non-empty search text of the descriptor.
pub(crate) fn search_term<K: FilterKey>(descriptor: &QueryDescriptor<K>) -> Option<String> {
    Some(descriptor.search())
        .filter(|search| !search.is_empty())
        .map(str::to_string)
}

/// Parses every value of a multi-value filter.
pub(crate) fn parse_values<T>(name: &str, values: &BTreeSet<String>) -> ServiceResult<Vec<T>>
where
    T: FromStr<Err = TypeConstraintError>,
{
    values
        .iter()
        .map(|value| parse_value(name, value))
        .collect()
}

pub(crate) fn parse_value<T>(name: &str, value: &str) -> ServiceResult<T>
where
    T: FromStr<Err = TypeConstraintError>,
{
    value.parse().map_err(|err: TypeConstraintError| {
        ServiceError::Query(QueryError::validation(format!("`{name}`: {err}")))
    })
}

/// Reads an `enabled`/`disabled` status filter.
pub(crate) fn enabled_filter(value: Option<&FilterValue>) -> ServiceResult<Option<bool>> {
    match value.and_then(FilterValue::as_single) {
        None => Ok(None),
        Some(STATUS_ENABLED) => Ok(Some(true)),
        Some(STATUS_DISABLED) => Ok(Some(false)),
        Some(other) => Err(ServiceError::Query(QueryError::validation(format!(
            "`status` must be `{STATUS_ENABLED}` or `{STATUS_DISABLED}`, got `{other}`"
        )))),
    }
}

/// Wraps a repository `(total, items)` pair for the requested page.
pub(crate) fn result_page<K: FilterKey, T>(
    descriptor: &QueryDescriptor<K>,
    (total, items): (usize, Vec<T>),
) -> ResultPage<T> {
    ResultPage::new(items, total, descriptor.page(), descriptor.page_size())
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDateTime;

    use crate::domain::types::{UserEmail, UserId, UserName};
    use crate::domain::user::{Role, User};
    use crate::models::auth::AuthenticatedUser;

    pub fn claims(id: i32, role: &str) -> AuthenticatedUser {
        AuthenticatedUser {
            sub: id.to_string(),
            email: format!("user{id}@example.com"),
            name: format!("User {id}"),
            roles: vec![role.to_string()],
            exp: 4_102_444_800,
        }
    }

    pub fn account(id: i32, role: Role, enabled: bool) -> User {
        User {
            id: UserId::new(id).unwrap(),
            email: UserEmail::new(format!("user{id}@example.com")).unwrap(),
            name: UserName::new(format!("User {id}")).unwrap(),
            role,
            enabled,
            created_at: NaiveDateTime::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{account, claims};
    use super::*;
    use crate::domain::user::Role;
    use crate::repository::mock::MockRepository;

    #[test]
    fn role_checks_accept_any_listed_role() {
        let employer = claims(1, crate::ROLE_EMPLOYER);
        assert!(ensure_role(&employer, crate::ROLE_EMPLOYER).is_ok());
        assert!(matches!(
            ensure_role(&employer, crate::ROLE_ADMIN),
            Err(ServiceError::Unauthorized)
        ));
        assert!(ensure_any_role(&employer, &[crate::ROLE_ADMIN, crate::ROLE_EMPLOYER]).is_ok());
    }

    #[test]
    fn disabled_account_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(account(id.get(), Role::Employer, false))));

        let result = ensure_active_account(&repo, &claims(4, crate::ROLE_EMPLOYER));
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn status_filter_maps_to_enabled_flag() {
        assert_eq!(enabled_filter(None).unwrap(), None);
        assert_eq!(
            enabled_filter(Some(&FilterValue::single("disabled"))).unwrap(),
            Some(false)
        );
        assert!(matches!(
            enabled_filter(Some(&FilterValue::single("archived"))),
            Err(ServiceError::Query(QueryError::Validation(_)))
        ));
    }

    #[test]
    fn constraint_violation_becomes_conflict() {
        let err = ServiceError::from(RepositoryError::ConstraintViolation("dup".to_string()));
        assert!(matches!(err, ServiceError::Conflict(_)));
    }
}
