//! Admin user management.

use crate::ROLE_ADMIN;
use crate::domain::types::UserId;
use crate::domain::user::{Role, User};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::ResultPage;
use crate::query::{FilterKey, QueryDescriptor};
use crate::query::filters::UserFilter;
use crate::repository::{UserListQuery, UserReader, UserWriter};
use crate::services::{
    ServiceError, ServiceResult, enabled_filter, ensure_role, parse_values, result_page,
    search_term,
};

/// Accounts filtered by role and status, searched by name and email.
pub fn list_users<R>(
    repo: &R,
    user: &AuthenticatedUser,
    descriptor: &QueryDescriptor<UserFilter>,
) -> ServiceResult<ResultPage<User>>
where
    R: UserReader + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let mut query = UserListQuery::new();
    if let Some(term) = search_term(descriptor) {
        query = query.search(term);
    }
    if let Some(raw) = descriptor
        .filter(UserFilter::Role)
        .and_then(|value| value.as_many())
    {
        query = query.roles(parse_values::<Role>(UserFilter::Role.as_str(), raw)?);
    }
    if let Some(enabled) = enabled_filter(descriptor.filter(UserFilter::Status))? {
        query = query.enabled(enabled);
    }
    let query = query
        .sort(descriptor.sort())
        .paginate(descriptor.page(), descriptor.page_size());

    Ok(result_page(descriptor, repo.list_users(query)?))
}

/// Enables or disables an account; admins cannot disable themselves.
pub fn toggle_user<R>(repo: &R, user: &AuthenticatedUser, user_id: i32) -> ServiceResult<User>
where
    R: UserReader + UserWriter + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let user_id = UserId::new(user_id)?;
    let account = repo.get_user_by_id(user_id)?.ok_or(ServiceError::NotFound)?;

    if account.enabled && user.user_id()? == user_id {
        return Err(ServiceError::Form(
            "You cannot disable your own account".to_string(),
        ));
    }

    let updated = repo.set_user_enabled(user_id, !account.enabled)?;
    log::info!(
        "User {user_id} {} by {}",
        if updated.enabled { "enabled" } else { "disabled" },
        user.email
    );

    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryConfig;
    use crate::query::QueryError;
    use crate::query::descriptor::FilterValue;
    use crate::query::filters::STATUS_ENABLED;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{account, claims};

    #[test]
    fn role_and_status_filters_are_applied() {
        let descriptor = QueryDescriptor::<UserFilter>::initial(&QueryConfig::default())
            .with_filter(UserFilter::Role, FilterValue::many(["employer"]))
            .unwrap()
            .with_filter(UserFilter::Status, FilterValue::single(STATUS_ENABLED))
            .unwrap();

        let mut repo = MockRepository::new();
        repo.expect_list_users()
            .withf(|query| query.roles == vec![Role::Employer] && query.enabled == Some(true))
            .returning(|_| Ok((1, vec![account(2, Role::Employer, true)])));

        let page = list_users(&repo, &claims(1, crate::ROLE_ADMIN), &descriptor).unwrap();
        assert_eq!(page.items[0].role, Role::Employer);
    }

    #[test]
    fn unknown_role_is_rejected() {
        let descriptor = QueryDescriptor::<UserFilter>::initial(&QueryConfig::default())
            .with_filter(UserFilter::Role, FilterValue::many(["owner"]))
            .unwrap();

        let repo = MockRepository::new();
        assert!(matches!(
            list_users(&repo, &claims(1, crate::ROLE_ADMIN), &descriptor),
            Err(ServiceError::Query(QueryError::Validation(_)))
        ));
    }

    #[test]
    fn admin_cannot_disable_self() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(account(id.get(), Role::Admin, true))));
        repo.expect_set_user_enabled().never();

        assert!(matches!(
            toggle_user(&repo, &claims(1, crate::ROLE_ADMIN), 1),
            Err(ServiceError::Form(_))
        ));
    }

    #[test]
    fn toggle_disables_another_account() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(account(id.get(), Role::Candidate, true))));
        repo.expect_set_user_enabled()
            .withf(|id, enabled| id.get() == 5 && !*enabled)
            .returning(|id, enabled| Ok(account(id.get(), Role::Candidate, enabled)));

        let updated = toggle_user(&repo, &claims(1, crate::ROLE_ADMIN), 5).unwrap();
        assert!(!updated.enabled);
    }
}
