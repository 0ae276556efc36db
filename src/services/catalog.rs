//! Categories and skills: public lookups and admin management.

use crate::ROLE_ADMIN;
use crate::domain::catalog::{Category, Skill};
use crate::domain::types::{CatalogName, CategoryId, SkillId};
use crate::forms::catalog::CatalogForm;
use crate::models::auth::AuthenticatedUser;
use crate::pagination::ResultPage;
use crate::query::QueryDescriptor;
use crate::query::filters::CatalogFilter;
use crate::repository::errors::RepositoryError;
use crate::repository::{
    CatalogListQuery, CategoryReader, CategoryWriter, SkillReader, SkillWriter,
};
use crate::services::{
    ServiceError, ServiceResult, enabled_filter, ensure_role, result_page, search_term,
};

/// Builds the repository query; public callers only ever see enabled entries.
fn catalog_query(
    descriptor: &QueryDescriptor<CatalogFilter>,
    public: bool,
) -> ServiceResult<CatalogListQuery> {
    let mut query = CatalogListQuery::new();
    if let Some(term) = search_term(descriptor) {
        query = query.search(term);
    }

    let enabled = if public {
        Some(true)
    } else {
        enabled_filter(descriptor.filter(CatalogFilter::Status))?
    };
    if let Some(enabled) = enabled {
        query = query.enabled(enabled);
    }

    Ok(query
        .sort(descriptor.sort())
        .paginate(descriptor.page(), descriptor.page_size()))
}

/// Categories referenced by postings cannot be deleted; skills cascade.
fn category_in_use(err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::ConstraintViolation(_) => {
            ServiceError::Conflict("Category is still used by job postings".to_string())
        }
        other => other.into(),
    }
}

pub fn list_categories<R>(
    repo: &R,
    descriptor: &QueryDescriptor<CatalogFilter>,
) -> ServiceResult<ResultPage<Category>>
where
    R: CategoryReader + ?Sized,
{
    let query = catalog_query(descriptor, true)?;
    Ok(result_page(descriptor, repo.list_categories(query)?))
}

pub fn list_skills<R>(
    repo: &R,
    descriptor: &QueryDescriptor<CatalogFilter>,
) -> ServiceResult<ResultPage<Skill>>
where
    R: SkillReader + ?Sized,
{
    let query = catalog_query(descriptor, true)?;
    Ok(result_page(descriptor, repo.list_skills(query)?))
}

/// Every category, honouring the `status` filter.
pub fn admin_list_categories<R>(
    repo: &R,
    user: &AuthenticatedUser,
    descriptor: &QueryDescriptor<CatalogFilter>,
) -> ServiceResult<ResultPage<Category>>
where
    R: CategoryReader + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let query = catalog_query(descriptor, false)?;
    Ok(result_page(descriptor, repo.list_categories(query)?))
}

pub fn admin_list_skills<R>(
    repo: &R,
    user: &AuthenticatedUser,
    descriptor: &QueryDescriptor<CatalogFilter>,
) -> ServiceResult<ResultPage<Skill>>
where
    R: SkillReader + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let query = catalog_query(descriptor, false)?;
    Ok(result_page(descriptor, repo.list_skills(query)?))
}

pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: CatalogForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let name = CatalogName::try_from(form)?;
    Ok(repo.create_category(&name)?)
}

pub fn create_skill<R>(repo: &R, user: &AuthenticatedUser, form: CatalogForm) -> ServiceResult<Skill>
where
    R: SkillWriter + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let name = CatalogName::try_from(form)?;
    Ok(repo.create_skill(&name)?)
}

/// Flips the `enabled` flag of a category.
pub fn toggle_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
) -> ServiceResult<Category>
where
    R: CategoryReader + CategoryWriter + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let category_id = CategoryId::new(category_id)?;
    let category = repo
        .get_category_by_id(category_id)?
        .ok_or(ServiceError::NotFound)?;

    Ok(repo.set_category_enabled(category_id, !category.enabled)?)
}

/// Flips the `enabled` flag of a skill.
pub fn toggle_skill<R>(repo: &R, user: &AuthenticatedUser, skill_id: i32) -> ServiceResult<Skill>
where
    R: SkillReader + SkillWriter + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    let skill_id = SkillId::new(skill_id)?;
    let skill = repo.get_skill_by_id(skill_id)?.ok_or(ServiceError::NotFound)?;

    Ok(repo.set_skill_enabled(skill_id, !skill.enabled)?)
}

pub fn delete_category<R>(repo: &R, user: &AuthenticatedUser, category_id: i32) -> ServiceResult<()>
where
    R: CategoryWriter + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    repo.delete_category(CategoryId::new(category_id)?)
        .map_err(category_in_use)
}

pub fn delete_skill<R>(repo: &R, user: &AuthenticatedUser, skill_id: i32) -> ServiceResult<()>
where
    R: SkillWriter + ?Sized,
{
    ensure_role(user, ROLE_ADMIN)?;

    Ok(repo.delete_skill(SkillId::new(skill_id)?)?)
}
