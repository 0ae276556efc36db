//! Job postings: public search, employer listings and posting management.

use crate::domain::job::{Job, JobType};
use crate::domain::types::{CategoryId, JobId, SkillId};
use crate::forms::jobs::{CreateJobForm, CreateJobPayload};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::ResultPage;
use crate::query::{FilterKey, QueryDescriptor};
use crate::query::filters::JobFilter;
use crate::repository::{
    CategoryReader, JobListQuery, JobReader, JobWriter, SkillReader, UserReader,
};
use crate::services::{
    ServiceError, ServiceResult, ensure_active_account, ensure_any_role, parse_value,
    parse_values, result_page, search_term,
};
use crate::{ROLE_ADMIN, ROLE_EMPLOYER};

/// Applies the descriptor's search, filters, sort and page to `query`.
fn apply_descriptor(
    mut query: JobListQuery,
    descriptor: &QueryDescriptor<JobFilter>,
) -> ServiceResult<JobListQuery> {
    if let Some(term) = search_term(descriptor) {
        query = query.search(term);
    }

    for (key, value) in descriptor.filters() {
        query = match key {
            JobFilter::Category => match value.as_single() {
                Some(raw) => query.category(parse_value::<CategoryId>(key.as_str(), raw)?),
                None => query,
            },
            JobFilter::JobType => match value.as_many() {
                Some(raw) => query.job_types(parse_values::<JobType>(key.as_str(), raw)?),
                None => query,
            },
            JobFilter::Salary => match value.as_range() {
                Some((min, max)) => query.salary(min, max),
                None => query,
            },
            JobFilter::Skills => match value.as_many() {
                Some(raw) => query.skills(parse_values::<SkillId>(key.as_str(), raw)?),
                None => query,
            },
            JobFilter::Location => match value.as_single() {
                Some(raw) => query.location(raw),
                None => query,
            },
        };
    }

    Ok(query
        .sort(descriptor.sort())
        .paginate(descriptor.page(), descriptor.page_size()))
}

/// Open postings matching the descriptor.
pub fn list_open_jobs<R>(
    repo: &R,
    descriptor: &QueryDescriptor<JobFilter>,
) -> ServiceResult<ResultPage<Job>>
where
    R: JobReader + ?Sized,
{
    let query = apply_descriptor(JobListQuery::open(), descriptor)?;
    Ok(result_page(descriptor, repo.list_jobs(query)?))
}

/// The caller's own postings, open or closed.
pub fn list_employer_jobs<R>(
    repo: &R,
    user: &AuthenticatedUser,
    descriptor: &QueryDescriptor<JobFilter>,
) -> ServiceResult<ResultPage<Job>>
where
    R: JobReader + ?Sized,
{
    ensure_any_role(user, &[ROLE_EMPLOYER, ROLE_ADMIN])?;

    let query = apply_descriptor(JobListQuery::for_employer(user.user_id()?), descriptor)?;
    Ok(result_page(descriptor, repo.list_jobs(query)?))
}

/// Loads an open posting.
pub fn get_job<R>(repo: &R, job_id: i32) -> ServiceResult<Job>
where
    R: JobReader + ?Sized,
{
    let job = repo
        .get_job_by_id(JobId::new(job_id)?)?
        .ok_or(ServiceError::NotFound)?;

    if !job.is_open {
        return Err(ServiceError::NotFound);
    }

    Ok(job)
}

/// Validates the form and publishes the posting under the caller's account.
pub fn create_job<R>(repo: &R, user: &AuthenticatedUser, form: CreateJobForm) -> ServiceResult<Job>
where
    R: JobWriter + CategoryReader + SkillReader + UserReader + ?Sized,
{
    ensure_any_role(user, &[ROLE_EMPLOYER, ROLE_ADMIN])?;

    let payload = CreateJobPayload::try_from(form)?;

    let employer_id = ensure_active_account(repo, user)?;

    match repo.get_category_by_id(payload.category_id)? {
        Some(category) if category.enabled => {}
        _ => return Err(ServiceError::Form("Unknown or disabled category".to_string())),
    }

    for skill_id in &payload.skills {
        match repo.get_skill_by_id(*skill_id)? {
            Some(skill) if skill.enabled => {}
            _ => {
                return Err(ServiceError::Form(format!(
                    "Unknown or disabled skill {skill_id}"
                )));
            }
        }
    }

    let job = repo.create_job(&payload.into_domain(employer_id))?;
    log::info!("Employer {employer_id} published job {}", job.id);

    Ok(job)
}

/// Removes a posting together with its applications.
pub fn delete_job<R>(repo: &R, user: &AuthenticatedUser, job_id: i32) -> ServiceResult<()>
where
    R: JobReader + JobWriter + ?Sized,
{
    ensure_any_role(user, &[ROLE_EMPLOYER, ROLE_ADMIN])?;

    let job_id = JobId::new(job_id)?;
    let job = repo.get_job_by_id(job_id)?.ok_or(ServiceError::NotFound)?;

    if !user.has_role(ROLE_ADMIN) && job.employer_id != user.user_id()? {
        return Err(ServiceError::Unauthorized);
    }

    repo.delete_job(job_id)?;

    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use chrono::NaiveDateTime;

    use super::*;
    use crate::domain::catalog::{Category, Skill};
    use crate::domain::types::{
        CatalogName, CompanyName, JobDescription, JobTitle, LocationName, SalaryRange, UserId,
    };
    use crate::domain::user::Role;
    use crate::query::QueryConfig;
    use crate::query::descriptor::FilterValue;
    use crate::query::QueryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{account, claims};

    pub(crate) fn sample_job(id: i32, employer_id: i32, is_open: bool) -> Job {
        Job {
            id: JobId::new(id).unwrap(),
            employer_id: UserId::new(employer_id).unwrap(),
            category_id: CategoryId::new(1).unwrap(),
            title: JobTitle::new("Backend Engineer").unwrap(),
            company: CompanyName::new("Acme").unwrap(),
            location: LocationName::new("Remote").unwrap(),
            description: JobDescription::new("Build APIs").unwrap(),
            job_type: JobType::FullTime,
            salary: SalaryRange::default(),
            is_open,
            skills: Vec::new(),
            created_at: NaiveDateTime::default(),
            updated_at: NaiveDateTime::default(),
        }
    }

    fn category(enabled: bool) -> Category {
        Category {
            id: CategoryId::new(1).unwrap(),
            name: CatalogName::new("Engineering").unwrap(),
            enabled,
            created_at: NaiveDateTime::default(),
        }
    }

    fn form() -> CreateJobForm {
        CreateJobForm {
            category_id: 1,
            title: "Backend Engineer".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: "Build APIs".to_string(),
            job_type: "contract".to_string(),
            salary_min: None,
            salary_max: None,
            skills: vec![2],
        }
    }

    #[test]
    fn descriptor_filters_reach_the_repository_query() {
        let config = QueryConfig::default();
        let descriptor = QueryDescriptor::<JobFilter>::initial(&config)
            .with_search("  rust ")
            .with_filter(JobFilter::JobType, FilterValue::many(["contract"]))
            .unwrap()
            .with_filter(JobFilter::Salary, FilterValue::range(Some(1000), None))
            .unwrap()
            .with_page(3);

        let mut repo = MockRepository::new();
        repo.expect_list_jobs()
            .withf(|query| {
                query.open_only
                    && query.search.as_deref() == Some("rust")
                    && query.job_types == vec![JobType::Contract]
                    && query.salary_min == Some(1000)
                    && query.pagination.map(|page| page.page) == Some(3)
            })
            .returning(|_| Ok((21, vec![sample_job(1, 2, true)])));

        let page = list_open_jobs(&repo, &descriptor).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.pagination.total, 21);
        assert_eq!(page.pagination.total_pages, 3);
    }

    #[test]
    fn malformed_filter_value_is_a_query_error() {
        let descriptor = QueryDescriptor::<JobFilter>::initial(&QueryConfig::default())
            .with_filter(JobFilter::Category, FilterValue::single("abc"))
            .unwrap();

        let repo = MockRepository::new();
        assert!(matches!(
            list_open_jobs(&repo, &descriptor),
            Err(ServiceError::Query(QueryError::Validation(_)))
        ));
    }

    #[test]
    fn candidates_cannot_list_employer_jobs() {
        let repo = MockRepository::new();
        let descriptor = QueryDescriptor::<JobFilter>::initial(&QueryConfig::default());
        assert!(matches!(
            list_employer_jobs(&repo, &claims(5, crate::ROLE_CANDIDATE), &descriptor),
            Err(ServiceError::Unauthorized)
        ));
    }

    #[test]
    fn closed_job_is_hidden_from_the_public() {
        let mut repo = MockRepository::new();
        repo.expect_get_job_by_id()
            .returning(|id| Ok(Some(sample_job(id.get(), 2, false))));

        assert!(matches!(get_job(&repo, 1), Err(ServiceError::NotFound)));
    }

    #[test]
    fn create_job_rejects_disabled_category() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(account(id.get(), Role::Employer, true))));
        repo.expect_get_category_by_id()
            .returning(|_| Ok(Some(category(false))));
        repo.expect_create_job().never();

        let result = create_job(&repo, &claims(2, crate::ROLE_EMPLOYER), form());
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn create_job_stores_posting_for_caller() {
        let mut repo = MockRepository::new();
        repo.expect_get_user_by_id()
            .returning(|id| Ok(Some(account(id.get(), Role::Employer, true))));
        repo.expect_get_category_by_id()
            .returning(|_| Ok(Some(category(true))));
        repo.expect_get_skill_by_id().returning(|id| {
            Ok(Some(Skill {
                id,
                name: CatalogName::new("Rust").unwrap(),
                enabled: true,
                created_at: NaiveDateTime::default(),
            }))
        });
        repo.expect_create_job()
            .withf(|new_job| new_job.employer_id.get() == 2 && new_job.job_type == JobType::Contract)
            .returning(|_| Ok(sample_job(9, 2, true)));

        let job = create_job(&repo, &claims(2, crate::ROLE_EMPLOYER), form()).unwrap();
        assert_eq!(job.id.get(), 9);
    }

    #[test]
    fn only_owner_or_admin_deletes() {
        let mut repo = MockRepository::new();
        repo.expect_get_job_by_id()
            .returning(|id| Ok(Some(sample_job(id.get(), 2, true))));
        repo.expect_delete_job().times(2).returning(|_| Ok(()));

        assert!(matches!(
            delete_job(&repo, &claims(3, crate::ROLE_EMPLOYER), 1),
            Err(ServiceError::Unauthorized)
        ));
        assert!(delete_job(&repo, &claims(2, crate::ROLE_EMPLOYER), 1).is_ok());
        assert!(delete_job(&repo, &claims(7, crate::ROLE_ADMIN), 1).is_ok());
    }
}
