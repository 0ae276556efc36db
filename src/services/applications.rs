//! Candidate applications and their review by the posting owner.

use crate::domain::application::{Applicant, Application, ApplicationStatus};
use crate::domain::job::Job;
use crate::domain::types::{ApplicationId, JobId};
use crate::forms::applications::{ApplicationStatusForm, ApplyForm};
use crate::models::auth::AuthenticatedUser;
use crate::pagination::ResultPage;
use crate::query::{FilterKey, QueryDescriptor};
use crate::query::filters::ApplicationFilter;
use crate::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, JobReader, UserReader,
};
use crate::repository::errors::RepositoryError;
use crate::services::{
    ServiceError, ServiceResult, ensure_active_account, ensure_any_role, ensure_role,
    parse_values, result_page, search_term,
};
use crate::{ROLE_ADMIN, ROLE_CANDIDATE, ROLE_EMPLOYER};

/// Loads the job and checks the caller owns it or is an admin.
fn owned_job<R>(repo: &R, user: &AuthenticatedUser, job_id: JobId) -> ServiceResult<Job>
where
    R: JobReader + ?Sized,
{
    let job = repo.get_job_by_id(job_id)?.ok_or(ServiceError::NotFound)?;
    if user.has_role(ROLE_ADMIN) || job.employer_id == user.user_id()? {
        Ok(job)
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Submits the caller's application to an open posting.
pub fn apply_to_job<R>(
    repo: &R,
    user: &AuthenticatedUser,
    job_id: i32,
    form: ApplyForm,
) -> ServiceResult<Application>
where
    R: JobReader + ApplicationWriter + UserReader + ?Sized,
{
    ensure_role(user, ROLE_CANDIDATE)?;

    let candidate_id = ensure_active_account(repo, user)?;

    let job_id = JobId::new(job_id)?;
    let job = repo.get_job_by_id(job_id)?.ok_or(ServiceError::NotFound)?;
    if !job.is_open {
        return Err(ServiceError::Form("Job is closed".to_string()));
    }

    let new_application = form.into_domain(job.id, candidate_id)?;

    match repo.create_application(&new_application) {
        Ok(application) => Ok(application),
        Err(RepositoryError::ConstraintViolation(_)) => Err(ServiceError::Conflict(
            "You have already applied to this job".to_string(),
        )),
        Err(err) => {
            log::error!("Failed to store application to job {job_id}: {err}");
            Err(err.into())
        }
    }
}

/// Applicants of one posting, filtered by status and candidate search.
pub fn list_job_applications<R>(
    repo: &R,
    user: &AuthenticatedUser,
    job_id: i32,
    descriptor: &QueryDescriptor<ApplicationFilter>,
) -> ServiceResult<ResultPage<Applicant>>
where
    R: JobReader + ApplicationReader + ?Sized,
{
    ensure_any_role(user, &[ROLE_EMPLOYER, ROLE_ADMIN])?;

    let job = owned_job(repo, user, JobId::new(job_id)?)?;

    let mut query = ApplicationListQuery::new(job.id);
    if let Some(term) = search_term(descriptor) {
        query = query.search(term);
    }
    if let Some(raw) = descriptor
        .filter(ApplicationFilter::Status)
        .and_then(|value| value.as_many())
    {
        query = query.statuses(parse_values::<ApplicationStatus>(
            ApplicationFilter::Status.as_str(),
            raw,
        )?);
    }
    let query = query
        .sort(descriptor.sort())
        .paginate(descriptor.page(), descriptor.page_size());

    Ok(result_page(descriptor, repo.list_applications(query)?))
}

/// Moves an application to a new review status.
pub fn update_application_status<R>(
    repo: &R,
    user: &AuthenticatedUser,
    application_id: i32,
    form: ApplicationStatusForm,
) -> ServiceResult<Application>
where
    R: JobReader + ApplicationReader + ApplicationWriter + ?Sized,
{
    ensure_any_role(user, &[ROLE_EMPLOYER, ROLE_ADMIN])?;

    let status = ApplicationStatus::try_from(form)?;

    let application_id = ApplicationId::new(application_id)?;
    let application = repo
        .get_application_by_id(application_id)?
        .ok_or(ServiceError::NotFound)?;

    owned_job(repo, user, application.job_id)?;

    Ok(repo.update_application_status(application_id, status)?)
}
