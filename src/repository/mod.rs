use crate::db::{DbConnection, DbPool, get_connection};
use crate::domain::application::{Applicant, Application, ApplicationStatus, NewApplication};
use crate::domain::catalog::{Category, Skill};
use crate::domain::job::{Job, JobType, NewJob};
use crate::domain::types::{
    ApplicationId, CatalogName, CategoryId, JobId, SkillId, UserEmail, UserId,
};
use crate::domain::user::{NewUser, Role, User};
use crate::query::SortOrder;
use crate::repository::errors::RepositoryResult;

pub mod application;
pub mod catalog;
pub mod errors;
pub mod job;
pub mod user;

#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

impl PageRequest {
    /// SQL `OFFSET` of the page; saturates at `i64::MAX` so an absurd page is just empty.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1)
            .checked_mul(self.per_page)
            .and_then(|offset| i64::try_from(offset).ok())
            .unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Default)]
pub struct JobListQuery {
    pub employer_id: Option<UserId>,
    pub open_only: bool,
    pub search: Option<String>,
    pub category_id: Option<CategoryId>,
    pub job_types: Vec<JobType>,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub skill_ids: Vec<SkillId>,
    pub location: Option<String>,
    pub sort: SortOrder,
    pub pagination: Option<PageRequest>,
}

impl JobListQuery {
    /// Open postings of every employer.
    pub fn open() -> Self {
        Self {
            open_only: true,
            ..Self::default()
        }
    }

    /// Every posting of one employer, open or closed.
    pub fn for_employer(employer_id: UserId) -> Self {
        Self {
            employer_id: Some(employer_id),
            ..Self::default()
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn job_types(mut self, job_types: impl IntoIterator<Item = JobType>) -> Self {
        self.job_types = job_types.into_iter().collect();
        self
    }

    /// Keeps postings whose salary range overlaps `[min, max]`.
    pub fn salary(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.salary_min = min;
        self.salary_max = max;
        self
    }

    /// Keeps postings tagged with at least one of the skills.
    pub fn skills(mut self, skill_ids: impl IntoIterator<Item = SkillId>) -> Self {
        self.skill_ids = skill_ids.into_iter().collect();
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageRequest { page, per_page });
        self
    }
}

/// Listing of categories or skills.
#[derive(Debug, Clone, Default)]
pub struct CatalogListQuery {
    pub enabled: Option<bool>,
    pub search: Option<String>,
    pub sort: SortOrder,
    pub pagination: Option<PageRequest>,
}

impl CatalogListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageRequest { page, per_page });
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct UserListQuery {
    pub roles: Vec<Role>,
    pub enabled: Option<bool>,
    pub search: Option<String>,
    pub sort: SortOrder,
    pub pagination: Option<PageRequest>,
}

impl UserListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn roles(mut self, roles: impl IntoIterator<Item = Role>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageRequest { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApplicationListQuery {
    pub job_id: JobId,
    pub statuses: Vec<ApplicationStatus>,
    /// Matched against the candidate's name and email.
    pub search: Option<String>,
    pub sort: SortOrder,
    pub pagination: Option<PageRequest>,
}

impl ApplicationListQuery {
    pub fn new(job_id: JobId) -> Self {
        Self {
            job_id,
            statuses: Vec::new(),
            search: None,
            sort: SortOrder::Default,
            pagination: None,
        }
    }

    pub fn statuses(mut self, statuses: impl IntoIterator<Item = ApplicationStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(PageRequest { page, per_page });
        self
    }
}

/// `LIKE` pattern matching `term` anywhere in the column.
pub(crate) fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(get_connection(&self.pool)?)
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
}

pub trait UserWriter {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    fn set_user_enabled(&self, id: UserId, enabled: bool) -> RepositoryResult<User>;
}

pub trait CategoryReader {
    fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
    fn list_categories(&self, query: CatalogListQuery) -> RepositoryResult<(usize, Vec<Category>)>;
}

pub trait CategoryWriter {
    fn create_category(&self, name: &CatalogName) -> RepositoryResult<Category>;
    fn set_category_enabled(&self, id: CategoryId, enabled: bool) -> RepositoryResult<Category>;
    fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
}

pub trait SkillReader {
    fn get_skill_by_id(&self, id: SkillId) -> RepositoryResult<Option<Skill>>;
    fn list_skills(&self, query: CatalogListQuery) -> RepositoryResult<(usize, Vec<Skill>)>;
}

pub trait SkillWriter {
    fn create_skill(&self, name: &CatalogName) -> RepositoryResult<Skill>;
    fn set_skill_enabled(&self, id: SkillId, enabled: bool) -> RepositoryResult<Skill>;
    fn delete_skill(&self, id: SkillId) -> RepositoryResult<()>;
}

pub trait JobReader {
    fn get_job_by_id(&self, id: JobId) -> RepositoryResult<Option<Job>>;
    fn list_jobs(&self, query: JobListQuery) -> RepositoryResult<(usize, Vec<Job>)>;
}

pub trait JobWriter {
    fn create_job(&self, new_job: &NewJob) -> RepositoryResult<Job>;
    fn delete_job(&self, id: JobId) -> RepositoryResult<()>;
}

pub trait ApplicationReader {
    fn get_application_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<Application>>;
    fn list_applications(
        &self,
        query: ApplicationListQuery,
    ) -> RepositoryResult<(usize, Vec<Applicant>)>;
}

pub trait ApplicationWriter {
    fn create_application(&self, new_application: &NewApplication)
    -> RepositoryResult<Application>;
    fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> RepositoryResult<Application>;
}
