//! Mock repository implementations for isolating services in tests.

use mockall::mock;

use crate::domain::application::{Applicant, Application, ApplicationStatus, NewApplication};
use crate::domain::catalog::{Category, Skill};
use crate::domain::job::{Job, NewJob};
use crate::domain::types::{
    ApplicationId, CatalogName, CategoryId, JobId, SkillId, UserEmail, UserId,
};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, CatalogListQuery, CategoryReader,
    CategoryWriter, JobListQuery, JobReader, JobWriter, SkillReader, SkillWriter, UserListQuery,
    UserReader, UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>>;
        fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)>;
    }

    impl UserWriter for Repository {
        fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
        fn set_user_enabled(&self, id: UserId, enabled: bool) -> RepositoryResult<User>;
    }

    impl CategoryReader for Repository {
        fn get_category_by_id(&self, id: CategoryId) -> RepositoryResult<Option<Category>>;
        fn list_categories(
            &self,
            query: CatalogListQuery,
        ) -> RepositoryResult<(usize, Vec<Category>)>;
    }

    impl CategoryWriter for Repository {
        fn create_category(&self, name: &CatalogName) -> RepositoryResult<Category>;
        fn set_category_enabled(
            &self,
            id: CategoryId,
            enabled: bool,
        ) -> RepositoryResult<Category>;
        fn delete_category(&self, id: CategoryId) -> RepositoryResult<()>;
    }

    impl SkillReader for Repository {
        fn get_skill_by_id(&self, id: SkillId) -> RepositoryResult<Option<Skill>>;
        fn list_skills(&self, query: CatalogListQuery) -> RepositoryResult<(usize, Vec<Skill>)>;
    }

    impl SkillWriter for Repository {
        fn create_skill(&self, name: &CatalogName) -> RepositoryResult<Skill>;
        fn set_skill_enabled(&self, id: SkillId, enabled: bool) -> RepositoryResult<Skill>;
        fn delete_skill(&self, id: SkillId) -> RepositoryResult<()>;
    }

    impl JobReader for Repository {
        fn get_job_by_id(&self, id: JobId) -> RepositoryResult<Option<Job>>;
        fn list_jobs(&self, query: JobListQuery) -> RepositoryResult<(usize, Vec<Job>)>;
    }

    impl JobWriter for Repository {
        fn create_job(&self, new_job: &NewJob) -> RepositoryResult<Job>;
        fn delete_job(&self, id: JobId) -> RepositoryResult<()>;
    }

    impl ApplicationReader for Repository {
        fn get_application_by_id(
            &self,
            id: ApplicationId,
        ) -> RepositoryResult<Option<Application>>;
        fn list_applications(
            &self,
            query: ApplicationListQuery,
        ) -> RepositoryResult<(usize, Vec<Applicant>)>;
    }

    impl ApplicationWriter for Repository {
        fn create_application(
            &self,
            new_application: &NewApplication,
        ) -> RepositoryResult<Application>;
        fn update_application_status(
            &self,
            id: ApplicationId,
            status: ApplicationStatus,
        ) -> RepositoryResult<Application>;
    }
}
