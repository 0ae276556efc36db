//! Repository implementation for job applications.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::application::{Applicant, Application, ApplicationStatus, NewApplication};
use crate::domain::types::ApplicationId;
use crate::domain::user::User;
use crate::models::application::{
    Application as DbApplication, NewApplication as DbNewApplication,
};
use crate::models::user::User as DbUser;
use crate::query::SortOrder;
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ApplicationListQuery, ApplicationReader, ApplicationWriter, DieselRepository, like_pattern,
};

impl ApplicationReader for DieselRepository {
    fn get_application_by_id(&self, id: ApplicationId) -> RepositoryResult<Option<Application>> {
        use crate::schema::applications;

        let mut conn = self.conn()?;
        let application = applications::table
            .find(id.get())
            .first::<DbApplication>(&mut conn)
            .optional()?;

        Ok(application.map(Application::try_from).transpose()?)
    }

    fn list_applications(
        &self,
        query: ApplicationListQuery,
    ) -> RepositoryResult<(usize, Vec<Applicant>)> {
        use crate::schema::{applications, users};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = applications::table
                .inner_join(users::table.on(users::id.eq(applications::candidate_id)))
                .filter(applications::job_id.eq(query.job_id.get()))
                .into_boxed::<Sqlite>();

            if !query.statuses.is_empty() {
                let statuses: Vec<&'static str> =
                    query.statuses.iter().map(|status| status.as_str()).collect();
                items = items.filter(applications::status.eq_any(statuses));
            }
            if let Some(term) = &query.search {
                let pattern = like_pattern(term);
                items = items.filter(
                    users::name
                        .like(pattern.clone())
                        .escape('\\')
                        .or(users::email.like(pattern).escape('\\')),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = match query.sort {
            SortOrder::Default | SortOrder::Newest => query_builder()
                .order((applications::created_at.desc(), applications::id.desc())),
            SortOrder::Oldest => query_builder()
                .order((applications::created_at.asc(), applications::id.asc())),
        };
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let applicants = items
            .select((DbApplication::as_select(), DbUser::as_select()))
            .load::<(DbApplication, DbUser)>(&mut conn)?
            .into_iter()
            .map(|(application, candidate)| -> RepositoryResult<Applicant> {
                Ok(Applicant {
                    application: Application::try_from(application)?,
                    candidate: User::try_from(candidate)?,
                })
            })
            .collect::<RepositoryResult<Vec<_>>>()?;

        Ok((total, applicants))
    }
}

impl ApplicationWriter for DieselRepository {
    fn create_application(
        &self,
        new_application: &NewApplication,
    ) -> RepositoryResult<Application> {
        use crate::schema::applications;

        let mut conn = self.conn()?;
        let db_new_application: DbNewApplication = new_application.into();

        let application = diesel::insert_into(applications::table)
            .values(&db_new_application)
            .get_result::<DbApplication>(&mut conn)?;

        Ok(Application::try_from(application)?)
    }

    fn update_application_status(
        &self,
        id: ApplicationId,
        status: ApplicationStatus,
    ) -> RepositoryResult<Application> {
        use crate::schema::applications;

        let mut conn = self.conn()?;
        let application = diesel::update(applications::table.find(id.get()))
            .set((
                applications::status.eq(status.as_str()),
                applications::updated_at.eq(diesel::dsl::now),
            ))
            .get_result::<DbApplication>(&mut conn)?;

        Ok(Application::try_from(application)?)
    }
}
