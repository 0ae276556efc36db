//! Diesel models for job applications.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::application::{
    Application as DomainApplication, NewApplication as DomainNewApplication,
};
use crate::domain::types::{ApplicationId, CoverLetter, JobId, TypeConstraintError, UserId};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::applications)]
pub struct Application {
    pub id: i32,
    pub job_id: i32,
    pub candidate_id: i32,
    pub cover_letter: String,
    pub status: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::applications)]
pub struct NewApplication<'a> {
    pub job_id: i32,
    pub candidate_id: i32,
    pub cover_letter: &'a str,
}

impl TryFrom<Application> for DomainApplication {
    type Error = TypeConstraintError;

    fn try_from(application: Application) -> Result<Self, Self::Error> {
        Ok(Self {
            id: ApplicationId::try_from(application.id)?,
            job_id: JobId::try_from(application.job_id)?,
            candidate_id: UserId::try_from(application.candidate_id)?,
            cover_letter: CoverLetter::new(application.cover_letter)?,
            status: application.status.parse()?,
            created_at: application.created_at,
            updated_at: application.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewApplication> for NewApplication<'a> {
    fn from(application: &'a DomainNewApplication) -> Self {
        Self {
            job_id: application.job_id.get(),
            candidate_id: application.candidate_id.get(),
            cover_letter: application.cover_letter.as_str(),
        }
    }
}
