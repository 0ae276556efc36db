//! Diesel models for job postings and their skill links.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::job::{Job as DomainJob, NewJob as DomainNewJob};
use crate::domain::types::{
    CategoryId, CompanyName, JobDescription, JobId, JobTitle, LocationName, SalaryRange, SkillId,
    TypeConstraintError, UserId,
};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::jobs)]
/// Diesel model for [`crate::domain::job::Job`] without its skills.
pub struct Job {
    pub id: i32,
    pub employer_id: i32,
    pub category_id: i32,
    pub title: String,
    pub company: String,
    pub location: String,
    pub description: String,
    pub job_type: String,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
    pub is_open: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::jobs)]
pub struct NewJob<'a> {
    pub employer_id: i32,
    pub category_id: i32,
    pub title: &'a str,
    pub company: &'a str,
    pub location: &'a str,
    pub description: &'a str,
    pub job_type: &'a str,
    pub salary_min: Option<i64>,
    pub salary_max: Option<i64>,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = crate::schema::job_skills)]
pub struct JobSkill {
    pub job_id: i32,
    pub skill_id: i32,
}

impl Job {
    /// Converts the row, attaching the skill ids loaded separately.
    pub fn into_domain(self, skills: Vec<i32>) -> Result<DomainJob, TypeConstraintError> {
        Ok(DomainJob {
            id: JobId::try_from(self.id)?,
            employer_id: UserId::try_from(self.employer_id)?,
            category_id: CategoryId::try_from(self.category_id)?,
            title: JobTitle::new(self.title)?,
            company: CompanyName::new(self.company)?,
            location: LocationName::new(self.location)?,
            description: JobDescription::new(self.description)?,
            job_type: self.job_type.parse()?,
            salary: SalaryRange::new(self.salary_min, self.salary_max)?,
            is_open: self.is_open,
            skills: skills
                .into_iter()
                .map(SkillId::try_from)
                .collect::<Result<_, _>>()?,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

impl<'a> From<&'a DomainNewJob> for NewJob<'a> {
    fn from(job: &'a DomainNewJob) -> Self {
        Self {
            employer_id: job.employer_id.get(),
            category_id: job.category_id.get(),
            title: job.title.as_str(),
            company: job.company.as_str(),
            location: job.location.as_str(),
            description: job.description.as_str(),
            job_type: job.job_type.as_str(),
            salary_min: job.salary.min,
            salary_max: job.salary.max,
        }
    }
}
