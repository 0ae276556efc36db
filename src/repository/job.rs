//! Repository implementation for job postings.

use std::collections::HashMap;

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::job::{Job, NewJob};
use crate::domain::types::JobId;
use crate::models::job::{Job as DbJob, JobSkill as DbJobSkill, NewJob as DbNewJob};
use crate::query::SortOrder;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, JobListQuery, JobReader, JobWriter, like_pattern};

impl JobReader for DieselRepository {
    fn get_job_by_id(&self, id: JobId) -> RepositoryResult<Option<Job>> {
        use crate::schema::{job_skills, jobs};

        let mut conn = self.conn()?;

        let Some(row) = jobs::table
            .find(id.get())
            .first::<DbJob>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let skills = job_skills::table
            .filter(job_skills::job_id.eq(row.id))
            .order(job_skills::skill_id.asc())
            .select(job_skills::skill_id)
            .load::<i32>(&mut conn)?;

        Ok(Some(row.into_domain(skills)?))
    }

    fn list_jobs(&self, query: JobListQuery) -> RepositoryResult<(usize, Vec<Job>)> {
        use crate::schema::{job_skills, jobs};

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = jobs::table.into_boxed::<Sqlite>();

            if query.open_only {
                items = items.filter(jobs::is_open.eq(true));
            }
            if let Some(employer_id) = query.employer_id {
                items = items.filter(jobs::employer_id.eq(employer_id.get()));
            }
            if let Some(term) = &query.search {
                let pattern = like_pattern(term);
                items = items.filter(
                    jobs::title
                        .like(pattern.clone())
                        .escape('\\')
                        .or(jobs::company.like(pattern.clone()).escape('\\'))
                        .or(jobs::description.like(pattern).escape('\\')),
                );
            }
            if let Some(category_id) = query.category_id {
                items = items.filter(jobs::category_id.eq(category_id.get()));
            }
            if !query.job_types.is_empty() {
                let job_types: Vec<&'static str> =
                    query.job_types.iter().map(|job_type| job_type.as_str()).collect();
                items = items.filter(jobs::job_type.eq_any(job_types));
            }
            // Open-ended salaries overlap every range on their open side.
            if let Some(min) = query.salary_min {
                items = items.filter(jobs::salary_max.ge(min).or(jobs::salary_max.is_null()));
            }
            if let Some(max) = query.salary_max {
                items = items.filter(jobs::salary_min.le(max).or(jobs::salary_min.is_null()));
            }
            if !query.skill_ids.is_empty() {
                let skill_ids: Vec<i32> = query.skill_ids.iter().map(|id| id.get()).collect();
                items = items.filter(
                    jobs::id.eq_any(
                        job_skills::table
                            .filter(job_skills::skill_id.eq_any(skill_ids))
                            .select(job_skills::job_id),
                    ),
                );
            }
            if let Some(location) = &query.location {
                items = items.filter(jobs::location.like(like_pattern(location)).escape('\\'));
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = match query.sort {
            SortOrder::Default | SortOrder::Newest => {
                query_builder().order((jobs::created_at.desc(), jobs::id.desc()))
            }
            SortOrder::Oldest => query_builder().order((jobs::created_at.asc(), jobs::id.asc())),
        };
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let rows = items.load::<DbJob>(&mut conn)?;

        let job_ids: Vec<i32> = rows.iter().map(|row| row.id).collect();
        let mut skills_by_job: HashMap<i32, Vec<i32>> = HashMap::new();
        for link in job_skills::table
            .filter(job_skills::job_id.eq_any(job_ids))
            .order(job_skills::skill_id.asc())
            .load::<DbJobSkill>(&mut conn)?
        {
            skills_by_job
                .entry(link.job_id)
                .or_default()
                .push(link.skill_id);
        }

        let jobs = rows
            .into_iter()
            .map(|row| {
                let skills = skills_by_job.remove(&row.id).unwrap_or_default();
                row.into_domain(skills)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, jobs))
    }
}

impl JobWriter for DieselRepository {
    fn create_job(&self, new_job: &NewJob) -> RepositoryResult<Job> {
        use crate::schema::{job_skills, jobs};

        let mut conn = self.conn()?;
        let db_new_job: DbNewJob = new_job.into();

        conn.transaction::<Job, RepositoryError, _>(|conn| {
            let row = diesel::insert_into(jobs::table)
                .values(&db_new_job)
                .get_result::<DbJob>(conn)?;

            let links: Vec<DbJobSkill> = new_job
                .skills
                .iter()
                .map(|skill_id| DbJobSkill {
                    job_id: row.id,
                    skill_id: skill_id.get(),
                })
                .collect();
            if !links.is_empty() {
                diesel::insert_into(job_skills::table)
                    .values(&links)
                    .execute(conn)?;
            }

            let skills = links.iter().map(|link| link.skill_id).collect();
            Ok(row.into_domain(skills)?)
        })
    }

    fn delete_job(&self, id: JobId) -> RepositoryResult<()> {
        use crate::schema::jobs;

        let mut conn = self.conn()?;

        // Skill links and applications go with it through ON DELETE CASCADE.
        let affected = diesel::delete(jobs::table.find(id.get())).execute(&mut conn)?;
        if affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
