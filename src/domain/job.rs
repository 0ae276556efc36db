//! Job postings.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CategoryId, CompanyName, JobDescription, JobId, JobTitle, LocationName, SalaryRange, SkillId,
    TypeConstraintError, UserId,
};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Internship,
    Temporary,
}

impl JobType {
    pub const ALL: [JobType; 5] = [
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Internship,
        JobType::Temporary,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            JobType::FullTime => "full_time",
            JobType::PartTime => "part_time",
            JobType::Contract => "contract",
            JobType::Internship => "internship",
            JobType::Temporary => "temporary",
        }
    }
}

impl Display for JobType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobType {
    type Err = TypeConstraintError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        JobType::ALL
            .into_iter()
            .find(|job_type| job_type.as_str() == value.trim())
            .ok_or_else(|| TypeConstraintError::InvalidValue(format!("unknown job type `{value}`")))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub employer_id: UserId,
    pub category_id: CategoryId,
    pub title: JobTitle,
    pub company: CompanyName,
    pub location: LocationName,
    pub description: JobDescription,
    pub job_type: JobType,
    pub salary: SalaryRange,
    /// Closed postings stay visible to their owner but drop out of the public list.
    pub is_open: bool,
    pub skills: Vec<SkillId>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Debug)]
pub struct NewJob {
    pub employer_id: UserId,
    pub category_id: CategoryId,
    pub title: JobTitle,
    pub company: CompanyName,
    pub location: LocationName,
    pub description: JobDescription,
    pub job_type: JobType,
    pub salary: SalaryRange,
    pub skills: Vec<SkillId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_type_round_trips_through_its_name() {
        for job_type in JobType::ALL {
            assert_eq!(job_type.as_str().parse::<JobType>(), Ok(job_type));
        }
        assert!("gig".parse::<JobType>().is_err());
    }
}
