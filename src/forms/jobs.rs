use std::collections::BTreeSet;

use serde::Deserialize;
use validator::Validate;

use crate::domain::job::{JobType, NewJob};
use crate::domain::types::{
    CategoryId, CompanyName, JobDescription, JobTitle, LocationName, SalaryRange, SkillId, UserId,
};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /api/v1/jobs`.
pub struct CreateJobForm {
    pub category_id: i32,
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1, max = 200))]
    pub company: String,
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[validate(length(min = 1, max = 20000))]
    pub description: String,
    pub job_type: String,
    #[validate(range(min = 0))]
    pub salary_min: Option<i64>,
    #[validate(range(min = 0))]
    pub salary_max: Option<i64>,
    #[serde(default)]
    pub skills: Vec<i32>,
}

/// Validated contents of a [`CreateJobForm`].
#[derive(Debug, Clone)]
pub struct CreateJobPayload {
    pub category_id: CategoryId,
    pub title: JobTitle,
    pub company: CompanyName,
    pub location: LocationName,
    pub description: JobDescription,
    pub job_type: JobType,
    pub salary: SalaryRange,
    /// Deduplicated and ascending.
    pub skills: Vec<SkillId>,
}

impl TryFrom<CreateJobForm> for CreateJobPayload {
    type Error = FormError;

    fn try_from(form: CreateJobForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let skills = form
            .skills
            .into_iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|id| SkillId::new(id).map_err(|_| FormError::InvalidSkillId))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            category_id: CategoryId::new(form.category_id)
                .map_err(|_| FormError::InvalidCategoryId)?,
            title: JobTitle::new(form.title)?,
            company: CompanyName::new(form.company)?,
            location: LocationName::new(form.location)?,
            description: JobDescription::new(form.description)?,
            job_type: form
                .job_type
                .parse()
                .map_err(|_| FormError::InvalidJobType)?,
            salary: SalaryRange::new(form.salary_min, form.salary_max)?,
            skills,
        })
    }
}

impl CreateJobPayload {
    pub fn into_domain(self, employer_id: UserId) -> NewJob {
        NewJob {
            employer_id,
            category_id: self.category_id,
            title: self.title,
            company: self.company,
            location: self.location,
            description: self.description,
            job_type: self.job_type,
            salary: self.salary,
            skills: self.skills,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> CreateJobForm {
        CreateJobForm {
            category_id: 1,
            title: " Backend Engineer ".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: "<p>Build APIs</p><script>steal()</script>".to_string(),
            job_type: "full_time".to_string(),
            salary_min: Some(50_000),
            salary_max: Some(80_000),
            skills: vec![3, 1, 3],
        }
    }

    #[test]
    fn valid_form_becomes_a_sanitized_payload() {
        let payload = CreateJobPayload::try_from(form()).unwrap();

        assert_eq!(payload.title.as_str(), "Backend Engineer");
        assert_eq!(payload.description.as_str(), "<p>Build APIs</p>");
        assert_eq!(payload.job_type, JobType::FullTime);
        assert_eq!(
            payload.skills.iter().map(|id| id.get()).collect::<Vec<_>>(),
            vec![1, 3]
        );
    }

    #[test]
    fn unknown_job_type_is_rejected() {
        let form = CreateJobForm {
            job_type: "gig".to_string(),
            ..form()
        };
        assert!(matches!(
            CreateJobPayload::try_from(form),
            Err(FormError::InvalidJobType)
        ));
    }

    #[test]
    fn inverted_salary_is_rejected() {
        let form = CreateJobForm {
            salary_min: Some(90_000),
            salary_max: Some(10_000),
            ..form()
        };
        assert!(matches!(
            CreateJobPayload::try_from(form),
            Err(FormError::InvalidValue(_))
        ));
    }

    #[test]
    fn empty_title_fails_validation() {
        let form = CreateJobForm {
            title: String::new(),
            ..form()
        };
        assert!(matches!(
            CreateJobPayload::try_from(form),
            Err(FormError::Validation(_))
        ));
    }
}
