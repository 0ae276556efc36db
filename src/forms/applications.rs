use serde::Deserialize;
use validator::Validate;

use crate::domain::application::{ApplicationStatus, NewApplication};
use crate::domain::types::{CoverLetter, JobId, UserId};
use crate::forms::FormError;

#[derive(Debug, Deserialize, Validate)]
/// Body of `POST /api/v1/jobs/{id}/applications`.
pub struct ApplyForm {
    #[validate(length(min = 1, max = 10000))]
    pub cover_letter: String,
}

impl ApplyForm {
    pub fn into_domain(self, job_id: JobId, candidate_id: UserId) -> Result<NewApplication, FormError> {
        self.validate()?;
        Ok(NewApplication {
            job_id,
            candidate_id,
            cover_letter: CoverLetter::new(self.cover_letter)?,
        })
    }
}

#[derive(Debug, Deserialize)]
/// Body of `PUT /api/v1/applications/{id}/status`.
pub struct ApplicationStatusForm {
    pub status: String,
}

impl TryFrom<ApplicationStatusForm> for ApplicationStatus {
    type Error = FormError;

    fn try_from(form: ApplicationStatusForm) -> Result<Self, Self::Error> {
        form.status.parse().map_err(|_| FormError::InvalidStatus)
    }
}
