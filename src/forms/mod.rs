//! Request bodies accepted by the write endpoints.

use thiserror::Error;
use validator::ValidationErrors;

pub mod applications;
pub mod catalog;
pub mod jobs;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("invalid category id")]
    InvalidCategoryId,

    #[error("invalid skill id")]
    InvalidSkillId,

    #[error("invalid job type")]
    InvalidJobType,

    #[error("invalid application status")]
    InvalidStatus,

    #[error("invalid value: {0}")]
    InvalidValue(String),
}
