//! Admin-managed lookup data: job categories and skill tags.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{CatalogName, CategoryId, SkillId};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub name: CatalogName,
    /// Disabled categories are hidden from the public listing filters.
    pub enabled: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    pub id: SkillId,
    pub name: CatalogName,
    pub enabled: bool,
    pub created_at: NaiveDateTime,
}
