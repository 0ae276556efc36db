//! Diesel models for categories and skills.

use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::catalog::{Category as DomainCategory, Skill as DomainSkill};
use crate::domain::types::{CatalogName, CategoryId, SkillId, TypeConstraintError};

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub enabled: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory<'a> {
    pub name: &'a str,
}

#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::skills)]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub enabled: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::skills)]
pub struct NewSkill<'a> {
    pub name: &'a str,
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::try_from(category.id)?,
            name: CatalogName::new(category.name)?,
            enabled: category.enabled,
            created_at: category.created_at,
        })
    }
}

impl TryFrom<Skill> for DomainSkill {
    type Error = TypeConstraintError;

    fn try_from(skill: Skill) -> Result<Self, Self::Error> {
        Ok(Self {
            id: SkillId::try_from(skill.id)?,
            name: CatalogName::new(skill.name)?,
            enabled: skill.enabled,
            created_at: skill.created_at,
        })
    }
}
