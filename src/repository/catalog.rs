//! Repository implementation for categories and skills.
//!
//! Both tables share one shape, so the Diesel code is generated once per table.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::catalog::{Category, Skill};
use crate::domain::types::{CatalogName, CategoryId, SkillId};
use crate::models::catalog::{
    Category as DbCategory, NewCategory as DbNewCategory, NewSkill as DbNewSkill, Skill as DbSkill,
};
use crate::query::SortOrder;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{
    CatalogListQuery, CategoryReader, CategoryWriter, DieselRepository, SkillReader, SkillWriter,
    like_pattern,
};

macro_rules! catalog_repository {
    (
        table: $table:ident,
        entity: $entity:ty,
        id: $id:ty,
        row: $row:ty,
        new_row: $new_row:ident,
        $reader:ident { $get:ident, $list:ident },
        $writer:ident { $create:ident, $set_enabled:ident, $delete:ident } $(,)?
    ) => {
        impl $reader for DieselRepository {
            fn $get(&self, id: $id) -> RepositoryResult<Option<$entity>> {
                use crate::schema::$table;

                let mut conn = self.conn()?;
                let row = $table::table
                    .find(id.get())
                    .first::<$row>(&mut conn)
                    .optional()?;

                Ok(row.map(<$entity>::try_from).transpose()?)
            }

            fn $list(&self, query: CatalogListQuery) -> RepositoryResult<(usize, Vec<$entity>)> {
                use crate::schema::$table;

                let mut conn = self.conn()?;

                let query_builder = || {
                    let mut items = $table::table.into_boxed::<Sqlite>();
                    if let Some(enabled) = query.enabled {
                        items = items.filter($table::enabled.eq(enabled));
                    }
                    if let Some(term) = &query.search {
                        items = items.filter($table::name.like(like_pattern(term)).escape('\\'));
                    }
                    items
                };

                let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

                let mut items = match query.sort {
                    SortOrder::Default => query_builder().order($table::name.asc()),
                    SortOrder::Newest => {
                        query_builder().order(($table::created_at.desc(), $table::id.desc()))
                    }
                    SortOrder::Oldest => {
                        query_builder().order(($table::created_at.asc(), $table::id.asc()))
                    }
                };
                if let Some(pagination) = &query.pagination {
                    items = items.offset(pagination.offset()).limit(pagination.limit());
                }

                let entries = items
                    .load::<$row>(&mut conn)?
                    .into_iter()
                    .map(<$entity>::try_from)
                    .collect::<Result<Vec<_>, _>>()?;

                Ok((total, entries))
            }
        }

        impl $writer for DieselRepository {
            fn $create(&self, name: &CatalogName) -> RepositoryResult<$entity> {
                use crate::schema::$table;

                let mut conn = self.conn()?;
                let row = diesel::insert_into($table::table)
                    .values(&$new_row {
                        name: name.as_str(),
                    })
                    .get_result::<$row>(&mut conn)?;

                Ok(<$entity>::try_from(row)?)
            }

            fn $set_enabled(&self, id: $id, enabled: bool) -> RepositoryResult<$entity> {
                use crate::schema::$table;

                let mut conn = self.conn()?;
                let row = diesel::update($table::table.find(id.get()))
                    .set($table::enabled.eq(enabled))
                    .get_result::<$row>(&mut conn)?;

                Ok(<$entity>::try_from(row)?)
            }

            fn $delete(&self, id: $id) -> RepositoryResult<()> {
                use crate::schema::$table;

                let mut conn = self.conn()?;
                let affected = diesel::delete($table::table.find(id.get())).execute(&mut conn)?;
                if affected == 0 {
                    return Err(RepositoryError::NotFound);
                }
                Ok(())
            }
        }
    };
}

catalog_repository!(
    table: categories,
    entity: Category,
    id: CategoryId,
    row: DbCategory,
    new_row: DbNewCategory,
    CategoryReader { get_category_by_id, list_categories },
    CategoryWriter { create_category, set_category_enabled, delete_category },
);

catalog_repository!(
    table: skills,
    entity: Skill,
    id: SkillId,
    row: DbSkill,
    new_row: DbNewSkill,
    SkillReader { get_skill_by_id, list_skills },
    SkillWriter { create_skill, set_skill_enabled, delete_skill },
);
