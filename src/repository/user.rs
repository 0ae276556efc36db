//! Repository implementation for user accounts.

use diesel::prelude::*;
use diesel::sqlite::Sqlite;

use crate::domain::types::{UserEmail, UserId};
use crate::domain::user::{NewUser, User};
use crate::models::user::{NewUser as DbNewUser, User as DbUser};
use crate::query::SortOrder;
use crate::repository::errors::RepositoryResult;
use crate::repository::{DieselRepository, UserListQuery, UserReader, UserWriter, like_pattern};

impl UserReader for DieselRepository {
    fn get_user_by_id(&self, id: UserId) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .find(id.get())
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn get_user_by_email(&self, email: &UserEmail) -> RepositoryResult<Option<User>> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = users::table
            .filter(users::email.eq(email.as_str()))
            .first::<DbUser>(&mut conn)
            .optional()?;

        Ok(user.map(User::try_from).transpose()?)
    }

    fn list_users(&self, query: UserListQuery) -> RepositoryResult<(usize, Vec<User>)> {
        use crate::schema::users;

        let mut conn = self.conn()?;

        let query_builder = || {
            let mut items = users::table.into_boxed::<Sqlite>();

            if !query.roles.is_empty() {
                let roles: Vec<&'static str> = query.roles.iter().map(|role| role.as_str()).collect();
                items = items.filter(users::role.eq_any(roles));
            }
            if let Some(enabled) = query.enabled {
                items = items.filter(users::enabled.eq(enabled));
            }
            if let Some(term) = &query.search {
                let pattern = like_pattern(term);
                items = items.filter(
                    users::name
                        .like(pattern.clone())
                        .escape('\\')
                        .or(users::email.like(pattern).escape('\\')),
                );
            }
            items
        };

        let total = query_builder().count().get_result::<i64>(&mut conn)? as usize;

        let mut items = match query.sort {
            SortOrder::Default => query_builder().order((users::name.asc(), users::id.asc())),
            SortOrder::Newest => query_builder().order((users::created_at.desc(), users::id.desc())),
            SortOrder::Oldest => query_builder().order((users::created_at.asc(), users::id.asc())),
        };
        if let Some(pagination) = &query.pagination {
            items = items.offset(pagination.offset()).limit(pagination.limit());
        }

        let users = items
            .load::<DbUser>(&mut conn)?
            .into_iter()
            .map(User::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok((total, users))
    }
}

impl UserWriter for DieselRepository {
    fn create_user(&self, new_user: &NewUser) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let db_new_user: DbNewUser = new_user.into();

        let user = diesel::insert_into(users::table)
            .values(&db_new_user)
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(user)?)
    }

    fn set_user_enabled(&self, id: UserId, enabled: bool) -> RepositoryResult<User> {
        use crate::schema::users;

        let mut conn = self.conn()?;
        let user = diesel::update(users::table.find(id.get()))
            .set(users::enabled.eq(enabled))
            .get_result::<DbUser>(&mut conn)?;

        Ok(User::try_from(user)?)
    }
}
