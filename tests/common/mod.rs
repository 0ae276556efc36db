#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tempfile::TempDir;

use jobboard::db::{DbPool, establish_connection_pool};
use jobboard::domain::types::{UserEmail, UserName};
use jobboard::domain::user::{NewUser, Role, User};
use jobboard::repository::{DieselRepository, UserWriter};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    _dir: TempDir,
    pool: DbPool,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(name);
        let pool = establish_connection_pool(path.to_str().expect("utf-8 path"))
            .expect("create pool");

        let mut conn = pool.get().expect("get connection");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("run migrations");

        Self { _dir: dir, pool }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }

    pub fn repo(&self) -> DieselRepository {
        DieselRepository::new(self.pool())
    }
}

pub fn seed_user(repo: &DieselRepository, name: &str, role: Role) -> User {
    let email = format!("{}@example.com", name.to_lowercase());
    repo.create_user(&NewUser::new(
        UserEmail::new(email).unwrap(),
        UserName::new(name).unwrap(),
        role,
    ))
    .expect("create user")
}
