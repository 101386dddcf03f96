#![allow(dead_code)]

use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_portal::db::{DbPool, establish_connection_pool};
use pushkind_portal::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};
use tempfile::TempDir;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const HUB: i32 = 1;

/// Migrated SQLite database living in a temporary directory.
pub struct TestDb {
    pool: DbPool,
    _dir: TempDir,
}

impl TestDb {
    pub fn new(name: &str) -> Self {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join(name);
        let url = path.to_str().expect("utf-8 path").to_string();

        let pool = establish_connection_pool(&url).expect("pool");
        let mut conn = pool.get().expect("connection");
        conn.run_pending_migrations(MIGRATIONS).expect("migrations");

        Self { pool, _dir: dir }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn user(roles: &[&str]) -> AuthenticatedUser {
    AuthenticatedUser {
        sub: "1".to_string(),
        email: "preparer@example.com".to_string(),
        hub_id: HUB,
        name: "Preparer".to_string(),
        roles: roles.iter().map(|role| role.to_string()).collect(),
        exp: 0,
    }
}

pub fn admin_user() -> AuthenticatedUser {
    user(&[SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE])
}
