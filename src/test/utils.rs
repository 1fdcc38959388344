// Test utilities shared across unit tests
// Only compiled when running tests

use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection};
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{AppSettings, MapEnvironment};
use crate::stores::{CommentStore, NewUser, PostStore, UserStore};
use crate::types::db::{comment, post, user};
use crate::types::internal::auth::Claims;
use crate::types::internal::context::RequestContext;

pub const TEST_NOW: &str = "2025/03/01 12:00";

/// Creates an in-memory database with migrations applied
pub async fn setup_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    db
}

/// Settings with test secrets and cascade verification on
pub fn test_settings() -> AppSettings {
    let env = MapEnvironment::empty().with_vars(&[
        ("JWT_SECRET", "test-secret-key-minimum-32-characters-long"),
        ("PASSWORD_PEPPER", "test-pepper-for-unit-tests"),
        ("VERIFY_CASCADES", "true"),
    ]);

    AppSettings::from_env_provider(&env).expect("Failed to build test settings")
}

/// Full AppData on a fresh in-memory database
pub async fn setup_test_app_data() -> Arc<AppData> {
    let db = setup_test_db().await;
    Arc::new(AppData::init(db, test_settings()))
}

/// Insert an active user directly through the store. The password hash is a
/// placeholder, so this user cannot log in.
pub async fn insert_user(db: &DatabaseConnection, username: &str, is_superuser: bool) -> user::Model {
    UserStore::new()
        .create_user(
            db,
            NewUser {
                username,
                password_hash: "not-a-real-hash".to_string(),
                name: username,
                bio: None,
                is_superuser,
            },
            TEST_NOW,
        )
        .await
        .expect("Failed to insert test user")
}

/// Insert an active post; counters are not refreshed
pub async fn insert_post(db: &DatabaseConnection, owner_id: i32, text: &str) -> post::Model {
    PostStore::new()
        .create_post(db, owner_id, true, text, TEST_NOW)
        .await
        .expect("Failed to insert test post")
}

/// Insert an active comment; counters are not refreshed
pub async fn insert_comment(db: &DatabaseConnection, post_id: i32, owner_id: i32, text: &str) -> comment::Model {
    CommentStore::new()
        .create_comment(db, post_id, owner_id, true, text, TEST_NOW)
        .await
        .expect("Failed to insert test comment")
}

/// Authenticated API context acting as `user`
pub fn context_for(user: &user::Model) -> RequestContext {
    RequestContext::anonymous().with_auth(Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        is_superuser: user.is_superuser,
        exp: i64::MAX,
        iat: 0,
    })
}
