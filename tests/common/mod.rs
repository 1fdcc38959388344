// Common test utilities for integration tests

use chrono::{DateTime, TimeZone, Utc};
use migration::{Migrator, MigratorTrait};
use sea_orm::{Database, DatabaseConnection, EntityTrait, QueryOrder};
use std::sync::Arc;

use socialgraph_backend::app_data::AppData;
use socialgraph_backend::config::{AppSettings, MapEnvironment};
use socialgraph_backend::coordinators::UserCoordinator;
use socialgraph_backend::types::db::{comment, follow, like, post, user};
use socialgraph_backend::types::internal::auth::Claims;
use socialgraph_backend::types::internal::clock::Clock;
use socialgraph_backend::types::internal::context::RequestContext;
use socialgraph_backend::types::internal::updates::NewAccount;

/// Clock stopped at a fixed instant so timestamps do not drift between snapshots
pub struct FrozenClock(DateTime<Utc>);

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// AppData on a fresh in-memory database with cascade verification enabled
pub async fn setup_app() -> Arc<AppData> {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    let env = MapEnvironment::empty().with_vars(&[
        ("JWT_SECRET", "integration-secret-key-at-least-32-chars"),
        ("PASSWORD_PEPPER", "integration-pepper"),
        ("VERIFY_CASCADES", "true"),
    ]);
    let settings = AppSettings::from_env_provider(&env).expect("Failed to build settings");
    let clock = FrozenClock(
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0)
            .single()
            .expect("valid instant"),
    );

    Arc::new(AppData::with_clock(db, settings, Arc::new(clock)))
}

/// Sign a user up through the coordinator
pub async fn signup(app: &Arc<AppData>, username: &str) -> user::Model {
    UserCoordinator::new(app.clone())
        .signup(
            &RequestContext::anonymous(),
            NewAccount {
                username: username.to_string(),
                password: "password-123".to_string(),
                name: username.to_string(),
                bio: None,
            },
        )
        .await
        .expect("Failed to sign up")
}

/// Sign up a user and grant the superuser bit
pub async fn superuser(app: &Arc<AppData>, username: &str) -> user::Model {
    UserCoordinator::new(app.clone())
        .create_superuser(
            &RequestContext::for_cli("test"),
            NewAccount {
                username: username.to_string(),
                password: "password-123".to_string(),
                name: username.to_string(),
                bio: None,
            },
        )
        .await
        .expect("Failed to create superuser")
}

/// Authenticated context acting as `user`
pub fn ctx(user: &user::Model) -> RequestContext {
    RequestContext::anonymous().with_auth(Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        is_superuser: user.is_superuser,
        exp: i64::MAX,
        iat: 0,
    })
}

/// Re-read a user row
pub async fn reload_user(app: &Arc<AppData>, id: i32) -> user::Model {
    app.user_store
        .get_by_id(&app.db, id)
        .await
        .expect("user exists")
}

/// Every row of every table, ordered by id
#[derive(Debug, PartialEq)]
pub struct Snapshot {
    pub users: Vec<user::Model>,
    pub posts: Vec<post::Model>,
    pub comments: Vec<comment::Model>,
    pub likes: Vec<like::Model>,
    pub follows: Vec<follow::Model>,
}

pub async fn snapshot(db: &DatabaseConnection) -> Snapshot {
    Snapshot {
        users: user::Entity::find()
            .order_by_asc(user::Column::Id)
            .all(db)
            .await
            .expect("users"),
        posts: post::Entity::find()
            .order_by_asc(post::Column::Id)
            .all(db)
            .await
            .expect("posts"),
        comments: comment::Entity::find()
            .order_by_asc(comment::Column::Id)
            .all(db)
            .await
            .expect("comments"),
        likes: like::Entity::find()
            .order_by_asc(like::Column::Id)
            .all(db)
            .await
            .expect("likes"),
        follows: follow::Entity::find()
            .order_by_asc(follow::Column::Id)
            .all(db)
            .await
            .expect("follows"),
    }
}
