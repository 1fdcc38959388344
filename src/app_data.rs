use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::config::AppSettings;
use crate::providers::{
    AccessPolicy, CascadeProvider, CounterProvider, CryptoProvider, RelationshipProvider,
    TokenProvider,
};
use crate::stores::{CommentStore, FollowStore, LikeStore, PostStore, UserStore};
use crate::types::internal::clock::{Clock, SystemClock};

/// Centralized application data following the main-owned stores pattern
///
/// Everything is created once in main.rs and shared across coordinators.
///
/// ```text
/// main.rs
///   ↓
/// AppData::init(db, settings)
///   ↓ creates once
///   ├─ stores (user, post, comment, like, follow)
///   ├─ counter_provider ← stores
///   ├─ cascade_provider ← stores + counter_provider
///   ├─ relationship_provider ← stores + counter_provider
///   └─ access_policy, crypto_provider, token_provider ← settings
///   ↓ wrapped in Arc<AppData>
///   ↓ passed to coordinators
/// ```
pub struct AppData {
    pub db: DatabaseConnection,
    pub settings: Arc<AppSettings>,
    pub clock: Arc<dyn Clock>,

    pub user_store: Arc<UserStore>,
    pub post_store: Arc<PostStore>,
    pub comment_store: Arc<CommentStore>,
    pub like_store: Arc<LikeStore>,
    pub follow_store: Arc<FollowStore>,

    pub counter_provider: Arc<CounterProvider>,
    pub cascade_provider: Arc<CascadeProvider>,
    pub relationship_provider: Arc<RelationshipProvider>,
    pub access_policy: Arc<AccessPolicy>,
    pub crypto_provider: Arc<CryptoProvider>,
    pub token_provider: Arc<TokenProvider>,
}

impl AppData {
    /// Initialize all application data on a migrated database
    pub fn init(db: DatabaseConnection, settings: AppSettings) -> Self {
        Self::with_clock(db, settings, Arc::new(SystemClock))
    }

    pub fn with_clock(db: DatabaseConnection, settings: AppSettings, clock: Arc<dyn Clock>) -> Self {
        tracing::info!("Initializing AppData...");

        let user_store = Arc::new(UserStore::new());
        let post_store = Arc::new(PostStore::new());
        let comment_store = Arc::new(CommentStore::new());
        let like_store = Arc::new(LikeStore::new());
        let follow_store = Arc::new(FollowStore::new());
        tracing::debug!("Stores created");

        let counter_provider = Arc::new(CounterProvider::new(
            user_store.clone(),
            post_store.clone(),
            comment_store.clone(),
            like_store.clone(),
            follow_store.clone(),
        ));

        let cascade_provider = Arc::new(CascadeProvider::new(
            user_store.clone(),
            post_store.clone(),
            comment_store.clone(),
            like_store.clone(),
            follow_store.clone(),
            counter_provider.clone(),
            settings.verify_cascades(),
        ));

        let relationship_provider = Arc::new(RelationshipProvider::new(
            user_store.clone(),
            post_store.clone(),
            comment_store.clone(),
            like_store.clone(),
            follow_store.clone(),
            counter_provider.clone(),
        ));

        let crypto_provider = Arc::new(CryptoProvider::new(settings.password_pepper()));
        let token_provider = Arc::new(TokenProvider::new(
            settings.jwt_secret(),
            settings.token_expiry_minutes(),
        ));
        tracing::debug!("Providers created");

        tracing::info!("AppData initialization complete");

        Self {
            db,
            settings: Arc::new(settings),
            clock,
            user_store,
            post_store,
            comment_store,
            like_store,
            follow_store,
            counter_provider,
            cascade_provider,
            relationship_provider,
            access_policy: Arc::new(AccessPolicy::new()),
            crypto_provider,
            token_provider,
        }
    }

    /// Current timestamp for created_at / updated_at columns
    pub fn now(&self) -> String {
        self.clock.stamp()
    }
}
