// API layer - HTTP endpoints
pub mod auth;
pub mod comments;
pub mod health;
pub mod helpers;
pub mod posts;
pub mod relations;
pub mod users;


pub use auth::{AuthApi, BearerAuth};
pub use comments::CommentApi;
pub use health::HealthApi;
pub use posts::PostApi;
pub use relations::RelationApi;
pub use users::UserApi;
