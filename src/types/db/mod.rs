// Database entities - SeaORM models
pub mod comment;
pub mod follow;
pub mod like;
pub mod post;
pub mod user;
