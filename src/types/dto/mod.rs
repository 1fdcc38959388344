// Request and response bodies of the HTTP API
pub mod auth;
pub mod comment;
pub mod common;
pub mod post;
pub mod relation;
pub mod user;
