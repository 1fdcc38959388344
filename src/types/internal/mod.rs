// Internal types - shared by stores, providers and coordinators
pub mod access;
pub mod auth;
pub mod cascade;
pub mod clock;
pub mod context;
pub mod page;
pub mod relation;
pub mod updates;
