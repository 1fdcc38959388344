use thiserror::Error;

pub mod access;
pub mod cascade;
pub mod credential;
pub mod database;
pub mod entity;
pub mod relation;

pub use access::AccessError;
pub use cascade::CascadeError;
pub use credential::CredentialError;
pub use database::DatabaseError;
pub use entity::{EntityError, EntityKind};
pub use relation::RelationError;

/// Internal error type for store, provider and coordinator operations
///
/// Hybrid design separates infrastructure errors (shared) from domain errors.
/// Not exposed via API - endpoints must convert to ApiError.
#[derive(Error, Debug)]
pub enum InternalError {
    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error("Crypto error: {operation} failed: {message}")]
    Crypto { operation: String, message: String },

    #[error(transparent)]
    Credential(#[from] CredentialError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Relation(#[from] RelationError),

    #[error(transparent)]
    Cascade(#[from] CascadeError),
}

impl InternalError {
    pub fn database(operation: &str, source: sea_orm::DbErr) -> InternalError {
        InternalError::Database(DatabaseError::Operation {
            operation: operation.to_string(),
            source,
        })
    }

    pub fn crypto(operation: impl Into<String>, message: impl Into<String>) -> InternalError {
        InternalError::Crypto {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, InternalError::Entity(EntityError::NotFound { .. }))
            || matches!(self, InternalError::Relation(RelationError::NotFound { .. }))
    }

    pub fn is_permission_denied(&self) -> bool {
        matches!(self, InternalError::Access(AccessError::PermissionDenied { .. }))
    }
}
