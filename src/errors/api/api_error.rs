use crate::errors::internal::{
    AccessError, CascadeError, CredentialError, EntityError, InternalError, RelationError,
};
use poem_openapi::{ApiResponse, Object, payload::Json};
use std::fmt;

/// Standardized error response for all endpoints
#[derive(Object, Debug)]
pub struct ApiErrorResponse {
    /// Error code identifier
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code
    pub status_code: u16,
}

/// Errors surfaced by the HTTP layer
#[derive(ApiResponse, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials
    #[oai(status = 401)]
    Unauthorized(Json<ApiErrorResponse>),

    /// Actor lacks the required capability
    #[oai(status = 403)]
    Forbidden(Json<ApiErrorResponse>),

    /// Referenced entity does not exist or is hidden
    #[oai(status = 404)]
    NotFound(Json<ApiErrorResponse>),

    /// Relation or username already exists, or self-follow
    #[oai(status = 409)]
    Conflict(Json<ApiErrorResponse>),

    /// Internal server error
    #[oai(status = 500)]
    InternalError(Json<ApiErrorResponse>),
}

impl ApiError {
    fn response(error: &str, message: impl Into<String>, status_code: u16) -> Json<ApiErrorResponse> {
        Json(ApiErrorResponse {
            error: error.to_string(),
            message: message.into(),
            status_code,
        })
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(Self::response("unauthorized", message, 401))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(Self::response("permission_denied", message, 403))
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(Self::response("not_found", message, 404))
    }

    pub fn conflict(error: &str, message: impl Into<String>) -> Self {
        ApiError::Conflict(Self::response(error, message, 409))
    }

    /// Always generic; details stay in the logs
    fn internal_server_error() -> Self {
        ApiError::InternalError(Self::response(
            "internal_error",
            "An internal error occurred",
            500,
        ))
    }

    /// Convert InternalError to ApiError
    ///
    /// This is the explicit conversion point from internal errors to API errors.
    /// Infrastructure details are logged but not exposed to clients.
    pub fn from_internal_error(err: InternalError) -> Self {
        match &err {
            InternalError::Database(_) => {
                tracing::error!("Database failure: {}", err);
                Self::internal_server_error()
            }
            InternalError::Crypto { operation, .. } => {
                tracing::error!("Crypto error in {}: {}", operation, err);
                Self::internal_server_error()
            }
            InternalError::Cascade(CascadeError::InvariantViolation { entity, .. }) => {
                tracing::error!("Cascade left {} inconsistent: {}", entity, err);
                Self::internal_server_error()
            }

            InternalError::Credential(CredentialError::InvalidCredentials) => {
                tracing::debug!("Invalid credentials attempt");
                Self::unauthorized("Invalid username or password")
            }
            InternalError::Credential(CredentialError::Unauthenticated) => {
                Self::unauthorized("Authentication required")
            }
            InternalError::Credential(CredentialError::InvalidToken { reason }) => {
                tracing::debug!("Invalid token: {}", reason);
                Self::unauthorized("Invalid token")
            }
            InternalError::Credential(CredentialError::ExpiredToken) => {
                Self::unauthorized("Token has expired")
            }
            InternalError::Credential(CredentialError::DuplicateUsername(username)) => {
                tracing::warn!("Duplicate username attempt: {}", username);
                Self::conflict("duplicate_username", "Username already exists")
            }

            InternalError::Entity(EntityError::NotFound { .. }) => Self::not_found(err.to_string()),
            InternalError::Relation(RelationError::NotFound { .. }) => {
                Self::not_found(err.to_string())
            }
            InternalError::Access(AccessError::PermissionDenied { action }) => {
                tracing::debug!("Permission denied for {}", action);
                Self::forbidden(err.to_string())
            }
            InternalError::Relation(RelationError::DuplicateRelation { .. }) => {
                Self::conflict("duplicate_relation", err.to_string())
            }
            InternalError::Relation(RelationError::SelfReference { .. }) => {
                Self::conflict("self_reference", err.to_string())
            }
        }
    }

    /// Get the error payload from the error variant
    fn body(&self) -> &ApiErrorResponse {
        match self {
            ApiError::Unauthorized(json)
            | ApiError::Forbidden(json)
            | ApiError::NotFound(json)
            | ApiError::Conflict(json)
            | ApiError::InternalError(json) => &json.0,
        }
    }

    pub fn message(&self) -> &str {
        &self.body().message
    }

    pub fn status_code(&self) -> u16 {
        self.body().status_code
    }
}

impl From<InternalError> for ApiError {
    fn from(err: InternalError) -> Self {
        ApiError::from_internal_error(err)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}
