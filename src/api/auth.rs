use poem_openapi::{auth::Bearer, payload::Json, OpenApi, SecurityScheme, Tags};
use std::sync::Arc;

use crate::api::helpers;
use crate::coordinators::UserCoordinator;
use crate::errors::ApiError;
use crate::types::dto::auth::{LoginRequest, SignupRequest, TokenResponse};
use crate::types::dto::user::UserResponse;
use crate::types::internal::context::RequestContext;
use crate::types::internal::updates::NewAccount;

/// Authentication API endpoints
pub struct AuthApi {
    user_coordinator: Arc<UserCoordinator>,
}

impl AuthApi {
    pub fn new(user_coordinator: Arc<UserCoordinator>) -> Self {
        Self { user_coordinator }
    }
}

/// JWT Bearer token authentication
#[derive(SecurityScheme)]
#[oai(
    ty = "bearer",
    key_name = "Authorization",
    key_in = "header",
    bearer_format = "JWT"
)]
pub struct BearerAuth(pub Bearer);

/// API tags for authentication endpoints
#[derive(Tags)]
enum AuthTags {
    /// Authentication endpoints
    Authentication,
}

#[OpenApi(prefix_path = "/auth")]
impl AuthApi {
    /// Create an account
    #[oai(path = "/signup", method = "post", tag = "AuthTags::Authentication")]
    async fn signup(&self, body: Json<SignupRequest>) -> Result<Json<UserResponse>, ApiError> {
        let ctx = RequestContext::anonymous();
        let body = body.0;

        let user = self
            .user_coordinator
            .signup(
                &ctx,
                NewAccount {
                    username: body.username,
                    password: body.password,
                    name: body.name,
                    bio: body.bio,
                },
            )
            .await?;

        Ok(Json(user.into()))
    }

    /// Login with username and password to receive an access token
    #[oai(path = "/login", method = "post", tag = "AuthTags::Authentication")]
    async fn login(&self, body: Json<LoginRequest>) -> Result<Json<TokenResponse>, ApiError> {
        let ctx = RequestContext::anonymous();

        let outcome = self
            .user_coordinator
            .login(&ctx, &body.username, &body.password)
            .await?;
        let expires_in = outcome.expires_at - chrono::Utc::now().timestamp();

        Ok(Json(TokenResponse {
            access_token: outcome.access_token,
            token_type: "Bearer".to_string(),
            expires_in,
            expires_at: outcome.expires_at,
        }))
    }

    /// The authenticated user's own account
    #[oai(path = "/whoami", method = "get", tag = "AuthTags::Authentication")]
    async fn whoami(&self, auth: BearerAuth) -> Result<Json<UserResponse>, ApiError> {
        let ctx = helpers::auth_context(&self.user_coordinator.token_provider(), &auth)?;

        let user = self.user_coordinator.whoami(&ctx).await?;

        Ok(Json(user.into()))
    }
}
