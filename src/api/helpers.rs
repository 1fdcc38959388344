use crate::api::BearerAuth;
use crate::errors::ApiError;
use crate::providers::TokenProvider;
use crate::types::internal::context::RequestContext;
use crate::types::internal::page::Page;

/// Validate the bearer token and build an authenticated request context
pub fn auth_context(token_provider: &TokenProvider, auth: &BearerAuth) -> Result<RequestContext, ApiError> {
    let claims = token_provider.validate_jwt(&auth.0.token)?;
    Ok(RequestContext::anonymous().with_auth(claims))
}

/// Offset/limit query parameters, limit capped at `max_limit`
pub fn page(offset: Option<u64>, limit: Option<u64>, max_limit: u64) -> Page {
    Page::new(offset, limit, max_limit)
}
