use crate::types::internal::auth::Claims;

use super::{request_id::RequestId, request_source::RequestSource};

/// Request context that flows through all layers
///
/// Carries the request id used in log lines and, for authenticated API calls,
/// the validated JWT claims. The acting principal is resolved from the claims
/// by the coordinators inside the request transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    /// Unique identifier for this request (for tracing across layers)
    pub request_id: RequestId,

    /// Source of the request (API or CLI)
    pub source: RequestSource,

    /// Full JWT claims if authenticated
    pub claims: Option<Claims>,

    /// Actor who initiated the operation
    pub actor_id: String,
}

impl RequestContext {
    /// Unauthenticated API request
    pub fn anonymous() -> Self {
        Self {
            request_id: RequestId::new(),
            source: RequestSource::API,
            claims: None,
            actor_id: "anonymous".to_owned(),
        }
    }

    /// Create a RequestContext for CLI operations
    pub fn for_cli(command_name: &str) -> Self {
        Self {
            request_id: RequestId::new(),
            source: RequestSource::CLI,
            claims: None,
            actor_id: format!("cli:{}", command_name),
        }
    }

    /// Set authentication state with claims; the actor becomes the token subject
    pub fn with_auth(mut self, claims: Claims) -> Self {
        self.actor_id = claims.sub.clone();
        self.claims = Some(claims);
        self
    }

    pub fn is_authenticated(&self) -> bool {
        self.claims.is_some()
    }

    /// User id carried by the token, if any and well-formed
    pub fn claimed_user_id(&self) -> Option<i32> {
        self.claims.as_ref().and_then(|claims| claims.sub.parse().ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims_for(sub: &str) -> Claims {
        Claims {
            sub: sub.to_owned(),
            username: "alice".to_owned(),
            is_superuser: false,
            exp: 9999999999,
            iat: 0,
        }
    }

    #[test]
    fn test_anonymous_context_has_no_user() {
        let ctx = RequestContext::anonymous();
        assert!(!ctx.is_authenticated());
        assert_eq!(ctx.claimed_user_id(), None);
        assert_eq!(ctx.source, RequestSource::API);
    }

    #[test]
    fn test_with_auth_sets_actor() {
        let ctx = RequestContext::anonymous().with_auth(claims_for("42"));
        assert!(ctx.is_authenticated());
        assert_eq!(ctx.actor_id, "42");
        assert_eq!(ctx.claimed_user_id(), Some(42));
    }

    #[test]
    fn test_malformed_subject_yields_no_user() {
        let ctx = RequestContext::anonymous().with_auth(claims_for("not-a-number"));
        assert_eq!(ctx.claimed_user_id(), None);
    }

    #[test]
    fn test_cli_context_actor() {
        let ctx = RequestContext::for_cli("create-superuser");
        assert_eq!(ctx.actor_id, "cli:create-superuser");
        assert_eq!(ctx.source, RequestSource::CLI);
    }
}
