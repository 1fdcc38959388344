#[cfg(test)]
mod tests {
    use crate::errors::ApiError;
    use crate::errors::internal::{
        AccessError, CascadeError, CredentialError, EntityError, InternalError, RelationError,
    };
    use crate::types::internal::access::Action;
    use sea_orm::DbErr;

    #[test]
    fn test_database_error_converts_to_internal_server_error() {
        let db_err = DbErr::RecordNotFound("test".to_string());
        let api_err = ApiError::from_internal_error(InternalError::database("get_user", db_err));

        assert_eq!(api_err.status_code(), 500);
        assert_eq!(api_err.message(), "An internal error occurred");
    }

    #[test]
    fn test_invariant_violation_is_not_exposed() {
        let err = InternalError::from(CascadeError::violation("post 3", "likes is 2, expected 1"));
        let api_err = ApiError::from_internal_error(err);

        assert_eq!(api_err.status_code(), 500);
        assert!(!api_err.message().contains("likes"));
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let api_err = ApiError::from(InternalError::from(EntityError::post(7)));

        assert_eq!(api_err.status_code(), 404);
        assert_eq!(api_err.message(), "post not found: 7");
    }

    #[test]
    fn test_missing_relation_maps_to_404() {
        let api_err = ApiError::from(InternalError::from(RelationError::not_found("like on post 1")));
        assert_eq!(api_err.status_code(), 404);
    }

    #[test]
    fn test_permission_denied_maps_to_403() {
        let err = InternalError::from(AccessError::denied(Action::DeletePost));
        let api_err = ApiError::from_internal_error(err);

        assert_eq!(api_err.status_code(), 403);
        assert_eq!(api_err.message(), "Permission denied: delete_post");
    }

    #[test]
    fn test_relation_conflicts_map_to_409() {
        let duplicate = ApiError::from(InternalError::from(RelationError::duplicate("follow 1 -> 2")));
        let self_follow = ApiError::from(InternalError::from(RelationError::SelfReference { user_id: 1 }));
        let username = ApiError::from(InternalError::from(CredentialError::DuplicateUsername(
            "alice".to_string(),
        )));

        assert_eq!(duplicate.status_code(), 409);
        assert_eq!(self_follow.status_code(), 409);
        assert_eq!(username.status_code(), 409);
        assert!(matches!(self_follow, ApiError::Conflict(_)));
    }

    #[test]
    fn test_credential_errors_map_to_401() {
        for err in [
            CredentialError::InvalidCredentials,
            CredentialError::Unauthenticated,
            CredentialError::ExpiredToken,
            CredentialError::invalid_token("bad signature"),
        ] {
            let api_err = ApiError::from(InternalError::from(err));
            assert_eq!(api_err.status_code(), 401);
        }
    }
}
