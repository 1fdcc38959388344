use crate::errors::internal::AccessError;
use crate::types::internal::access::Action;
use crate::types::internal::auth::Principal;

/// Who may perform an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capability {
    Owner,
    Superuser,
    OwnerOrSuperuser,
    Authenticated,
}

fn required(action: Action) -> Capability {
    match action {
        Action::UpdatePostText | Action::UpdateCommentText | Action::UpdateProfile => {
            Capability::Owner
        }
        Action::ActivatePost | Action::DeletePost | Action::DeleteComment | Action::ReadPrivate => {
            Capability::Superuser
        }
        Action::DeactivatePost
        | Action::ActivateComment
        | Action::DeactivateComment
        | Action::SetUserActive => Capability::OwnerOrSuperuser,
        Action::Contribute => Capability::Authenticated,
    }
}

/// Ownership and superuser rule table for mutations
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessPolicy;

impl AccessPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Check `principal` against the rule for `action`.
    ///
    /// `owner_id` is the owning user of the target (the user itself for
    /// account-level actions); `None` when the action has no owned target.
    pub fn authorize(
        &self,
        principal: &Principal,
        action: Action,
        owner_id: Option<i32>,
    ) -> Result<(), AccessError> {
        let is_owner = owner_id == Some(principal.user_id);

        let allowed = match required(action) {
            Capability::Owner => is_owner,
            Capability::Superuser => principal.is_superuser,
            Capability::OwnerOrSuperuser => is_owner || principal.is_superuser,
            Capability::Authenticated => true,
        };

        if allowed {
            Ok(())
        } else {
            tracing::warn!(
                user_id = principal.user_id,
                action = %action,
                "Permission denied"
            );
            Err(AccessError::denied(action))
        }
    }
}
