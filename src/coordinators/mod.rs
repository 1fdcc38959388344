// Coordinators layer - Workflow orchestration
//
// Coordinators own the request transaction. Each mutating workflow begins one
// transaction, resolves the actor, checks the target exists, authorizes,
// mutates, cascades and refreshes counters, then commits. Returning early with
// an error drops the transaction, which rolls everything back.

pub mod comment_coordinator;
pub mod post_coordinator;
pub mod relation_coordinator;
pub mod user_coordinator;

pub use comment_coordinator::CommentCoordinator;
pub use post_coordinator::PostCoordinator;
pub use relation_coordinator::RelationCoordinator;
pub use user_coordinator::UserCoordinator;

use sea_orm::ConnectionTrait;

use crate::errors::InternalError;
use crate::errors::internal::{AccessError, CredentialError};
use crate::stores::UserStore;
use crate::types::db::user;
use crate::types::internal::access::Action;
use crate::types::internal::auth::Principal;
use crate::types::internal::context::RequestContext;

/// Load the acting user named by the request's token.
///
/// The row is re-read so a stale superuser claim or a deactivation after the
/// token was issued is honored.
pub(crate) async fn resolve_actor(
    user_store: &UserStore,
    conn: &impl ConnectionTrait,
    ctx: &RequestContext,
) -> Result<user::Model, InternalError> {
    if !ctx.is_authenticated() {
        return Err(CredentialError::Unauthenticated.into());
    }

    let user_id = ctx
        .claimed_user_id()
        .ok_or_else(|| CredentialError::invalid_token("subject is not a user id"))?;

    user_store
        .find_by_id(conn, user_id)
        .await?
        .ok_or_else(|| CredentialError::invalid_token("subject no longer exists").into())
}

pub(crate) fn principal_of(actor: &user::Model) -> Principal {
    Principal::new(actor.id, actor.is_superuser)
}

/// Deactivated users cannot act, except through [`Action::SetUserActive`]
/// on themselves, which the user coordinator checks separately.
pub(crate) fn require_active(actor: &user::Model, action: Action) -> Result<(), InternalError> {
    if actor.is_active {
        Ok(())
    } else {
        tracing::warn!(user_id = actor.id, action = %action, "Inactive actor rejected");
        Err(AccessError::denied(action).into())
    }
}
