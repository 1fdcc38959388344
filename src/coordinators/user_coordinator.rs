use sea_orm::DatabaseConnection;
use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::database::{begin_transaction, commit_transaction};
use crate::coordinators::{principal_of, require_active, resolve_actor};
use crate::errors::InternalError;
use crate::errors::internal::{CredentialError, EntityError};
use crate::providers::{AccessPolicy, CascadeProvider, CryptoProvider, TokenProvider};
use crate::stores::{NewUser, UserStore};
use crate::types::db::user;
use crate::types::internal::access::Action;
use crate::types::internal::cascade::RootTransition;
use crate::types::internal::clock::Clock;
use crate::types::internal::context::RequestContext;
use crate::types::internal::page::Page;
use crate::types::internal::updates::{NewAccount, UserProfileUpdate};

/// Issued access token
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub access_token: String,
    pub expires_at: i64,
    pub user: user::Model,
}

/// Account workflows: signup, login, profile and activation
pub struct UserCoordinator {
    db: DatabaseConnection,
    clock: Arc<dyn Clock>,
    user_store: Arc<UserStore>,
    cascade_provider: Arc<CascadeProvider>,
    access_policy: Arc<AccessPolicy>,
    crypto_provider: Arc<CryptoProvider>,
    token_provider: Arc<TokenProvider>,
}

impl UserCoordinator {
    pub fn new(app_data: Arc<AppData>) -> Self {
        Self {
            db: app_data.db.clone(),
            clock: app_data.clock.clone(),
            user_store: app_data.user_store.clone(),
            cascade_provider: app_data.cascade_provider.clone(),
            access_policy: app_data.access_policy.clone(),
            crypto_provider: app_data.crypto_provider.clone(),
            token_provider: app_data.token_provider.clone(),
        }
    }

    pub fn token_provider(&self) -> Arc<TokenProvider> {
        self.token_provider.clone()
    }

    async fn create_account(
        &self,
        ctx: &RequestContext,
        account: NewAccount,
        is_superuser: bool,
    ) -> Result<user::Model, InternalError> {
        let password_hash = self.crypto_provider.hash_password(&account.password)?;

        let txn = begin_transaction(&self.db).await?;
        let user = self
            .user_store
            .create_user(
                &txn,
                NewUser {
                    username: &account.username,
                    password_hash,
                    name: &account.name,
                    bio: account.bio.as_deref(),
                    is_superuser,
                },
                &self.clock.stamp(),
            )
            .await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            user_id = user.id,
            username = %user.username,
            is_superuser,
            "User created"
        );
        Ok(user)
    }

    /// Register a new active user
    ///
    /// # Errors
    /// * `CredentialError::DuplicateUsername` - username taken
    pub async fn signup(&self, ctx: &RequestContext, account: NewAccount) -> Result<user::Model, InternalError> {
        self.create_account(ctx, account, false).await
    }

    /// Create a superuser account (CLI only)
    pub async fn create_superuser(&self, ctx: &RequestContext, account: NewAccount) -> Result<user::Model, InternalError> {
        self.create_account(ctx, account, true).await
    }

    /// Grant or revoke the superuser bit (CLI only)
    pub async fn set_superuser(
        &self,
        ctx: &RequestContext,
        username: &str,
        is_superuser: bool,
    ) -> Result<user::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;
        let user = self.user_store.get_by_username(&txn, username).await?;
        self.user_store
            .set_superuser(&txn, user.id, is_superuser, &self.clock.stamp())
            .await?;
        let user = self.user_store.get_by_id(&txn, user.id).await?;
        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor = %ctx.actor_id,
            user_id = user.id,
            is_superuser,
            "Superuser flag changed"
        );
        Ok(user)
    }

    /// Verify credentials and issue an access token.
    ///
    /// Deactivated users may still log in, so they can reactivate themselves.
    ///
    /// # Errors
    /// * `CredentialError::InvalidCredentials` - unknown username or wrong password
    pub async fn login(&self, ctx: &RequestContext, username: &str, password: &str) -> Result<LoginOutcome, InternalError> {
        let user = self
            .user_store
            .find_by_username(&self.db, username)
            .await?
            .ok_or(CredentialError::InvalidCredentials)?;

        if !self.crypto_provider.verify_password(password, &user.password_hash)? {
            tracing::warn!(request_id = %ctx.request_id, username, "Login failed");
            return Err(CredentialError::InvalidCredentials.into());
        }

        let (access_token, expires_at) = self.token_provider.generate_jwt(&user)?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Login succeeded");
        Ok(LoginOutcome {
            access_token,
            expires_at,
            user,
        })
    }

    /// The caller's own account, active or not
    pub async fn whoami(&self, ctx: &RequestContext) -> Result<user::Model, InternalError> {
        resolve_actor(&self.user_store, &self.db, ctx).await
    }

    /// # Errors
    /// * `EntityError::NotFound` - missing or deactivated user
    pub async fn get_active_user(&self, username: &str) -> Result<user::Model, InternalError> {
        match self.user_store.find_by_username(&self.db, username).await? {
            Some(user) if user.is_active => Ok(user),
            _ => Err(EntityError::username(username).into()),
        }
    }

    pub async fn list_active_users(&self, page: Page) -> Result<Vec<user::Model>, InternalError> {
        self.user_store.list_active(&self.db, page).await
    }

    pub async fn list_all_users(&self, ctx: &RequestContext, page: Page) -> Result<Vec<user::Model>, InternalError> {
        let actor = resolve_actor(&self.user_store, &self.db, ctx).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::ReadPrivate, None)?;

        self.user_store.list_all(&self.db, page).await
    }

    pub async fn get_user_by_id(&self, ctx: &RequestContext, id: i32) -> Result<user::Model, InternalError> {
        let actor = resolve_actor(&self.user_store, &self.db, ctx).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::ReadPrivate, None)?;

        self.user_store.get_by_id(&self.db, id).await
    }

    /// Update name and bio of the caller's own account
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        username: &str,
        update: UserProfileUpdate,
    ) -> Result<user::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        require_active(&actor, Action::UpdateProfile)?;
        let target = self.user_store.get_by_username(&txn, username).await?;
        self.access_policy
            .authorize(&principal_of(&actor), Action::UpdateProfile, Some(target.id))?;

        let user = if update.is_empty() {
            target
        } else {
            self.user_store
                .update_profile(&txn, target.id, &update, &self.clock.stamp())
                .await?
        };

        commit_transaction(txn).await?;

        tracing::info!(request_id = %ctx.request_id, user_id = user.id, "Profile updated");
        Ok(user)
    }

    /// Activate or deactivate an account and cascade the change.
    ///
    /// A deactivated user may reactivate themselves; any other action by a
    /// deactivated user is denied.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        username: &str,
        active: bool,
    ) -> Result<user::Model, InternalError> {
        let txn = begin_transaction(&self.db).await?;

        let actor = resolve_actor(&self.user_store, &txn, ctx).await?;
        let target = self.user_store.get_by_username(&txn, username).await?;

        let self_reactivation = active && actor.id == target.id;
        if !self_reactivation {
            require_active(&actor, Action::SetUserActive)?;
        }
        self.access_policy
            .authorize(&principal_of(&actor), Action::SetUserActive, Some(target.id))?;

        self.cascade_provider
            .transition(&txn, RootTransition::user(target.id, active), &self.clock.stamp())
            .await?;
        let user = self.user_store.get_by_id(&txn, target.id).await?;

        commit_transaction(txn).await?;

        tracing::info!(
            request_id = %ctx.request_id,
            actor_id = actor.id,
            user_id = user.id,
            active,
            "User activation changed"
        );
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::utils::{context_for, insert_user, setup_test_app_data};

    fn account(username: &str) -> NewAccount {
        NewAccount {
            username: username.to_string(),
            password: "s3cret-pass".to_string(),
            name: "Test User".to_string(),
            bio: None,
        }
    }

    #[tokio::test]
    async fn test_signup_then_login() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data.clone());
        let ctx = RequestContext::anonymous();

        let user = coordinator.signup(&ctx, account("alice")).await.unwrap();
        let outcome = coordinator.login(&ctx, "alice", "s3cret-pass").await.unwrap();

        assert!(user.is_active);
        assert!(!user.is_superuser);
        assert_eq!(outcome.user.id, user.id);
        let claims = app_data.token_provider.validate_jwt(&outcome.access_token).unwrap();
        assert_eq!(claims.sub, user.id.to_string());
    }

    #[tokio::test]
    async fn test_signup_duplicate_username() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data);
        let ctx = RequestContext::anonymous();

        coordinator.signup(&ctx, account("alice")).await.unwrap();
        let result = coordinator.signup(&ctx, account("alice")).await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::DuplicateUsername(_)))
        ));
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let app_data = setup_test_app_data().await;
        let coordinator = UserCoordinator::new(app_data);
        let ctx = RequestContext::anonymous();
        coordinator.signup(&ctx, account("alice")).await.unwrap();

        let result = coordinator.login(&ctx, "alice", "nope").await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::InvalidCredentials))
        ));
    }

    #[tokio::test]
    async fn test_unauthenticated_mutation_is_rejected() {
        let app_data = setup_test_app_data().await;
        insert_user(&app_data.db, "alice", false).await;
        let coordinator = UserCoordinator::new(app_data);

        let result = coordinator
            .set_active(&RequestContext::anonymous(), "alice", false)
            .await;

        assert!(matches!(
            result,
            Err(InternalError::Credential(CredentialError::Unauthenticated))
        ));
    }

    #[tokio::test]
    async fn test_deactivated_user_can_only_reactivate_self() {
        let app_data = setup_test_app_data().await;
        let alice = insert_user(&app_data.db, "alice", false).await;
        insert_user(&app_data.db, "bob", false).await;
        let coordinator = UserCoordinator::new(app_data);
        let ctx = context_for(&alice);

        coordinator.set_active(&ctx, "alice", false).await.unwrap();

        let update = UserProfileUpdate {
            name: Some("Alice".to_string()),
            bio: None,
        };
        let denied = coordinator.update_profile(&ctx, "alice", update).await;
        assert!(denied.is_err_and(|e| e.is_permission_denied()));

        let reactivated = coordinator.set_active(&ctx, "alice", true).await.unwrap();
        assert!(reactivated.is_active);
    }

    #[tokio::test]
    async fn test_other_user_cannot_deactivate() {
        let app_data = setup_test_app_data().await;
        let alice = insert_user(&app_data.db, "alice", false).await;
        insert_user(&app_data.db, "bob", false).await;
        let coordinator = UserCoordinator::new(app_data);

        let result = coordinator.set_active(&context_for(&alice), "bob", false).await;

        assert!(result.is_err_and(|e| e.is_permission_denied()));
    }

    #[tokio::test]
    async fn test_superuser_deactivates_other_user() {
        let app_data = setup_test_app_data().await;
        let admin = insert_user(&app_data.db, "admin", true).await;
        insert_user(&app_data.db, "bob", false).await;
        let coordinator = UserCoordinator::new(app_data);

        let bob = coordinator.set_active(&context_for(&admin), "bob", false).await.unwrap();

        assert!(!bob.is_active);
        assert!(coordinator.get_active_user("bob").await.is_err_and(|e| e.is_not_found()));
    }

    #[tokio::test]
    async fn test_private_listing_requires_superuser() {
        let app_data = setup_test_app_data().await;
        let alice = insert_user(&app_data.db, "alice", false).await;
        let admin = insert_user(&app_data.db, "admin", true).await;
        let coordinator = UserCoordinator::new(app_data);

        let denied = coordinator.list_all_users(&context_for(&alice), Page::default()).await;
        let listed = coordinator.list_all_users(&context_for(&admin), Page::default()).await.unwrap();

        assert!(denied.is_err_and(|e| e.is_permission_denied()));
        assert_eq!(listed.len(), 2);
    }
}
