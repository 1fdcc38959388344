// Superuser management commands

use std::sync::Arc;

use crate::app_data::AppData;
use crate::config::{ConfigError, EnvironmentProvider};
use crate::coordinators::UserCoordinator;
use crate::types::internal::context::RequestContext;
use crate::types::internal::updates::NewAccount;

/// Create a superuser with the password taken from `SUPERUSER_PASSWORD`
pub async fn create_superuser(
    app_data: Arc<AppData>,
    env: &dyn EnvironmentProvider,
    username: String,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("create_superuser");

    let password = env
        .get_var("SUPERUSER_PASSWORD")
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ConfigError::missing("SUPERUSER_PASSWORD"))?;

    let coordinator = UserCoordinator::new(app_data);
    let user = coordinator
        .create_superuser(
            &ctx,
            NewAccount {
                username,
                password,
                name,
                bio: None,
            },
        )
        .await?;

    println!("Superuser '{}' created (id {})", user.username, user.id);
    Ok(())
}

/// Grant (`true`) or revoke (`false`) the superuser bit of an existing account
pub async fn set_superuser(
    app_data: Arc<AppData>,
    username: &str,
    is_superuser: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = RequestContext::for_cli("set_superuser");

    let coordinator = UserCoordinator::new(app_data);
    let user = coordinator.set_superuser(&ctx, username, is_superuser).await?;

    if user.is_superuser {
        println!("'{}' is now a superuser", user.username);
    } else {
        println!("'{}' is no longer a superuser", user.username);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MapEnvironment;
    use crate::test::utils::setup_test_app_data;

    #[tokio::test]
    async fn test_create_superuser_reads_password_from_env() {
        let app_data = setup_test_app_data().await;
        let env = MapEnvironment::empty().with_var("SUPERUSER_PASSWORD", "root-pass-123");

        create_superuser(app_data.clone(), &env, "root".to_string(), "Root".to_string())
            .await
            .unwrap();

        let coordinator = UserCoordinator::new(app_data);
        let outcome = coordinator
            .login(&RequestContext::anonymous(), "root", "root-pass-123")
            .await
            .unwrap();
        assert!(outcome.user.is_superuser);
    }

    #[tokio::test]
    async fn test_create_superuser_without_password_fails() {
        let app_data = setup_test_app_data().await;

        let result = create_superuser(app_data, &MapEnvironment::empty(), "root".to_string(), "Root".to_string()).await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_revoke_superuser() {
        let app_data = setup_test_app_data().await;
        let env = MapEnvironment::empty().with_var("SUPERUSER_PASSWORD", "root-pass-123");
        create_superuser(app_data.clone(), &env, "root".to_string(), "Root".to_string())
            .await
            .unwrap();

        set_superuser(app_data.clone(), "root", false).await.unwrap();

        let user = app_data
            .user_store
            .get_by_username(&app_data.db, "root")
            .await
            .unwrap();
        assert!(!user.is_superuser);
    }

    #[tokio::test]
    async fn test_set_superuser_unknown_user() {
        let app_data = setup_test_app_data().await;

        let result = UserCoordinator::new(app_data)
            .set_superuser(&RequestContext::for_cli("set_superuser"), "ghost", true)
            .await;

        assert!(result.unwrap_err().is_not_found());
    }
}
