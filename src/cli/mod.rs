// CLI module for administrative operations run with direct database access

pub mod migrate;
pub mod superuser;

use clap::{Parser, Subcommand};

use crate::app_data::AppData;
use crate::config::EnvironmentProvider;

/// Socialgraph backend CLI
#[derive(Parser)]
#[command(name = "socialgraph")]
#[command(about = "Social network backend server and administration CLI", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the HTTP server (default)
    Serve,

    /// Run pending database migrations and exit
    Migrate,

    /// Create a superuser account; the password is read from SUPERUSER_PASSWORD
    CreateSuperuser {
        #[arg(long)]
        username: String,

        #[arg(long)]
        name: String,
    },

    /// Grant or revoke superuser privileges
    SetSuperuser {
        username: String,

        /// Revoke instead of grant
        #[arg(long)]
        revoke: bool,
    },
}

/// Execute an administrative CLI command
///
/// `Serve` and `Migrate` are handled by the binary before `AppData` exists.
pub async fn execute_command(
    command: Commands,
    app_data: std::sync::Arc<AppData>,
    env: &dyn EnvironmentProvider,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Serve | Commands::Migrate => {}
        Commands::CreateSuperuser { username, name } => {
            superuser::create_superuser(app_data, env, username, name).await?;
        }
        Commands::SetSuperuser { username, revoke } => {
            superuser::set_superuser(app_data, &username, !revoke).await?;
        }
    }

    Ok(())
}
