use clap::Parser;
use poem::{listener::TcpListener, Route, Server};
use poem_openapi::OpenApiService;
use std::sync::Arc;

use socialgraph_backend::api::{AuthApi, CommentApi, HealthApi, PostApi, RelationApi, UserApi};
use socialgraph_backend::app_data::AppData;
use socialgraph_backend::cli::{self, migrate, Cli, Commands};
use socialgraph_backend::config::database::{connect_database, migrate_database};
use socialgraph_backend::config::{init_logging, AppSettings, SystemEnvironment};
use socialgraph_backend::coordinators::{
    CommentCoordinator, PostCoordinator, RelationCoordinator, UserCoordinator,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    init_logging(&SystemEnvironment)?;

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Serve);

    let settings = match AppSettings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return Err(e.into());
        }
    };

    if let Commands::Migrate = command {
        return migrate::run_migrations(settings.database_url()).await;
    }

    let db = connect_database(settings.database_url()).await?;
    migrate_database(&db).await?;

    let app_data = Arc::new(AppData::init(db, settings));

    if !matches!(command, Commands::Serve) {
        return cli::execute_command(command, app_data, &SystemEnvironment).await;
    }

    serve(app_data).await?;
    Ok(())
}

async fn serve(app_data: Arc<AppData>) -> Result<(), std::io::Error> {
    let settings = app_data.settings.clone();
    let page_limit_max = settings.page_limit_max();
    let token_provider = app_data.token_provider.clone();

    let user_coordinator = Arc::new(UserCoordinator::new(app_data.clone()));
    let post_coordinator = Arc::new(PostCoordinator::new(app_data.clone()));
    let comment_coordinator = Arc::new(CommentCoordinator::new(app_data.clone()));
    let relation_coordinator = Arc::new(RelationCoordinator::new(app_data.clone()));

    let apis = (
        HealthApi,
        AuthApi::new(user_coordinator.clone()),
        UserApi::new(
            user_coordinator,
            post_coordinator.clone(),
            token_provider.clone(),
            page_limit_max,
        ),
        PostApi::new(
            post_coordinator,
            comment_coordinator.clone(),
            token_provider.clone(),
            page_limit_max,
        ),
        CommentApi::new(comment_coordinator, token_provider.clone(), page_limit_max),
        RelationApi::new(relation_coordinator, token_provider, page_limit_max),
    );

    let address = settings.server_address();
    let api_service = OpenApiService::new(apis, "Socialgraph API", env!("CARGO_PKG_VERSION"))
        .server(format!("http://{}/api", address));
    let ui = api_service.swagger_ui();

    let app = Route::new()
        .nest("/api", api_service)
        .nest("/swagger", ui);

    tracing::info!("Starting server on http://{}", address);
    tracing::info!("Swagger UI available at http://{}/swagger", address);

    Server::new(TcpListener::bind(address)).run(app).await
}
