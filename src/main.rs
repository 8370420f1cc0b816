mod auth;
mod db;
mod error;
mod extract;
mod message;
mod middleware;
mod routes;
mod state;
mod user;

#[cfg(test)]
mod test_support;

use db::{create_pool, run_migrations};
use message::{MessageRepository, MessageService};
use routes::create_router;
use state::{AppState, Config};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use user::UserRepository;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,listing_messages=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    tracing::info!("Connecting to database at {}...", config.redacted_database_url());
    let db = create_pool(&config).await?;

    tracing::info!("Running migrations...");
    run_migrations(&db).await?;

    let message_repository = Arc::new(MessageRepository::new(db.clone()));
    let user_repository = Arc::new(UserRepository::new(db));
    let message_service = MessageService::new(message_repository, user_repository);

    let state = AppState {
        config: config.clone(),
        message_service,
    };

    let app = create_router(state);

    let addr = config.addr();
    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
