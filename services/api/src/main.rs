use std::sync::Arc;

use anyhow::Result;
use common::database::{DatabaseConfig, health_check, init_pool, run_migrations};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

use webud_api::{
    config::Settings,
    jwt::{JwtConfig, JwtService},
    llm::GeminiClient,
    password::Passwords,
    repositories::UserRepository,
    routes,
    state::AppState,
    templates::TemplateLibrary,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Webud API");

    let settings = Settings::from_env()?;

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    if health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    let jwt_service = JwtService::new(JwtConfig::from_settings(&settings))?;
    let gemini = GeminiClient::new(settings.google_api_key.clone(), settings.gemini_model.clone())?;
    info!("Using text generation model {}", gemini.model());

    let templates = TemplateLibrary::new(settings.templates_dir.clone());
    if !templates.dir().is_dir() {
        tracing::warn!(
            "Templates directory {} does not exist",
            templates.dir().display()
        );
    }

    let passwords = Passwords::default();
    passwords.check_decoy_blocking(String::new()).await?;

    let app_state = AppState {
        user_store: Arc::new(UserRepository::new(pool)),
        jwt_service,
        passwords,
        text_generator: Arc::new(gemini),
        templates,
        chat_chunk_delay: settings.chat_chunk_delay(),
    };

    let app = routes::create_router(app_state);

    let listener = TcpListener::bind(&settings.bind_address).await?;
    info!("Webud API listening on {}", settings.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Webud API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
