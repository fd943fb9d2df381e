use car_doctor_api::{config::AppConfig, create_router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Car Doctor API - Starting...");

    let config = AppConfig::from_env().expect("Invalid configuration");

    // Datastore and signing key are acquired once and shared by every request
    let state = AppState::from_config(&config)
        .await
        .expect("Failed to initialise datastore");

    let app = create_router(state, &config.server.cors_origins);

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Car Doctor API is running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}
