mod handlers;
mod twilio;
mod types;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tower_http::cors::CorsLayer;

use handlers::AppState;
use twilio::{TwilioClient, TwilioConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::init_timed();

    let config = TwilioConfig::from_env();
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5001);

    if !config.is_complete() {
        log::warn!("Twilio credentials incomplete; sends will fail until they are set");
    }

    let state = Arc::new(AppState {
        twilio: TwilioClient::new(config),
    });

    let app = Router::new()
        .route("/twilio-send", post(handlers::send_sms))
        .route("/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr = format!("0.0.0.0:{}", port);
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
