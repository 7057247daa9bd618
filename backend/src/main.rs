use std::net::SocketAddr;

use axum::{
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, Level};

mod db;
mod domain;
mod rest;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    info!("Setting up database");
    let db = db::DbConnection::init().await?;

    // Set up our application state
    let state = rest::AppState::new(
        domain::UserService::new(db.clone()),
        domain::MoodService::new(db),
    );

    // CORS setup to allow the dev frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin("http://localhost:8080".parse::<HeaderValue>()?)
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/auth/login", post(rest::login))
        .route("/user", put(rest::update_user))
        .route("/moods", get(rest::list_moods).post(rest::create_mood));

    let app = Router::new().nest("/api", api_routes).layer(cors).with_state(state);

    // Start the server
    let port = std::env::var("MINDEASE_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5000);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
