use axum::http::StatusCode;
use axum::routing::get;
use axum::{Router, middleware};
use log::info;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use huddle_messenger::state::AppState;
use huddle_messenger::{integration, message, thread, user};

#[tokio::main]
async fn main() {
    let config = integration::Config::default();
    let state = AppState::init(&config).await;

    let api = Router::new()
        .merge(message::api(state.clone()))
        .merge(thread::api(state.clone()))
        .layer(middleware::from_fn(user::middleware::identify));

    let app = Router::new()
        .route("/health", get(health))
        .nest("/api", api)
        .layer(
            CorsLayer::new()
                .allow_origin(config.env.allow_origin())
                .allow_methods(config.env.allow_methods())
                .allow_headers(config.env.allow_headers()),
        )
        .layer(TraceLayer::new_for_http());

    let addr = config.env.addr();
    info!("listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server failed");
}

async fn health() -> StatusCode {
    StatusCode::OK
}
