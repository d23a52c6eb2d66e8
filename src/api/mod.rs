//! HTTP handlers for the development backend

pub mod books;
pub mod health;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::{AppError, AppResult},
    ServerState,
};

/// Build the router serving `/{resource}` and `/{resource}/:id`
pub fn create_router(state: ServerState, resource: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let collection = format!("/{}", resource.trim_matches('/'));
    let record = format!("{}/:id", collection);

    Router::new()
        .route("/health", get(health::health_check))
        .route(&collection, get(books::list_books).post(books::create_book))
        .route(
            &record,
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Bind `host:port` and serve until the listener fails
pub async fn serve(state: ServerState) -> AppResult<()> {
    let addr = SocketAddr::new(
        state
            .config
            .server
            .host
            .parse()
            .map_err(|e| AppError::BadRequest(format!("Invalid host address: {}", e)))?,
        state.config.server.port,
    );
    let listener = TcpListener::bind(addr).await?;
    serve_on(listener, state).await
}

/// Serve on an already bound listener
pub async fn serve_on(listener: TcpListener, state: ServerState) -> AppResult<()> {
    let resource = state.config.backend.resource.clone();
    let app = create_router(state, &resource);

    tracing::info!(
        "Serving /{} on http://{}",
        resource,
        listener.local_addr()?
    );
    axum::serve(listener, app).await?;
    Ok(())
}
