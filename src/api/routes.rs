//! API Routes
//!
//! Configures the Axum router with all cache server endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    circuit_failure_handler, circuit_reset_handler, circuit_status_handler,
    circuit_success_handler, circuits_handler, clear_handler, delete_handler, get_handler,
    health_handler, set_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a key-value pair
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Delete a key
/// - `POST /clear` - Clear both cache tiers
/// - `GET /stats` - Get cache statistics
/// - `GET /health` - Health check endpoint
/// - `GET /circuits` - All circuit statuses
/// - `GET /circuits/:name` - One circuit's status
/// - `POST /circuits/:name/failure` - Record a failure
/// - `POST /circuits/:name/success` - Record a success
/// - `POST /circuits/:name/reset` - Reset a circuit
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build router with all endpoints
    Router::new()
        .route("/set", put(set_handler))
        .route("/get/:key", get(get_handler))
        .route("/del/:key", delete(delete_handler))
        .route("/clear", post(clear_handler))
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .route("/circuits", get(circuits_handler))
        .route("/circuits/:name", get(circuit_status_handler))
        .route("/circuits/:name/failure", post(circuit_failure_handler))
        .route("/circuits/:name/success", post(circuit_success_handler))
        .route("/circuits/:name/reset", post(circuit_reset_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
