//! API Module
//!
//! HTTP handlers and routing for the cache server REST API.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `POST /clear` - Clear both cache tiers
//! - `GET /stats` - Get cache statistics
//! - `GET /health` - Health check endpoint
//! - `GET /circuits` - All circuit statuses
//! - `GET /circuits/:name` - One circuit's status
//! - `POST /circuits/:name/failure` - Record a failure
//! - `POST /circuits/:name/success` - Record a success
//! - `POST /circuits/:name/reset` - Reset a circuit

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
