//! Axum router configuration
//!
//! ```text
//! /
//! ├── /api/items        - list, create, clear
//! ├── /api/items/{id}   - partial update, delete
//! ├── /api/ws           - live snapshot stream (WebSocket, receive-only)
//! └── /health           - liveness and counters
//! ```

use axum::routing::{get, patch};
use axum::Router;

use super::handlers::{create_item, delete_all_items, delete_item, health, list_items, update_item};
use super::socket::subscribe_socket;
use super::AppState;

/// Build the complete router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .route("/health", get(health))
        .with_state(state)
}

/// Item API routes
///
/// Routes:
/// - `GET    /api/items` - All items in insertion order
/// - `POST   /api/items` - Create an item
/// - `DELETE /api/items` - Delete every item
/// - `PATCH  /api/items/{id}` - Partially update an item
/// - `DELETE /api/items/{id}` - Delete an item
/// - `GET    /api/ws` - Subscribe to snapshots
fn api_router() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(list_items).post(create_item).delete(delete_all_items),
        )
        .route("/items/{id}", patch(update_item).delete(delete_item))
        .route("/ws", get(subscribe_socket))
}
