//! Web UI Module
//!
//! Server-rendered HTML interface: dashboard, user CRUD, and drama CRUD.

mod routes;
pub mod templates;

use std::sync::Arc;

use axum::Router;

use crate::state::AppState;

/// Create the web UI router.
/// Mount this with `.with_state(state)` in main.rs
pub fn router() -> Router<Arc<AppState>> {
    routes::create_router()
}
