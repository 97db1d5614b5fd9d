//! Web UI route handlers.

mod drama_handlers;
mod home_handlers;
mod user_handlers;
mod utils;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the web UI router with all routes
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home_handlers::index))
        .route("/usuarios", get(user_handlers::users_list))
        .route(
            "/usuarios/novo",
            get(user_handlers::users_new_page).post(user_handlers::users_create),
        )
        .route(
            "/usuarios/:id/editar",
            get(user_handlers::users_edit_page).post(user_handlers::users_update),
        )
        .route("/usuarios/:id/excluir", post(user_handlers::users_delete))
        .route("/dramas", get(drama_handlers::dramas_list))
        .route(
            "/dramas/novo",
            get(drama_handlers::dramas_new_page).post(drama_handlers::dramas_create),
        )
        .route(
            "/dramas/:id/editar",
            get(drama_handlers::dramas_edit_page).post(drama_handlers::dramas_update),
        )
        .route("/dramas/:id/excluir", post(drama_handlers::dramas_delete))
}
