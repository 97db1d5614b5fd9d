use sea_orm::DatabaseConnection;

/// Shared application state, passed explicitly to every handler.
pub struct AppState {
    pub db: DatabaseConnection,
}
