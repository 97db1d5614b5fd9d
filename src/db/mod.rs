//! Database module for SQLite persistence using SeaORM

pub mod entities;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

/// Connect to the database and create tables. Called once at bootstrap.
pub async fn init_database(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    tracing::info!("Connecting to database: {}", db_url);

    let db = Database::connect(db_url).await?;
    create_tables(&db).await?;

    Ok(db)
}

/// Create all tables if they don't exist
pub(crate) async fn create_tables(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            nickname TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL
        )
        "#
        .to_string(),
    ))
    .await?;

    // user_id is nullable on purpose: deleting a user orphans their dramas
    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"
        CREATE TABLE IF NOT EXISTS dramas (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            intensity INTEGER NOT NULL DEFAULT 0,
            user_id INTEGER,
            created_at INTEGER NOT NULL,
            FOREIGN KEY (user_id) REFERENCES users(id)
        )
        "#
        .to_string(),
    ))
    .await?;

    db.execute(Statement::from_string(
        db.get_database_backend(),
        r#"CREATE INDEX IF NOT EXISTS idx_dramas_user ON dramas(user_id)"#.to_string(),
    ))
    .await?;

    tracing::info!("Database tables initialized");
    Ok(())
}

/// In-memory database for tests. Capped at one connection because every
/// pooled `sqlite::memory:` connection gets its own empty database.
#[cfg(test)]
pub(crate) async fn test_database() -> DatabaseConnection {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options)
        .await
        .expect("in-memory database");
    create_tables(&db).await.expect("create tables");
    db
}
