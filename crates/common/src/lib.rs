use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
pub use sqlx::Error as DbError;
pub use sqlx::SqlitePool as Pool;

pub mod articles;
pub mod categories;
pub mod model;
pub mod networks;
pub mod notifications;
pub mod observability;
pub mod stats;

/// Build the SQLite connection pool and bring the schema up to date
pub async fn init_database_connection() -> Pool {
    let connection_spec =
        std::env::var("DATABASE_URL").expect("DATABASE_URL env variable should be set");

    let options = SqliteConnectOptions::from_str(&connection_spec)
        .expect("DATABASE_URL should be a valid sqlite connection string")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Could not connect to the database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Could not run database migrations");

    pool
}
