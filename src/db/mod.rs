pub mod repository;

use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::clock::Clock;
use crate::error::AppError;
use crate::models::NewStudentRequest;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Opens a pool on `database_url` and brings the schema up to date.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, AppError> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if database_url.contains(":memory:") {
        // an in-memory database disappears with its last connection
        pool_options = pool_options
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    let pool = pool_options.connect_with(options).await?;
    MIGRATOR.run(&pool).await?;

    Ok(pool)
}

/// Inserts the sample roster when no students exist yet. Returns how many were added.
pub async fn seed_sample_students(db: &SqlitePool, clock: &dyn Clock) -> Result<usize, AppError> {
    if repository::count_students(db).await? > 0 {
        return Ok(0);
    }

    let samples = [
        ("John Doe", "001", "john@example.com"),
        ("Jane Smith", "002", "jane@example.com"),
        ("Bob Johnson", "003", "bob@example.com"),
    ];

    let mut tx = db.begin().await?;
    for (name, roll_number, email) in samples {
        let req = NewStudentRequest {
            name: name.to_string(),
            roll_number: roll_number.to_string(),
            email: email.to_string(),
        };
        repository::insert_student(&mut *tx, &req, clock.now_utc()).await?;
    }
    tx.commit().await?;

    info!("Sample students added to database: {}", samples.len());
    Ok(samples.len())
}
