use sea_orm::{Database, DatabaseConnection, DbErr};
use std::env;
use tracing::info;

pub async fn connect() -> Result<DatabaseConnection, DbErr> {
    let db_type = env::var("DB_TYPE").unwrap_or_else(|_| "sqlite".to_string());

    let db_url = match db_type.as_str() {
        "postgres" => {
            env::var("DATABASE_URL").expect("DATABASE_URL must be set for Postgres")
        }
        _ => {
            // Default to SQLite for development
            env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:./carebridge.sqlite?mode=rwc".to_string())
        }
    };

    info!("connecting to {} database", db_type);

    Database::connect(&db_url).await
}
