use std::env;
use std::sync::Arc;

use carebridge::store::{DocumentStore, MemoryStore, SqlStore};
use carebridge::{create_app, db};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenv();

    let store: Arc<dyn DocumentStore> =
        if env::var("DATABASE_URL").is_ok() || env::var("DB_TYPE").is_ok() {
            let conn = db::connect().await?;
            Migrator::up(&conn, None).await?;
            Arc::new(SqlStore::new(conn))
        } else {
            warn!("DATABASE_URL not set; using in-memory store");
            Arc::new(MemoryStore::new())
        };

    // Run our server
    let app = create_app(store);
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Server running on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
