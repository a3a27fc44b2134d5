use std::env;
use std::sync::Arc;
use std::time::Duration;

use carebridge::db;
use carebridge::jobs::sync_success_stories;
use carebridge::store::{DocumentStore, MemoryStore, SqlStore};
use dotenvy::dotenv;
use migration::{Migrator, MigratorTrait};
use tokio::time::interval;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() {
    // Initialise tracing (INFO level)
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenv();

    // Command-line flags
    let args: Vec<String> = env::args().collect();
    let run_once = args.iter().any(|a| a == "--sync-once");

    let store: Arc<dyn DocumentStore> =
        if env::var("DATABASE_URL").is_ok() || env::var("DB_TYPE").is_ok() {
            match db::connect().await {
                Ok(conn) => {
                    if let Err(e) = Migrator::up(&conn, None).await {
                        error!(?e, "failed to run migrations");
                    }
                    Arc::new(SqlStore::new(conn))
                }
                Err(e) => {
                    error!(?e, "failed to connect to database; using in-memory store");
                    Arc::new(MemoryStore::new())
                }
            }
        } else {
            warn!("DATABASE_URL not set; using in-memory store");
            Arc::new(MemoryStore::new())
        };

    // Run the sync once if the flag is set
    if run_once {
        if let Err(e) = sync_success_stories(store.as_ref()).await {
            error!(?e, "success story sync failed");
        }
        return;
    }

    let minutes: u64 = env::var("SYNC_INTERVAL_MINUTES")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(15);
    info!("Worker starting; syncing success stories every {} minutes", minutes);

    let mut ticker = interval(Duration::from_secs(minutes * 60));
    loop {
        ticker.tick().await;
        info!("Running success story sync...");
        match sync_success_stories(store.as_ref()).await {
            Ok(report) => info!(
                created = report.created,
                updated = report.updated,
                skipped = report.skipped,
                "sync finished"
            ),
            Err(e) => error!(?e, "success story sync failed"),
        }
    }
}
