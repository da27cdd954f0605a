/*****************************************************************************************
 *
 *  Foods Store – durable CRUD service for food records
 *  ----------------------------------------------------
 *
 *  Records live in a JSON snapshot that is rewritten on every change.
 *
 *****************************************************************************************/

use tokio::net::TcpListener;
use axum::serve;

use tracing_subscriber::FmtSubscriber;

use foods_store::config::AppConfig;
use foods_store::errors::StartupError;
use foods_store::{build_app, FoodService, FoodStore};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        // The subscriber may not be installed yet.
        eprintln!("foods-store failed to start: {e}");
        tracing::error!("foods-store stopped: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    //
    // ────────────────────────────────────────────────────────
    //  Locate and load config.json
    // ────────────────────────────────────────────────────────
    //
    let config_path = AppConfig::locate()?;
    let cfg = AppConfig::load_from_file(&config_path)?;

    //
    // ────────────────────────────────────────────────────────
    //  Configure logging
    // ────────────────────────────────────────────────────────
    //
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cfg.level_filter())
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Starting foods-store…");
    tracing::info!("Loaded config.json from {}", config_path.display());
    tracing::info!("Loaded configuration: {:?}", cfg);

    //
    // ────────────────────────────────────────────────────────
    //  Open the food store (loads the snapshot)
    // ────────────────────────────────────────────────────────
    //
    let store = FoodStore::open(&cfg.data_path)?;
    let service = FoodService::new(store);

    //
    // ────────────────────────────────────────────────────────
    //  Build Axum app (foods + system routes)
    // ────────────────────────────────────────────────────────
    //
    let app = build_app(service, cfg.server_version.clone());

    //
    // ────────────────────────────────────────────────────────
    //  Bind server and start listening
    // ────────────────────────────────────────────────────────
    //
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    tracing::info!("Listening on http://{}", addr);

    serve(listener, app)
        .with_graceful_shutdown(shutdown())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Goodbye.");
    Ok(())
}

//
// ─────────────────────────────────────────────────────────────
//  Graceful shutdown handler
// ─────────────────────────────────────────────────────────────
//
// Every write is already on disk, so there is nothing to flush here.
async fn shutdown() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }

    tracing::warn!("CTRL+C received — shutting down…");
}
