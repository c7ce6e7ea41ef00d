use dotenv::dotenv;
use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use factory_kpi_dashboard::config::DashboardConfig;
use factory_kpi_dashboard::routes;
use factory_kpi_dashboard::row_source;
use factory_kpi_dashboard::services::refresh::SnapshotService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = DashboardConfig::from_env().map_err(|e| {
        error!("Invalid configuration: {:#}", e);
        e
    })?;
    let port = config.port;
    info!("Using PORT: {}", port);

    let source = row_source(&config)?;
    let service = Arc::new(SnapshotService::new(source, config));

    // Warm the cache so the first page load does not wait on the sheet.
    if let Err(e) = service.current().await {
        error!("Initial snapshot failed, will retry on request: {}", e);
    }

    let addr: SocketAddr = ([0, 0, 0, 0], port).into();

    let cors = warp::cors()
        .allow_any_origin()
        .allow_header("content-type")
        .allow_methods(vec!["GET"]);

    let api = routes::routes(service).with(cors);
    info!("Routes configured successfully with CORS.");

    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
