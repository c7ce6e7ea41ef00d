// src/routes.rs
use std::convert::Infallible;
use std::sync::Arc;
use log::info;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::error::ApiError;
use crate::handlers::snapshot::{get_snapshot, get_snapshot_display};
use crate::services::refresh::SnapshotService;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (code, message) = if err.is_not_found() {
        (StatusCode::NOT_FOUND, "Not Found".to_string())
    } else if let Some(api_error) = err.find::<ApiError>() {
        (api_error.status, api_error.message.clone())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
    };

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(service: Arc<SnapshotService>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let service_filter = warp::any().map(move || service.clone());

    let health_route = warp::path!("api" / "v1" / "health")
        .and(warp::get())
        .map(|| warp::reply::json(&serde_json::json!({ "status": "ok" })));

    let snapshot_route = warp::path!("api" / "v1" / "snapshot")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_snapshot);

    let display_route = warp::path!("api" / "v1" / "snapshot" / "display")
        .and(warp::get())
        .and(service_filter.clone())
        .and_then(get_snapshot_display);

    info!("All routes configured successfully.");

    health_route
        .or(snapshot_route)
        .or(display_route)
        .recover(handle_rejection)
}
