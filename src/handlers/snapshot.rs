// src/handlers/snapshot.rs
use chrono::Local;
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::models::KpiDisplay;
use crate::services::calculations::indent_value;
use crate::services::refresh::SnapshotService;
use super::error::ApiError;

pub async fn get_snapshot(service: Arc<SnapshotService>) -> Result<Json, Rejection> {
    info!("Handling request to get KPI snapshot");

    let snapshot = service.current().await.map_err(|e| {
        error!("Failed to build KPI snapshot: {}", e);
        warp::reject::custom(ApiError::from(&e))
    })?;

    Ok(warp::reply::json(&*snapshot))
}

pub async fn get_snapshot_display(service: Arc<SnapshotService>) -> Result<Json, Rejection> {
    info!("Handling request to get KPI display values");

    let snapshot = service.current().await.map_err(|e| {
        error!("Failed to build KPI snapshot: {}", e);
        warp::reject::custom(ApiError::from(&e))
    })?;

    let indent = indent_value(Local::now().date_naive(), service.config().daily_target);
    Ok(warp::reply::json(&KpiDisplay::from_snapshot(&snapshot, indent)))
}
