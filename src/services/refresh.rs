// src/services/refresh.rs
use chrono::{DateTime, Duration, Utc};
use log::{debug, error, info, warn};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::config::DashboardConfig;
use crate::models::KpiSnapshot;
use super::pipeline::{build_snapshot, PipelineError};
use super::source::RowSource;

#[derive(Debug, Error)]
pub enum RefreshError {
    #[error("failed to read the Dashboard sheet: {0:#}")]
    Fetch(anyhow::Error),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

#[derive(Debug, Clone)]
struct CachedSnapshot {
    snapshot: Arc<KpiSnapshot>,
    built_at: DateTime<Utc>,
}

/// Fetches rows, runs the pipeline, and keeps the last good snapshot.
pub struct SnapshotService {
    source: Arc<dyn RowSource>,
    config: DashboardConfig,
    cache: RwLock<Option<CachedSnapshot>>,
}

impl SnapshotService {
    pub fn new(source: Arc<dyn RowSource>, config: DashboardConfig) -> Self {
        SnapshotService {
            source,
            config,
            cache: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// One full refresh cycle, bypassing the cache.
    pub async fn fetch_snapshot(&self) -> Result<KpiSnapshot, RefreshError> {
        let primary = self
            .source
            .read_rows(&self.config.dashboard_sheet, Some(&self.config.dashboard_range))
            .await
            .map_err(RefreshError::Fetch)?;

        let secondary = match self.source.read_rows(&self.config.sales_report_sheet, None).await {
            Ok(rows) => Some(rows),
            Err(e) => {
                warn!("Sales Report unavailable, trends will use Dashboard data: {:#}", e);
                None
            }
        };

        let snapshot = build_snapshot(
            &primary,
            secondary.as_deref(),
            &self.config.labels,
            self.config.target_sale,
        )?;
        Ok(snapshot)
    }

    // A refresh interval too large for chrono means the cache never goes stale.
    fn is_fresh(&self, built_at: DateTime<Utc>) -> bool {
        let cutoff = i64::try_from(self.config.refresh_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .and_then(|max_age| Utc::now().checked_sub_signed(max_age));
        match cutoff {
            Some(cutoff) => built_at > cutoff,
            None => true,
        }
    }

    /// The cached snapshot, refreshed first when older than `refresh_secs`.
    ///
    /// A failed refresh falls back to the previous snapshot if there is one.
    pub async fn current(&self) -> Result<Arc<KpiSnapshot>, RefreshError> {
        let cached = self.cache.read().await.clone();

        if let Some(cached) = &cached {
            if self.is_fresh(cached.built_at) {
                debug!("Serving cached snapshot built at {}", cached.built_at);
                return Ok(cached.snapshot.clone());
            }
        }

        info!("Snapshot cache stale or empty, refreshing");
        match self.fetch_snapshot().await {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                *self.cache.write().await = Some(CachedSnapshot {
                    snapshot: snapshot.clone(),
                    built_at: Utc::now(),
                });
                Ok(snapshot)
            }
            Err(e) => match cached {
                Some(previous) => {
                    error!("Refresh failed, serving snapshot from {}: {}", previous.built_at, e);
                    Ok(previous.snapshot)
                }
                None => {
                    error!("Refresh failed with no previous snapshot: {}", e);
                    Err(e)
                }
            },
        }
    }
}
