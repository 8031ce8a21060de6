use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::database::MongoDB;
use crate::models::StorageMetrics;
use crate::services::points_ledger;
use crate::utils::error::AppError;

static REQUEST_COUNT: AtomicU64 = AtomicU64::new(0);
static ERROR_COUNT: AtomicU64 = AtomicU64::new(0);

pub fn increment_request_count() {
    REQUEST_COUNT.fetch_add(1, Ordering::Relaxed);
}

pub fn increment_error_count() {
    ERROR_COUNT.fetch_add(1, Ordering::Relaxed);
}

#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct MetricsResponse {
    pub http_requests_total: u64,
    pub http_errors_total: u64,
    pub points_ledger_mentor_misses_total: u64,
    pub points_ledger_failures_total: u64,
}

impl MetricsResponse {
    pub(crate) fn snapshot() -> Self {
        Self {
            http_requests_total: REQUEST_COUNT.load(Ordering::Relaxed),
            http_errors_total: ERROR_COUNT.load(Ordering::Relaxed),
            points_ledger_mentor_misses_total: points_ledger::mentor_miss_count(),
            points_ledger_failures_total: points_ledger::failure_count(),
        }
    }

    fn to_prometheus(&self) -> String {
        format!(
            "# HELP http_requests_total Total number of HTTP requests\n\
             # TYPE http_requests_total counter\n\
             http_requests_total {}\n\
             \n\
             # HELP http_errors_total Total number of HTTP errors\n\
             # TYPE http_errors_total counter\n\
             http_errors_total {}\n\
             \n\
             # HELP points_ledger_mentor_misses_total Points updates whose mentor account was not found\n\
             # TYPE points_ledger_mentor_misses_total counter\n\
             points_ledger_mentor_misses_total {}\n\
             \n\
             # HELP points_ledger_failures_total Points updates that failed at the store\n\
             # TYPE points_ledger_failures_total counter\n\
             points_ledger_failures_total {}\n",
            self.http_requests_total,
            self.http_errors_total,
            self.points_ledger_mentor_misses_total,
            self.points_ledger_failures_total
        )
    }
}

#[utoipa::path(
    get,
    path = "/metrics",
    tag = "Health",
    responses(
        (status = 200, description = "Service metrics in Prometheus text format")
    )
)]
pub async fn get_metrics() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(MetricsResponse::snapshot().to_prometheus())
}

#[utoipa::path(
    get,
    path = "/metrics/storage",
    tag = "Health",
    responses(
        (status = 200, description = "Database and image storage usage", body = StorageMetrics),
        (status = 500, description = "Failed to fetch storage metrics")
    )
)]
pub async fn get_storage_metrics(db: web::Data<MongoDB>) -> Result<HttpResponse, AppError> {
    let metrics = db.storage_metrics().await.map_err(|e| {
        log::error!("❌ Storage metrics failed: {}", e);
        AppError::Internal("Failed to fetch storage metrics".to_string())
    })?;
    Ok(HttpResponse::Ok().json(metrics))
}
