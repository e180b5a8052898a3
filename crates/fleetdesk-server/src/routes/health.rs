// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health check handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tokio::time::Instant;

pub use fleetdesk_server_api::health::{DatabaseHealth, HealthResponse, HealthStatus};

use crate::{api::AppState, version::VERSION};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System is healthy", body = HealthResponse),
        (status = 503, description = "System is unhealthy", body = HealthResponse)
    ),
    tag = "health"
)]
/// GET /health - Database connectivity check.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
	let start = Instant::now();
	let result = fleetdesk_server_db::ping(&state.pool).await;
	let latency_ms = start.elapsed().as_millis() as u64;

	let database = match result {
		Ok(()) => DatabaseHealth {
			status: HealthStatus::Healthy,
			latency_ms,
			error: None,
		},
		Err(e) => {
			tracing::warn!(error = %e, "database health check failed");
			DatabaseHealth {
				status: HealthStatus::Unhealthy,
				latency_ms,
				error: Some("database unreachable".to_string()),
			}
		}
	};

	let status = database.status;
	let code = match status {
		HealthStatus::Healthy => StatusCode::OK,
		HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
	};

	(
		code,
		Json(HealthResponse {
			status,
			version: VERSION.to_string(),
			database,
		}),
	)
}
