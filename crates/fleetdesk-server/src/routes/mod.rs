// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! HTTP handlers, one module per resource.

use axum::{http::StatusCode, response::IntoResponse};

pub mod admin;
pub mod auth;
pub mod companies;
pub mod deliveries;
pub mod drivers;
pub mod health;
pub mod invites;

/// Fallback when no web bundle is configured.
pub async fn not_found() -> impl IntoResponse {
	(StatusCode::NOT_FOUND, "Not Found")
}
