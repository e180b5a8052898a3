// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OpenAPI document for the FleetDesk HTTP API.

use axum::Json;
use utoipa::OpenApi;

use crate::routes;

#[derive(OpenApi)]
#[openapi(
	info(
		title = "FleetDesk API",
		description = "Multi-tenant delivery logistics: companies, drivers, deliveries and routes"
	),
	paths(
		routes::health::health_check,
		routes::auth::me,
		routes::auth::logout,
		routes::companies::setup_company,
		routes::companies::get_company,
		routes::companies::update_company,
		routes::companies::list_routes,
		routes::companies::list_notifications,
		routes::drivers::list_drivers,
		routes::drivers::validate_code,
		routes::drivers::join_company,
		routes::deliveries::list_deliveries,
		routes::deliveries::create_delivery,
		routes::deliveries::update_delivery_status,
		routes::invites::create_invite,
		routes::admin::list_companies,
		routes::admin::get_company_detail,
		routes::admin::toggle_company_status,
		routes::admin::platform_stats,
	),
	tags(
		(name = "health", description = "Liveness and database checks"),
		(name = "auth", description = "Current session"),
		(name = "companies", description = "Tenant records"),
		(name = "drivers", description = "Drivers and invitations"),
		(name = "deliveries", description = "Delivery lifecycle"),
		(name = "invites", description = "Driver invitation codes"),
		(name = "admin", description = "Platform administration")
	)
)]
pub struct ApiDoc;

/// GET /api/openapi.json
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
	Json(ApiDoc::openapi())
}
