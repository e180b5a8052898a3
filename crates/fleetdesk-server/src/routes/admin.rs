// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Admin HTTP handlers.
//!
//! # Security
//!
//! Every endpoint here is mounted under `/api/admin` behind
//! [`RequireRole::admin`](crate::abac_middleware::RequireRole::admin), so
//! handlers can assume the caller is a platform admin.
//!
//! | Endpoint                 | Purpose                                   |
//! |--------------------------|-------------------------------------------|
//! | `list_companies`         | paginated, filterable tenant list         |
//! | `get_company_detail`     | one tenant with owner, drivers and work   |
//! | `toggle_company_status`  | activate or deactivate a tenant           |
//! | `platform_stats`         | platform-wide totals                      |

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use fleetdesk_server_auth::CompanyId;
use fleetdesk_server_db::{CompanyFilter, DeliveryFilter};

pub use fleetdesk_server_api::admin::{
	AdminCompanyDetailResponse, AdminCompanySummary, AdminErrorResponse, ListCompaniesParams,
	ListCompaniesResponse, PlatformStatsResponse, ToggleStatusResponse,
};
use fleetdesk_server_api::{
	status_counts, CompanyResponse, DeliveryResponse, DriverResponse, ProfileResponse,
	RouteResponse,
};

use crate::{
	api::AppState,
	api_response::{internal_error, not_found},
	auth_middleware::RequireAuth,
	pagination::PageRequest,
	routes::companies::non_blank,
};

/// Deliveries shown on the company detail page.
pub const RECENT_DELIVERIES_LIMIT: i64 = 10;

#[utoipa::path(
    get,
    path = "/api/admin/companies",
    params(ListCompaniesParams),
    responses(
        (status = 200, description = "Companies with headline counts", body = ListCompaniesResponse),
        (status = 401, description = "Not authenticated", body = AdminErrorResponse),
        (status = 403, description = "Not an admin", body = AdminErrorResponse)
    ),
    tag = "admin"
)]
/// GET /api/admin/companies - Newest companies first.
#[tracing::instrument(
	skip(state, params),
	fields(
		actor_id = %current_user.identity.user_id,
		search = ?params.search,
		status = ?params.status,
		plan = ?params.plan
	)
)]
pub async fn list_companies(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Query(params): Query<ListCompaniesParams>,
) -> impl IntoResponse {
	let page = PageRequest::from_params(params.page, params.page_size);
	let filter = CompanyFilter {
		search: non_blank(params.search.clone()),
		is_active: params.is_active(),
		plan: params.plan,
		limit: page.page_size,
		offset: page.offset(),
	};

	let (companies, total) = match state.company_repo.list_companies(&filter).await {
		Ok(result) => result,
		Err(e) => {
			tracing::error!(error = %e, "failed to list companies");
			return internal_error::<AdminErrorResponse>("Failed to list companies").into_response();
		}
	};

	tracing::debug!(returned = companies.len(), total, "admin listed companies");

	(
		StatusCode::OK,
		Json(ListCompaniesResponse {
			companies: companies
				.into_iter()
				.map(AdminCompanySummary::from)
				.collect(),
			pagination: page.response(total),
		}),
	)
		.into_response()
}

#[utoipa::path(
    get,
    path = "/api/admin/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company detail", body = AdminCompanyDetailResponse),
        (status = 401, description = "Not authenticated", body = AdminErrorResponse),
        (status = 403, description = "Not an admin", body = AdminErrorResponse),
        (status = 404, description = "Company not found", body = AdminErrorResponse)
    ),
    tag = "admin"
)]
/// GET /api/admin/companies/{id} - Company with owner, drivers, deliveries and active routes.
#[tracing::instrument(skip(state), fields(actor_id = %current_user.identity.user_id, company_id = %id))]
pub async fn get_company_detail(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);

	let company = match state.company_repo.get_company(&company_id).await {
		Ok(Some(company)) => company,
		Ok(None) => return not_found::<AdminErrorResponse>("Company not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to load company");
			return internal_error::<AdminErrorResponse>("Failed to load company").into_response();
		}
	};

	let owner_id = company_id.owner_id();
	let recent_filter = DeliveryFilter {
		limit: Some(RECENT_DELIVERIES_LIMIT),
		..Default::default()
	};

	let result = tokio::try_join!(
		state.profile_repo.get_profile(&owner_id),
		state.driver_repo.list_company_drivers(&company_id),
		state.delivery_repo.count_by_status(Some(&company_id)),
		state
			.delivery_repo
			.list_company_deliveries(&company_id, &recent_filter),
		state.route_repo.list_company_routes(&company_id, true),
	);

	let (owner, drivers, by_status, recent, routes) = match result {
		Ok(parts) => parts,
		Err(e) => {
			tracing::error!(error = %e, "failed to load company detail");
			return internal_error::<AdminErrorResponse>("Failed to load company").into_response();
		}
	};

	(
		StatusCode::OK,
		Json(AdminCompanyDetailResponse {
			company: CompanyResponse::from(company),
			owner: owner.as_ref().map(ProfileResponse::from),
			drivers: drivers.into_iter().map(DriverResponse::from).collect(),
			deliveries_by_status: status_counts(by_status),
			recent_deliveries: recent.into_iter().map(DeliveryResponse::from).collect(),
			active_routes: routes.into_iter().map(RouteResponse::from).collect(),
		}),
	)
		.into_response()
}

#[utoipa::path(
    post,
    path = "/api/admin/companies/{id}/toggle-status",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "New activation state", body = ToggleStatusResponse),
        (status = 401, description = "Not authenticated", body = AdminErrorResponse),
        (status = 403, description = "Not an admin", body = AdminErrorResponse),
        (status = 404, description = "Company not found", body = AdminErrorResponse)
    ),
    tag = "admin"
)]
/// POST /api/admin/companies/{id}/toggle-status - Flip a company between active and inactive.
#[tracing::instrument(skip(state), fields(actor_id = %current_user.identity.user_id, company_id = %id))]
pub async fn toggle_company_status(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);

	match state.company_repo.toggle_active(&company_id).await {
		Ok(Some(is_active)) => {
			tracing::info!(is_active, "admin toggled company status");
			let message = if is_active {
				"Company activated"
			} else {
				"Company deactivated"
			};
			(
				StatusCode::OK,
				Json(ToggleStatusResponse {
					success: true,
					is_active,
					message: message.to_string(),
				}),
			)
				.into_response()
		}
		Ok(None) => not_found::<AdminErrorResponse>("Company not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to toggle company status");
			internal_error::<AdminErrorResponse>("Failed to update company").into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/admin/stats",
    responses(
        (status = 200, description = "Platform-wide figures", body = PlatformStatsResponse),
        (status = 401, description = "Not authenticated", body = AdminErrorResponse),
        (status = 403, description = "Not an admin", body = AdminErrorResponse)
    ),
    tag = "admin"
)]
/// GET /api/admin/stats - Totals, recent activity and deliveries by status.
#[tracing::instrument(skip(state), fields(actor_id = %current_user.identity.user_id))]
pub async fn platform_stats(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
) -> impl IntoResponse {
	match state.stats_repo.platform_stats(Utc::now()).await {
		Ok(stats) => (StatusCode::OK, Json(PlatformStatsResponse::from(stats))).into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to compute platform stats");
			internal_error::<AdminErrorResponse>("Failed to load statistics").into_response()
		}
	}
}
