// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Company HTTP handlers.
//!
//! Every handler that takes a company id runs the tenant check before it looks
//! the company up, so callers cannot discover tenants they do not belong to.
//!
//! | Endpoint              | Required                               |
//! |-----------------------|----------------------------------------|
//! | `setup_company`       | signed in, no profile or company role  |
//! | `get_company`         | tenant member or admin                 |
//! | `update_company`      | owning company or admin                |
//! | `list_routes`         | tenant member or admin                 |
//! | `list_notifications`  | tenant member or admin                 |

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use fleetdesk_server_auth::{CompanyId, Profile, Role};
use fleetdesk_server_db::{Company, CompanyUpdate, RegisterOutcome, DEFAULT_BUSINESS_TYPE};

pub use fleetdesk_server_api::companies::{
	CompanyErrorResponse, CompanyResponse, ListNotificationsResponse, ListRoutesResponse,
	NotificationResponse, RouteResponse, SetupCompanyRequest, UpdateCompanyRequest,
};

use crate::{
	api::AppState,
	api_response::{access_denied, bad_request, conflict, internal_error, not_found},
	auth_middleware::RequireAuth,
};

/// Roles allowed to change company records.
pub const COMPANY_MANAGERS: &[Role] = &[Role::Company, Role::Admin];

/// Trim a field and treat blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
	value
		.map(|v| v.trim().to_string())
		.filter(|v| !v.is_empty())
}

#[utoipa::path(
    post,
    path = "/api/companies/setup",
    request_body = SetupCompanyRequest,
    responses(
        (status = 200, description = "Company registered", body = CompanyResponse),
        (status = 400, description = "Missing company or contact name", body = CompanyErrorResponse),
        (status = 401, description = "Not authenticated", body = CompanyErrorResponse),
        (status = 409, description = "Caller already has a non-company profile", body = CompanyErrorResponse)
    ),
    tag = "companies"
)]
/// POST /api/companies/setup - Register the caller as a company owner.
///
/// The caller's own identity becomes both the profile and the company id.
/// Re-running setup refreshes the contact details and keeps the plan.
#[tracing::instrument(skip(state, payload), fields(user_id = %current_user.identity.user_id))]
pub async fn setup_company(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<SetupCompanyRequest>,
) -> impl IntoResponse {
	let Some(company_name) = non_blank(Some(payload.company_name)) else {
		return bad_request::<CompanyErrorResponse>("invalid_name", "Company name is required")
			.into_response();
	};
	let Some(full_name) = non_blank(Some(payload.full_name)) else {
		return bad_request::<CompanyErrorResponse>("invalid_name", "Full name is required")
			.into_response();
	};

	if let Some(existing) = &current_user.profile {
		if existing.role != Role::Company {
			tracing::info!(role = %existing.role, "setup refused for existing profile");
			return conflict::<CompanyErrorResponse>(
				"profile_exists",
				"This account is already registered",
			)
			.into_response();
		}
	}

	let identity = &current_user.identity;
	let phone = non_blank(payload.phone);

	let mut company = Company::new(&identity.user_id, company_name);
	company.business_type =
		non_blank(payload.business_type).unwrap_or_else(|| DEFAULT_BUSINESS_TYPE.to_string());
	company.phone = phone.clone();
	company.email = Some(identity.email.clone());

	let mut profile =
		Profile::company(identity.user_id.clone(), identity.email.clone()).with_full_name(full_name);
	profile.phone = phone;

	let company = match state.company_repo.register_company(&company, &profile).await {
		Ok(RegisterOutcome::Registered(company)) => company,
		Ok(RegisterOutcome::ProfileTaken) => {
			return conflict::<CompanyErrorResponse>(
				"profile_exists",
				"This account is already registered",
			)
			.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to register company");
			return internal_error::<CompanyErrorResponse>("Failed to register company")
				.into_response();
		}
	};

	tracing::info!(company_id = %company.id, "company registered");
	(StatusCode::OK, Json(CompanyResponse::from(company))).into_response()
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company", body = CompanyResponse),
        (status = 401, description = "Not authenticated", body = CompanyErrorResponse),
        (status = 403, description = "Not a member of this company", body = CompanyErrorResponse),
        (status = 404, description = "Company not found", body = CompanyErrorResponse)
    ),
    tag = "companies"
)]
/// GET /api/companies/{id} - Fetch a company.
#[tracing::instrument(skip(state), fields(user_id = %current_user.identity.user_id, company_id = %id))]
pub async fn get_company(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	if let Err(e) = current_user.require_tenant(&company_id) {
		return access_denied::<CompanyErrorResponse>(&e).into_response();
	}

	match state.company_repo.get_company(&company_id).await {
		Ok(Some(company)) => (StatusCode::OK, Json(CompanyResponse::from(company))).into_response(),
		Ok(None) => not_found::<CompanyErrorResponse>("Company not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to load company");
			internal_error::<CompanyErrorResponse>("Failed to load company").into_response()
		}
	}
}

#[utoipa::path(
    patch,
    path = "/api/companies/{id}",
    params(("id" = String, Path, description = "Company id")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Updated company", body = CompanyResponse),
        (status = 400, description = "Blank company name", body = CompanyErrorResponse),
        (status = 401, description = "Not authenticated", body = CompanyErrorResponse),
        (status = 403, description = "Not allowed to edit this company", body = CompanyErrorResponse),
        (status = 404, description = "Company not found", body = CompanyErrorResponse)
    ),
    tag = "companies"
)]
/// PATCH /api/companies/{id} - Edit company details. Drivers may not.
#[tracing::instrument(skip(state, payload), fields(user_id = %current_user.identity.user_id, company_id = %id))]
pub async fn update_company(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateCompanyRequest>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	if let Err(e) = current_user
		.require_tenant(&company_id)
		.and_then(|_| current_user.require_role(COMPANY_MANAGERS))
	{
		return access_denied::<CompanyErrorResponse>(&e).into_response();
	}

	let mut update = CompanyUpdate::from(payload);
	if let Some(name) = update.name.take() {
		let name = name.trim().to_string();
		if name.is_empty() {
			return bad_request::<CompanyErrorResponse>(
				"invalid_name",
				"Company name cannot be blank",
			)
			.into_response();
		}
		update.name = Some(name);
	}

	match state.company_repo.update_company(&company_id, &update).await {
		Ok(Some(company)) => {
			tracing::info!("company updated");
			(StatusCode::OK, Json(CompanyResponse::from(company))).into_response()
		}
		Ok(None) => not_found::<CompanyErrorResponse>("Company not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to update company");
			internal_error::<CompanyErrorResponse>("Failed to update company").into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}/routes",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Routes of the company", body = ListRoutesResponse),
        (status = 401, description = "Not authenticated", body = CompanyErrorResponse),
        (status = 403, description = "Not a member of this company", body = CompanyErrorResponse)
    ),
    tag = "companies"
)]
/// GET /api/companies/{id}/routes - All routes of a company.
#[tracing::instrument(skip(state), fields(user_id = %current_user.identity.user_id, company_id = %id))]
pub async fn list_routes(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	if let Err(e) = current_user.require_tenant(&company_id) {
		return access_denied::<CompanyErrorResponse>(&e).into_response();
	}

	match state.route_repo.list_company_routes(&company_id, false).await {
		Ok(routes) => (
			StatusCode::OK,
			Json(ListRoutesResponse {
				routes: routes.into_iter().map(RouteResponse::from).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list routes");
			internal_error::<CompanyErrorResponse>("Failed to list routes").into_response()
		}
	}
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}/notifications",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Most recent notifications", body = ListNotificationsResponse),
        (status = 401, description = "Not authenticated", body = CompanyErrorResponse),
        (status = 403, description = "Not a member of this company", body = CompanyErrorResponse)
    ),
    tag = "companies"
)]
/// GET /api/companies/{id}/notifications - Newest customer notifications first.
#[tracing::instrument(skip(state), fields(user_id = %current_user.identity.user_id, company_id = %id))]
pub async fn list_notifications(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	if let Err(e) = current_user.require_tenant(&company_id) {
		return access_denied::<CompanyErrorResponse>(&e).into_response();
	}

	match state
		.notification_repo
		.list_company_notifications(&company_id)
		.await
	{
		Ok(notifications) => (
			StatusCode::OK,
			Json(ListNotificationsResponse {
				notifications: notifications
					.into_iter()
					.map(NotificationResponse::from)
					.collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list notifications");
			internal_error::<CompanyErrorResponse>("Failed to list notifications").into_response()
		}
	}
}
