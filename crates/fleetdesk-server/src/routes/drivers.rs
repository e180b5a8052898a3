// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Driver HTTP handlers: listing, invitation checks and joining a company.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use fleetdesk_server_auth::{CompanyId, InviteError, Profile};
use fleetdesk_server_db::{Company, DriverJoin, JoinOutcome};

pub use fleetdesk_server_api::drivers::{
	DriverErrorResponse, DriverResponse, InviteCompany, JoinCompanyRequest, JoinCompanyResponse,
	ListDriversResponse, ValidateCodeRequest, ValidateCodeResponse,
};

use crate::{
	api::AppState,
	api_response::{access_denied, bad_request, conflict, internal_error, not_found},
	auth_middleware::RequireAuth,
	routes::companies::non_blank,
};

fn invite_error_message(err: &InviteError) -> &'static str {
	match err {
		InviteError::Expired => "Invitation code has expired",
		_ => "Invalid invitation code",
	}
}

fn invite_company(company: &Company) -> InviteCompany {
	InviteCompany {
		id: company.id.as_str().to_string(),
		name: company.name.clone(),
	}
}

#[utoipa::path(
    get,
    path = "/api/companies/{id}/drivers",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 200, description = "Drivers with their profile names", body = ListDriversResponse),
        (status = 401, description = "Not authenticated", body = DriverErrorResponse),
        (status = 403, description = "Not a member of this company", body = DriverErrorResponse)
    ),
    tag = "drivers"
)]
/// GET /api/companies/{id}/drivers - Drivers employed by a company.
#[tracing::instrument(skip(state), fields(user_id = %current_user.identity.user_id, company_id = %id))]
pub async fn list_drivers(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	if let Err(e) = current_user.require_tenant(&company_id) {
		return access_denied::<DriverErrorResponse>(&e).into_response();
	}

	match state.driver_repo.list_company_drivers(&company_id).await {
		Ok(drivers) => (
			StatusCode::OK,
			Json(ListDriversResponse {
				drivers: drivers.into_iter().map(DriverResponse::from).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list drivers");
			internal_error::<DriverErrorResponse>("Failed to list drivers").into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/api/drivers/validate-code",
    request_body = ValidateCodeRequest,
    responses(
        (status = 200, description = "Code is valid", body = ValidateCodeResponse),
        (status = 400, description = "Malformed, forged, expired or used code", body = ValidateCodeResponse),
        (status = 404, description = "Company missing or inactive", body = ValidateCodeResponse)
    ),
    tag = "drivers"
)]
/// POST /api/drivers/validate-code - Check an invitation before signing up.
///
/// Public, so a prospective driver can see which company invited them.
#[tracing::instrument(skip_all)]
pub async fn validate_code(
	State(state): State<AppState>,
	Json(payload): Json<ValidateCodeRequest>,
) -> impl IntoResponse {
	let claims = match state.invite_signer.verify(&payload.code, Utc::now()) {
		Ok(claims) => claims,
		Err(e) => {
			tracing::info!(reason = %e, "invitation code rejected");
			return (
				StatusCode::BAD_REQUEST,
				Json(ValidateCodeResponse::invalid(invite_error_message(&e))),
			)
				.into_response();
		}
	};

	match state.invite_repo.is_redeemed(&claims.nonce).await {
		Ok(false) => {}
		Ok(true) => {
			return (
				StatusCode::BAD_REQUEST,
				Json(ValidateCodeResponse::invalid(
					"Invitation code has already been used",
				)),
			)
				.into_response();
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to check invitation redemption");
			return internal_error::<DriverErrorResponse>("Failed to validate code").into_response();
		}
	}

	match state.company_repo.get_company(&claims.company_id).await {
		Ok(Some(company)) if company.is_active => (
			StatusCode::OK,
			Json(ValidateCodeResponse::valid(invite_company(&company))),
		)
			.into_response(),
		Ok(_) => (
			StatusCode::NOT_FOUND,
			Json(ValidateCodeResponse::invalid(
				"Company not found or inactive",
			)),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to load invited company");
			internal_error::<DriverErrorResponse>("Failed to validate code").into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/api/drivers/join",
    request_body = JoinCompanyRequest,
    responses(
        (status = 201, description = "Driver joined the company", body = JoinCompanyResponse),
        (status = 400, description = "Invalid code or missing name", body = DriverErrorResponse),
        (status = 401, description = "Not authenticated", body = DriverErrorResponse),
        (status = 404, description = "Company missing or inactive", body = DriverErrorResponse),
        (status = 409, description = "Already registered, code used, or driver limit reached", body = DriverErrorResponse)
    ),
    tag = "drivers"
)]
/// POST /api/drivers/join - Redeem an invitation and become a driver.
///
/// The tenant comes from the signed code, never from the request body.
#[tracing::instrument(skip(state, payload), fields(user_id = %current_user.identity.user_id))]
pub async fn join_company(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Json(payload): Json<JoinCompanyRequest>,
) -> impl IntoResponse {
	if let Some(existing) = &current_user.profile {
		tracing::info!(role = %existing.role, "join refused for existing profile");
		return conflict::<DriverErrorResponse>("profile_exists", "This account is already registered")
			.into_response();
	}

	let Some(full_name) = non_blank(Some(payload.full_name)) else {
		return bad_request::<DriverErrorResponse>("invalid_name", "Full name is required")
			.into_response();
	};

	let claims = match state.invite_signer.verify(&payload.code, Utc::now()) {
		Ok(claims) => claims,
		Err(e) => {
			tracing::info!(reason = %e, "invitation code rejected");
			return bad_request::<DriverErrorResponse>("invalid_code", invite_error_message(&e))
				.into_response();
		}
	};

	let company = match state.company_repo.get_company(&claims.company_id).await {
		Ok(Some(company)) if company.is_active => company,
		Ok(_) => {
			return not_found::<DriverErrorResponse>("Company not found or inactive").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to load invited company");
			return internal_error::<DriverErrorResponse>("Failed to join company").into_response();
		}
	};

	let identity = &current_user.identity;
	let mut profile = Profile::driver(
		identity.user_id.clone(),
		identity.email.clone(),
		claims.company_id.clone(),
	)
	.with_full_name(full_name);
	profile.phone = non_blank(payload.phone);

	let join = DriverJoin {
		profile,
		company_id: claims.company_id,
		nonce: claims.nonce,
		vehicle_type: payload.vehicle_type,
		license_plate: non_blank(payload.license_plate),
	};

	match state.driver_repo.join_company(&join).await {
		Ok(JoinOutcome::Joined(driver)) => {
			tracing::info!(company_id = %driver.company_id, "driver joined company");
			(
				StatusCode::CREATED,
				Json(JoinCompanyResponse {
					driver: DriverResponse::from(driver),
					company: invite_company(&company),
				}),
			)
				.into_response()
		}
		Ok(JoinOutcome::CompanyUnavailable) => {
			not_found::<DriverErrorResponse>("Company not found or inactive").into_response()
		}
		Ok(JoinOutcome::DriverLimitReached { max_drivers }) => conflict::<DriverErrorResponse>(
			"driver_limit_reached",
			format!("This company's plan allows {max_drivers} driver(s)"),
		)
		.into_response(),
		Ok(JoinOutcome::AlreadyRedeemed) => conflict::<DriverErrorResponse>(
			"code_redeemed",
			"Invitation code has already been used",
		)
		.into_response(),
		Ok(JoinOutcome::ProfileTaken) => {
			conflict::<DriverErrorResponse>("profile_exists", "This account is already registered")
				.into_response()
		}
		Err(e) if e.is_unique_violation() => {
			conflict::<DriverErrorResponse>("profile_exists", "This account is already registered")
				.into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to join company");
			internal_error::<DriverErrorResponse>("Failed to join company").into_response()
		}
	}
}
