// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Driver invitation HTTP handlers.

use axum::{
	extract::{Path, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use chrono::Utc;
use fleetdesk_server_auth::CompanyId;

pub use fleetdesk_server_api::invites::{CreateInviteResponse, InviteErrorResponse};

use crate::{
	api::AppState,
	api_response::{access_denied, bad_request, internal_error, not_found},
	auth_middleware::RequireAuth,
	routes::companies::COMPANY_MANAGERS,
};

#[utoipa::path(
    post,
    path = "/api/companies/{id}/invites",
    params(("id" = String, Path, description = "Company id")),
    responses(
        (status = 201, description = "Signed single-use invitation code", body = CreateInviteResponse),
        (status = 401, description = "Not authenticated", body = InviteErrorResponse),
        (status = 403, description = "Not allowed to invite drivers here", body = InviteErrorResponse),
        (status = 404, description = "Company missing or inactive", body = InviteErrorResponse)
    ),
    tag = "invites"
)]
/// POST /api/companies/{id}/invites - Issue a driver invitation code.
#[tracing::instrument(skip(state), fields(user_id = %current_user.identity.user_id, company_id = %id))]
pub async fn create_invite(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	if let Err(e) = current_user
		.require_tenant(&company_id)
		.and_then(|_| current_user.require_role(COMPANY_MANAGERS))
	{
		return access_denied::<InviteErrorResponse>(&e).into_response();
	}

	match state.company_repo.get_company(&company_id).await {
		Ok(Some(company)) if company.is_active => {}
		Ok(_) => {
			return not_found::<InviteErrorResponse>("Company not found or inactive").into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to load company");
			return internal_error::<InviteErrorResponse>("Failed to create invitation")
				.into_response();
		}
	}

	match state
		.invite_signer
		.issue(&company_id, state.invite_ttl, Utc::now())
	{
		Ok(invite) => {
			tracing::info!(expires_at = %invite.claims.expires_at, "invitation issued");
			(
				StatusCode::CREATED,
				Json(CreateInviteResponse {
					code: invite.code,
					expires_at: invite.claims.expires_at,
				}),
			)
				.into_response()
		}
		Err(e) => {
			tracing::warn!(error = %e, "company id cannot be encoded in an invitation");
			bad_request::<InviteErrorResponse>("invalid_company", "Company cannot issue invitations")
				.into_response()
		}
	}
}
