// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Session HTTP handlers.

use axum::{
	extract::State,
	http::{header::SET_COOKIE, HeaderMap, StatusCode},
	response::IntoResponse,
	Json,
};

pub use fleetdesk_server_api::auth::{AuthErrorResponse, LogoutResponse, MeResponse};

use crate::{api::AppState, auth_middleware::RequireAuth};

#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current identity and profile", body = MeResponse),
        (status = 401, description = "Not authenticated", body = AuthErrorResponse)
    ),
    tag = "auth"
)]
/// GET /api/me - The signed-in identity, its profile and its landing page.
#[tracing::instrument(skip_all, fields(user_id = %current_user.identity.user_id))]
pub async fn me(RequireAuth(current_user): RequireAuth) -> impl IntoResponse {
	Json(MeResponse::new(
		&current_user.identity,
		current_user.profile.as_ref(),
	))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Session ended and cookie cleared", body = LogoutResponse)
    ),
    tag = "auth"
)]
/// POST /api/auth/logout - End the presented session.
///
/// Always succeeds: an unknown or missing token still gets its cookie cleared.
#[tracing::instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
	if let Some(token) = state.auth_config.extract_token(&headers) {
		match state.session_repo.delete_session(&token).await {
			Ok(true) => tracing::info!("session ended"),
			Ok(false) => tracing::debug!("logout with unknown session"),
			Err(e) => tracing::warn!(error = %e, "failed to delete session"),
		}
	}

	(
		StatusCode::OK,
		[(SET_COOKIE, state.auth_config.clear_cookie_header())],
		Json(LogoutResponse { success: true }),
	)
}
