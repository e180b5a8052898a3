// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Session middleware and extractors for the JSON API.
//!
//! [`auth_layer`] resolves the caller once per request and stores the
//! [`AuthContext`] in the request extensions. Handlers take [`RequireAuth`]
//! to get the signed-in caller, whose profile may still be missing.
//!
//! Unlike the page gate, nothing here redirects: API failures are status codes.

use axum::{
	extract::{FromRequestParts, Request, State},
	http::request::Parts,
	middleware::Next,
	response::{IntoResponse, Response},
};
use fleetdesk_server_api::AuthErrorResponse;
use fleetdesk_server_auth::{
	require_access, AccessError, AuthContext, CompanyId, Identity, Profile, Role,
};

use crate::{api::AppState, api_response::access_denied};

/// Resolve the session on the request and attach an [`AuthContext`].
pub async fn auth_layer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	let token = state.auth_config.extract_token(req.headers());
	let ctx = state.gate.authenticate(token.as_deref()).await;
	req.extensions_mut().insert(ctx);
	next.run(req).await
}

/// The signed-in caller. The profile is absent until registration completes.
#[derive(Debug, Clone)]
pub struct CurrentUser {
	pub identity: Identity,
	pub profile: Option<Profile>,
}

impl CurrentUser {
	pub fn require_profile(&self) -> Result<&Profile, AccessError> {
		self.profile.as_ref().ok_or(AccessError::ProfileMissing)
	}

	pub fn require_role(&self, roles: &[Role]) -> Result<&Profile, AccessError> {
		let profile = self.require_profile()?;
		if roles.contains(&profile.role) {
			Ok(profile)
		} else {
			Err(AccessError::RoleMismatch {
				required: roles.first().copied().unwrap_or(Role::Admin),
				actual: profile.role,
			})
		}
	}

	/// The caller's profile, provided it may touch data of `company_id`.
	pub fn require_tenant(&self, company_id: &CompanyId) -> Result<&Profile, AccessError> {
		require_access(Some(self.require_profile()?), company_id)
	}
}

/// Extractor that rejects anonymous callers with 401.
#[derive(Debug, Clone)]
pub struct RequireAuth(pub CurrentUser);

impl<S: Send + Sync> FromRequestParts<S> for RequireAuth {
	type Rejection = Response;

	async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
		let ctx = parts
			.extensions
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_default();

		match ctx.identity {
			Some(identity) => Ok(RequireAuth(CurrentUser {
				identity,
				profile: ctx.profile,
			})),
			None => Err(
				access_denied::<AuthErrorResponse>(&AccessError::IdentityUnavailable).into_response(),
			),
		}
	}
}
