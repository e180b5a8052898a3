// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Route-level role checks for the JSON API.
//!
//! Authorization is two-tier:
//!
//! 1. **Route-level** ([`RequireRole`]): a coarse role check applied to a whole
//!    router, such as `/api/admin`.
//! 2. **Handler-level**: [`fleetdesk_server_auth::require_access`] on the
//!    `company_id` of whatever the handler touches.
//!
//! The layer reads the [`AuthContext`] that
//! [`auth_layer`](crate::auth_middleware::auth_layer) stored in the request
//! extensions, so it must sit inside that middleware.
//!
//! # Security Properties
//!
//! - Unauthenticated requests are rejected with 401
//! - Authenticated requests without a matching role are rejected with 403
//! - Error bodies never name the role that would have been required
//!
//! # Example
//!
//! ```ignore
//! Router::new()
//!     .route("/stats", get(platform_stats))
//!     .route_layer(RequireRole::admin())
//!     .layer(from_fn_with_state(state, auth_layer));
//! ```

use axum::{
	body::Body,
	http::{Request, StatusCode},
	response::{IntoResponse, Response},
};
use fleetdesk_server_api::AuthErrorResponse;
use fleetdesk_server_auth::{AuthContext, Role};
use pin_project_lite::pin_project;
use std::{
	future::Future,
	pin::Pin,
	task::{Context, Poll},
};
use tower::{Layer, Service};

use crate::api_response::access_denied;

/// Route layer that admits callers whose profile has one of `roles`.
#[derive(Clone, Copy, Debug)]
pub struct RequireRole {
	roles: &'static [Role],
}

impl RequireRole {
	pub const fn new(roles: &'static [Role]) -> Self {
		Self { roles }
	}

	/// Require the platform admin role.
	pub const fn admin() -> Self {
		Self::new(&[Role::Admin])
	}
}

impl<S> Layer<S> for RequireRole {
	type Service = RequireRoleService<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireRoleService {
			inner,
			roles: self.roles,
		}
	}
}

/// Service wrapper for [`RequireRole`] layer.
#[derive(Clone)]
pub struct RequireRoleService<S> {
	inner: S,
	roles: &'static [Role],
}

impl<S> Service<Request<Body>> for RequireRoleService<S>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send,
{
	type Response = Response;
	type Error = S::Error;
	type Future = RequireRoleFuture<S::Future>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		let auth_ctx = req
			.extensions()
			.get::<AuthContext>()
			.cloned()
			.unwrap_or_else(AuthContext::anonymous);

		match auth_ctx.require_role(self.roles) {
			Ok(profile) => {
				tracing::debug!(user_id = %profile.id, role = %profile.role, "Role check passed");
				RequireRoleFuture::Inner {
					fut: self.inner.call(req),
				}
			}
			Err(err) => {
				tracing::info!(
					user_id = auth_ctx.identity.as_ref().map(|i| i.user_id.as_str()),
					path = %req.uri().path(),
					reason = %err,
					"Role check denied"
				);
				RequireRoleFuture::Rejected {
					resp: Some(access_denied::<AuthErrorResponse>(&err).into_response()),
				}
			}
		}
	}
}

pin_project! {
	/// Future for [`RequireRoleService`].
	#[project = RequireRoleFutureProj]
	pub enum RequireRoleFuture<F> {
		Inner { #[pin] fut: F },
		Rejected { resp: Option<Response> },
	}
}

impl<F, E> Future for RequireRoleFuture<F>
where
	F: Future<Output = Result<Response, E>>,
{
	type Output = Result<Response, E>;

	fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
		match self.project() {
			RequireRoleFutureProj::Inner { fut } => fut.poll(cx),
			RequireRoleFutureProj::Rejected { resp } => Poll::Ready(Ok(resp
				.take()
				.unwrap_or_else(|| StatusCode::INTERNAL_SERVER_ERROR.into_response()))),
		}
	}
}
