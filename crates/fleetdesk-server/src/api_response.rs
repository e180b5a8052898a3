// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! API response helpers.
//!
//! This module provides common response patterns for HTTP handlers:
//! - Error response helpers (bad_request, conflict, not_found, internal_error)
//! - [`access_denied`], which maps an [`AccessError`] to 401 or 403
//! - A macro implementing [`ApiErrorResponse`] for `{ error, message }` types

use axum::{http::StatusCode, Json};
use fleetdesk_server_api::{
	AdminErrorResponse, AuthErrorResponse, CompanyErrorResponse, DeliveryErrorResponse,
	DriverErrorResponse, InviteErrorResponse,
};
use fleetdesk_server_auth::AccessError;
use serde::Serialize;

/// Trait for API error response types that have `error` and `message` fields.
pub trait ApiErrorResponse: Serialize + Send {
	fn new(error: impl Into<String>, message: impl Into<String>) -> Self;
}

/// Implement `ApiErrorResponse` for a struct with `error` and `message` fields.
///
/// # Example
///
/// ```ignore
/// impl_api_error_response!(CompanyErrorResponse);
/// ```
#[macro_export]
macro_rules! impl_api_error_response {
	($ty:ty) => {
		impl $crate::api_response::ApiErrorResponse for $ty {
			fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
				Self {
					error: error.into(),
					message: message.into(),
				}
			}
		}
	};
}

impl_api_error_response!(AdminErrorResponse);
impl_api_error_response!(AuthErrorResponse);
impl_api_error_response!(CompanyErrorResponse);
impl_api_error_response!(DeliveryErrorResponse);
impl_api_error_response!(DriverErrorResponse);
impl_api_error_response!(InviteErrorResponse);

/// Create a 400 Bad Request response.
pub fn bad_request<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::BAD_REQUEST, Json(T::new(error, message)))
}

/// Create a 409 Conflict response.
pub fn conflict<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::CONFLICT, Json(T::new(error, message)))
}

/// Create a 404 Not Found response.
pub fn not_found<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(StatusCode::NOT_FOUND, Json(T::new("not_found", message)))
}

/// Create a 500 Internal Server Error response.
pub fn internal_error<T: ApiErrorResponse>(message: impl Into<String>) -> (StatusCode, Json<T>) {
	(
		StatusCode::INTERNAL_SERVER_ERROR,
		Json(T::new("internal_error", message)),
	)
}

/// Create a 403 Forbidden response.
pub fn forbidden<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::FORBIDDEN, Json(T::new(error, message)))
}

/// Create a 401 Unauthorized response.
pub fn unauthorized<T: ApiErrorResponse>(
	error: impl Into<String>,
	message: impl Into<String>,
) -> (StatusCode, Json<T>) {
	(StatusCode::UNAUTHORIZED, Json(T::new(error, message)))
}

/// Map an access failure to its API response.
///
/// | Error                 | Status |
/// |-----------------------|--------|
/// | `IdentityUnavailable` | 401    |
/// | `ProfileMissing`      | 403    |
/// | `RoleMismatch`        | 403    |
/// | `TenantMismatch`      | 403    |
///
/// Messages never name the role or tenant that would have been required.
pub fn access_denied<T: ApiErrorResponse>(err: &AccessError) -> (StatusCode, Json<T>) {
	match err {
		AccessError::IdentityUnavailable => {
			unauthorized("unauthorized", "Authentication required")
		}
		AccessError::ProfileMissing => forbidden(
			"profile_missing",
			"Complete registration before using this endpoint",
		),
		AccessError::RoleMismatch { .. } | AccessError::TenantMismatch { .. } => {
			forbidden("forbidden", "Insufficient permissions")
		}
	}
}
