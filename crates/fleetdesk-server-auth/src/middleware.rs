// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request credential extraction and the per-request auth context.
//!
//! This module provides:
//! - [`AuthContext`] - identity and profile resolved for the current request
//! - [`AuthConfig`] - configuration for credential extraction
//! - Helper functions for extracting session cookies and bearer tokens
//!
//! # Security Notes
//!
//! - Session tokens are extracted from cookies (HttpOnly, Secure recommended)
//! - Bearer tokens are extracted from the Authorization header
//! - Token values are never logged

use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use tracing::instrument;

use crate::error::AccessError;
use crate::profile::{Identity, Profile};
use crate::types::Role;

/// Default name for the session cookie.
pub const SESSION_COOKIE_NAME: &str = "fleetdesk_session";

/// Identity and profile resolved for the current request.
///
/// Inserted into request extensions by the server so handlers never resolve
/// the session twice.
#[derive(Debug, Clone, Default)]
pub struct AuthContext {
	pub identity: Option<Identity>,
	pub profile: Option<Profile>,
}

impl AuthContext {
	/// Context for a request without a usable session.
	pub fn anonymous() -> Self {
		Self::default()
	}

	pub fn new(identity: Option<Identity>, profile: Option<Profile>) -> Self {
		// A profile never outlives its identity.
		let profile = identity.as_ref().and(profile);
		Self { identity, profile }
	}

	pub fn is_authenticated(&self) -> bool {
		self.identity.is_some()
	}

	pub fn role(&self) -> Option<Role> {
		self.profile.as_ref().map(|p| p.role)
	}

	/// Require a signed-in caller.
	pub fn require_identity(&self) -> Result<&Identity, AccessError> {
		self.identity.as_ref().ok_or(AccessError::IdentityUnavailable)
	}

	/// Require a signed-in caller with a provisioned profile.
	pub fn require_profile(&self) -> Result<&Profile, AccessError> {
		self.require_identity()?;
		self.profile.as_ref().ok_or(AccessError::ProfileMissing)
	}

	/// Require a profile with one of `roles`.
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
}

/// Configuration for credential extraction.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	/// Name of the session cookie.
	pub session_cookie_name: String,
	/// Whether to mark issued cookies `Secure`.
	pub secure_cookies: bool,
}

impl Default for AuthConfig {
	fn default() -> Self {
		Self {
			session_cookie_name: SESSION_COOKIE_NAME.to_string(),
			secure_cookies: false,
		}
	}
}

impl AuthConfig {
	pub fn new() -> Self {
		Self::default()
	}

	/// Set the session cookie name.
	pub fn with_session_cookie_name(mut self, name: impl Into<String>) -> Self {
		self.session_cookie_name = name.into();
		self
	}

	pub fn with_secure_cookies(mut self, secure: bool) -> Self {
		self.secure_cookies = secure;
		self
	}

	/// Session token from the cookie, falling back to a bearer token.
	pub fn extract_token(&self, headers: &HeaderMap) -> Option<String> {
		extract_session_cookie_with_name(headers, &self.session_cookie_name)
			.or_else(|| extract_bearer_token(headers))
	}

	/// `Set-Cookie` value that clears the session cookie.
	pub fn clear_cookie_header(&self) -> String {
		let secure = if self.secure_cookies { "; Secure" } else { "" };
		format!(
			"{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0{secure}",
			self.session_cookie_name
		)
	}
}

/// Extract the session token from the Cookie header (default cookie name).
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
	extract_session_cookie_with_name(headers, SESSION_COOKIE_NAME)
}

/// Extract the session token from the Cookie header with a custom cookie name.
///
/// Returns `None` if the cookie is absent or empty.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == cookie_name && !value.is_empty()).then(|| value.to_string())
		})
}

/// Extract bearer token from the Authorization header.
///
/// Expects the format: `Authorization: Bearer <token>`
#[instrument(level = "trace", skip_all)]
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
	let auth_header = headers.get(AUTHORIZATION)?;
	let auth_str = auth_header.to_str().ok()?;
	auth_str
		.strip_prefix("Bearer ")
		.map(str::trim)
		.filter(|token| !token.is_empty())
		.map(|token| token.to_string())
}
