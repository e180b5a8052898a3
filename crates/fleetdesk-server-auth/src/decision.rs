// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access decision engine.
//!
//! [`decide`] combines a route classification with what is known about the
//! caller and returns an [`AccessDecision`]. It performs no I/O; resolving the
//! identity and loading the role happen in [`crate::gate::AccessGate`], and
//! turning the decision into an HTTP response happens in the server's gate
//! middleware.
//!
//! ```text
//!                  ┌─ identity absent ──────────────────────────── Allow
//!   Public ────────┤
//!                  └─ identity present ─┬─ role present ────────── RedirectHome(role)
//!                                       └─ role absent ─────────── Allow
//!
//!                  ┌─ identity absent ──────────────────────────── RedirectLogin(path)
//!   Protected ─────┤
//!                  └─ identity present ─┬─ role absent ─────────── RedirectLogin(none)
//!                                       ├─ scoped, role differs ── RedirectHome(role)
//!                                       └─ otherwise ───────────── Allow
//! ```

use serde::Serialize;
use tracing::instrument;

use crate::error::AccessError;
use crate::route::RouteClass;
use crate::types::Role;

/// Path of the login page.
pub const LOGIN_PATH: &str = "/login";

/// Query parameter carrying the path to resume after login.
pub const RETURN_TO_PARAM: &str = "redirectTo";

/// Outcome of the access decision engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AccessDecision {
	/// Let the request through.
	Allow,
	/// Send the caller to the login page, optionally resuming at `return_to`.
	RedirectLogin { return_to: Option<String> },
	/// Send the caller to their role's landing page.
	RedirectHome { role: Role },
}

impl AccessDecision {
	pub fn is_allow(&self) -> bool {
		matches!(self, AccessDecision::Allow)
	}

	/// Target of the redirect, or `None` for [`AccessDecision::Allow`].
	pub fn location(&self) -> Option<String> {
		match self {
			AccessDecision::Allow => None,
			AccessDecision::RedirectLogin { return_to } => {
				Some(login_location(return_to.as_deref()))
			}
			AccessDecision::RedirectHome { role } => Some(role.home_path().to_string()),
		}
	}

	/// Why the caller was turned away from a protected route.
	///
	/// Signed-in users bounced off a public page are not denied, they are sent home,
	/// so this returns `None` for them.
	pub fn denial_reason(&self, class: RouteClass) -> Option<AccessError> {
		match self {
			AccessDecision::Allow => None,
			AccessDecision::RedirectLogin { return_to: Some(_) } => {
				Some(AccessError::IdentityUnavailable)
			}
			AccessDecision::RedirectLogin { return_to: None } => Some(AccessError::ProfileMissing),
			AccessDecision::RedirectHome { role } => {
				class
					.required_role()
					.map(|required| AccessError::RoleMismatch {
						required,
						actual: *role,
					})
			}
		}
	}
}

/// Build the login URL, encoding the return path as a query parameter.
pub fn login_location(return_to: Option<&str>) -> String {
	match return_to {
		Some(path) => {
			let query = url::form_urlencoded::Serializer::new(String::new())
				.append_pair(RETURN_TO_PARAM, path)
				.finish();
			format!("{LOGIN_PATH}?{query}")
		}
		None => LOGIN_PATH.to_string(),
	}
}

/// Decide what to do with a request.
///
/// # Arguments
///
/// * `class` - Classification of `path`
/// * `path` - The requested path, preserved as the login return path
/// * `identity_present` - Whether a session resolved to an identity
/// * `role` - The caller's role if a profile was loaded
///
/// A `Some(Role::Unknown)` role is treated as absent everywhere:
///
/// * On a public page the caller is allowed through. An unknown role has no
///   landing page other than login, so redirecting them home would loop.
/// * On every protected page, `ProtectedGeneric` included, the caller gets
///   `RedirectLogin` with no return path. A profile with an unrecognised role
///   cannot reach a generic page that any known role could.
#[instrument(level = "debug", skip(path), fields(path = %path))]
pub fn decide(
	class: RouteClass,
	path: &str,
	identity_present: bool,
	role: Option<Role>,
) -> AccessDecision {
	let role = role.filter(Role::is_known);

	if class.is_public() {
		return match (identity_present, role) {
			(true, Some(role)) => AccessDecision::RedirectHome { role },
			_ => AccessDecision::Allow,
		};
	}

	if !identity_present {
		return AccessDecision::RedirectLogin {
			return_to: Some(path.to_string()),
		};
	}

	let Some(role) = role else {
		return AccessDecision::RedirectLogin { return_to: None };
	};

	match class.required_role() {
		Some(required) if required != role => AccessDecision::RedirectHome { role },
		_ => AccessDecision::Allow,
	}
}
