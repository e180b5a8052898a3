// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route classification.
//!
//! [`classify`] maps a request path to a [`RouteClass`]. It is a pure function of
//! the path string and is recomputed for every request.
//!
//! | Path                          | Class              |
//! |-------------------------------|--------------------|
//! | `/`                           | `Public`           |
//! | `/login*`, `/register*`       | `Public`           |
//! | `/admin*`                     | `AdminScoped`      |
//! | `/dashboard*`                 | `CompanyScoped`    |
//! | `/driver*`                    | `DriverScoped`     |
//! | anything else                 | `ProtectedGeneric` |
//!
//! Prefixes are raw string prefixes, so `/registration` is public and
//! `/drivers` is driver-scoped. Static assets are filtered out before the
//! classifier runs.
//!
//! The classifier sees paths as the file server will resolve them. Callers
//! pass request paths through [`canonical_path`] first, so `//admin/` and
//! `/%61dmin` land in the admin scope rather than the generic one.

use serde::Serialize;

use crate::types::Role;

/// Paths that are public only on an exact match.
pub const PUBLIC_EXACT_PATHS: &[&str] = &["/"];

/// Paths that are public along with everything beneath them.
pub const PUBLIC_PATH_PREFIXES: &[&str] = &["/login", "/register"];

/// Prefixes reserved for a single role, checked in order.
pub const SCOPED_PREFIXES: &[(&str, RouteClass)] = &[
	("/admin", RouteClass::AdminScoped),
	("/dashboard", RouteClass::CompanyScoped),
	("/driver", RouteClass::DriverScoped),
];

/// Classification of a request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
	/// Reachable without a session.
	Public,
	/// Requires the admin role.
	AdminScoped,
	/// Requires the company role.
	CompanyScoped,
	/// Requires the driver role.
	DriverScoped,
	/// Requires a session with any role.
	ProtectedGeneric,
}

impl RouteClass {
	pub fn is_public(&self) -> bool {
		matches!(self, RouteClass::Public)
	}

	/// Role a scoped route requires. `None` for public and generic routes.
	pub fn required_role(&self) -> Option<Role> {
		match self {
			RouteClass::AdminScoped => Some(Role::Admin),
			RouteClass::CompanyScoped => Some(Role::Company),
			RouteClass::DriverScoped => Some(Role::Driver),
			RouteClass::Public | RouteClass::ProtectedGeneric => None,
		}
	}
}

/// Classify a request path.
pub fn classify(path: &str) -> RouteClass {
	if is_public_path(path) {
		return RouteClass::Public;
	}

	SCOPED_PREFIXES
		.iter()
		.find(|(prefix, _)| path.starts_with(prefix))
		.map(|(_, class)| *class)
		.unwrap_or(RouteClass::ProtectedGeneric)
}

/// Whether a path is on the public allow-list.
pub fn is_public_path(path: &str) -> bool {
	PUBLIC_EXACT_PATHS.contains(&path)
		|| PUBLIC_PATH_PREFIXES
			.iter()
			.any(|prefix| path.starts_with(prefix))
}

/// Canonical form of a raw request path.
///
/// Percent-decodes once, drops empty and `.` segments and resolves `..`
/// without climbing above the root. A trailing slash on a non-root path is
/// kept. Invalid UTF-8 is replaced rather than rejected.
pub fn canonical_path(raw: &str) -> String {
	let bytes = urlencoding::decode_binary(raw.as_bytes());
	let decoded = String::from_utf8_lossy(&bytes);

	let mut segments: Vec<&str> = Vec::new();
	for segment in decoded.split('/') {
		match segment {
			"" | "." => {}
			".." => {
				segments.pop();
			}
			segment => segments.push(segment),
		}
	}

	let mut path = format!("/{}", segments.join("/"));
	if !segments.is_empty() && decoded.ends_with('/') {
		path.push('/');
	}
	path
}
