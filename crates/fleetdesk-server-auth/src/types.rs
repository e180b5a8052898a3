// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for authentication and authorization.
//!
//! - **ID newtypes**: type-safe wrappers around opaque string identifiers
//!   ([`UserId`], [`CompanyId`], etc.) preventing accidental mixing
//! - **[`Role`]**: the three-tier role hierarchy and its home paths
//!
//! IDs issued by the identity provider are opaque strings. IDs minted by this
//! server are UUID v4 strings.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(String);

		impl $name {
			/// Create an ID from any string value.
			pub fn new(id: impl Into<String>) -> Self {
				Self(id.into())
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4().to_string())
			}

			/// Borrow the raw identifier.
			pub fn as_str(&self) -> &str {
				&self.0
			}

			/// Take the raw identifier.
			pub fn into_inner(self) -> String {
				self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				f.write_str(&self.0)
			}
		}

		impl From<String> for $name {
			fn from(id: String) -> Self {
				Self(id)
			}
		}

		impl From<&str> for $name {
			fn from(id: &str) -> Self {
				Self(id.to_string())
			}
		}

		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user (issued by the identity provider).");
define_id_type!(CompanyId, "Unique identifier for a company (tenant).");
define_id_type!(DeliveryId, "Unique identifier for a delivery.");
define_id_type!(RouteId, "Unique identifier for a delivery route.");
define_id_type!(NotificationId, "Unique identifier for a notification.");

impl CompanyId {
	/// The tenant id of a company-role user. A company's own profile id doubles as its tenant id.
	pub fn for_owner(owner: &UserId) -> Self {
		Self(owner.as_str().to_string())
	}

	/// The profile id of the company's owner.
	pub fn owner_id(&self) -> UserId {
		UserId::new(self.0.clone())
	}
}

// =============================================================================
// Roles
// =============================================================================

/// Role of a profile.
///
/// `Unknown` captures any value the profile store returns that this server does
/// not recognise. It is never granted access to a scoped route and its home
/// path is the login page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
	/// Platform operator, sees every tenant.
	Admin,
	/// Owner of a tenant.
	Company,
	/// Employee of exactly one tenant.
	Driver,
	#[serde(other)]
	Unknown,
}

impl Role {
	/// Roles that can be assigned to a profile.
	pub fn all() -> &'static [Role] {
		&[Role::Admin, Role::Company, Role::Driver]
	}

	/// Parse a stored role value. Unrecognised values map to [`Role::Unknown`].
	pub fn parse(value: &str) -> Role {
		match value {
			"admin" => Role::Admin,
			"company" => Role::Company,
			"driver" => Role::Driver,
			_ => Role::Unknown,
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			Role::Admin => "admin",
			Role::Company => "company",
			Role::Driver => "driver",
			Role::Unknown => "unknown",
		}
	}

	/// Landing page for the role. Total over every variant.
	pub fn home_path(&self) -> &'static str {
		match self {
			Role::Admin => "/admin",
			Role::Company => "/dashboard",
			Role::Driver => "/driver",
			Role::Unknown => "/login",
		}
	}

	pub fn is_known(&self) -> bool {
		!matches!(self, Role::Unknown)
	}
}

impl fmt::Display for Role {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
