// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identities and profiles.
//!
//! An [`Identity`] is what the identity provider vouches for. A [`Profile`] is the
//! application's record for that identity: its [`Role`] and tenant association.

use serde::{Deserialize, Serialize};

use crate::types::{CompanyId, Role, UserId};

/// An authenticated user as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
	pub user_id: UserId,
	pub email: String,
}

impl Identity {
	pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
		Self {
			user_id,
			email: email.into(),
		}
	}
}

/// Application profile of an identity.
///
/// Invariants held by every profile that leaves [`Profile::normalized`]:
///
/// - `Admin` has no `company_id`
/// - `Company` has `company_id == id`
/// - `Driver` has the employing company's id
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
	pub id: UserId,
	pub email: String,
	pub full_name: Option<String>,
	pub phone: Option<String>,
	pub role: Role,
	pub company_id: Option<CompanyId>,
}

impl Profile {
	pub fn admin(id: UserId, email: impl Into<String>) -> Self {
		Self {
			id,
			email: email.into(),
			full_name: None,
			phone: None,
			role: Role::Admin,
			company_id: None,
		}
	}

	pub fn company(id: UserId, email: impl Into<String>) -> Self {
		let company_id = CompanyId::for_owner(&id);
		Self {
			id,
			email: email.into(),
			full_name: None,
			phone: None,
			role: Role::Company,
			company_id: Some(company_id),
		}
	}

	pub fn driver(id: UserId, email: impl Into<String>, company_id: CompanyId) -> Self {
		Self {
			id,
			email: email.into(),
			full_name: None,
			phone: None,
			role: Role::Driver,
			company_id: Some(company_id),
		}
	}

	pub fn with_full_name(mut self, full_name: impl Into<String>) -> Self {
		self.full_name = Some(full_name.into());
		self
	}

	/// Bring a stored profile in line with the role invariants.
	///
	/// Returns `None` when the profile cannot be made consistent: an unknown
	/// role, or a driver with no employer. Callers treat that as profile-absent.
	pub fn normalized(mut self) -> Option<Profile> {
		match self.role {
			Role::Admin => {
				self.company_id = None;
				Some(self)
			}
			Role::Company => {
				self.company_id = Some(CompanyId::for_owner(&self.id));
				Some(self)
			}
			Role::Driver => self.company_id.is_some().then_some(self),
			Role::Unknown => None,
		}
	}

	/// Tenant the profile operates in. `None` for admins, who are not bound to one.
	pub fn tenant_id(&self) -> Option<&CompanyId> {
		match self.role {
			Role::Company | Role::Driver => self.company_id.as_ref(),
			Role::Admin | Role::Unknown => None,
		}
	}

	pub fn is_admin(&self) -> bool {
		self.role == Role::Admin
	}
}
