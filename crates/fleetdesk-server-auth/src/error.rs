// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::types::{CompanyId, Role};

/// Reasons a request is denied.
///
/// Page routes turn every variant into a redirect. API routes turn
/// `IdentityUnavailable` into 401 and the rest into 403.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccessError {
	#[error("authentication required")]
	IdentityUnavailable,

	#[error("no profile has been provisioned for this account")]
	ProfileMissing,

	#[error("role {actual} cannot access a route reserved for {required}")]
	RoleMismatch { required: Role, actual: Role },

	#[error("no access to company {company_id}")]
	TenantMismatch { company_id: CompanyId },
}

impl AccessError {
	/// Whether the caller should authenticate rather than be told "forbidden".
	pub fn is_unauthenticated(&self) -> bool {
		matches!(self, AccessError::IdentityUnavailable)
	}
}

/// Failure talking to the identity provider or profile store.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
	#[error("identity provider error: {0}")]
	Provider(String),

	#[error("profile store error: {0}")]
	Store(String),
}
