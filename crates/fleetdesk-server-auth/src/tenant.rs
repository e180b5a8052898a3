// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant access checks.
//!
//! The access gate only proves "some company" or "some driver" can see a page.
//! Every handler that touches tenant data calls [`require_access`] with the
//! `company_id` of the resource.
//!
//! | Role      | May access                       |
//! |-----------|----------------------------------|
//! | `admin`   | every company, known or not      |
//! | `company` | its own company                  |
//! | `driver`  | its employer                     |
//! | other     | nothing                          |

use tracing::instrument;

use crate::error::AccessError;
use crate::profile::Profile;
use crate::types::{CompanyId, Role};

/// Whether `profile` may read or write data belonging to `company_id`.
#[instrument(
	level = "debug",
	skip(profile),
	fields(
		user_id = profile.map(|p| p.id.as_str()),
		role = ?profile.map(|p| p.role),
		company_id = %company_id,
	)
)]
pub fn has_access(profile: Option<&Profile>, company_id: &CompanyId) -> bool {
	let Some(profile) = profile else {
		return false;
	};

	match profile.role {
		Role::Admin => true,
		Role::Company | Role::Driver => profile.company_id.as_ref() == Some(company_id),
		Role::Unknown => false,
	}
}

/// Like [`has_access`], but fails with [`AccessError::TenantMismatch`].
pub fn require_access<'a>(
	profile: Option<&'a Profile>,
	company_id: &CompanyId,
) -> Result<&'a Profile, AccessError> {
	match profile {
		Some(profile) if has_access(Some(profile), company_id) => Ok(profile),
		_ => {
			tracing::info!(
				user_id = profile.map(|p| p.id.as_str()),
				company_id = %company_id,
				"tenant access denied"
			);
			Err(AccessError::TenantMismatch {
				company_id: company_id.clone(),
			})
		}
	}
}
