// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fleetdesk_server_auth::{Identity, Profile};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A profile as seen by its owner and by admins.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ProfileResponse {
	pub id: String,
	pub email: String,
	pub full_name: Option<String>,
	pub phone: Option<String>,
	/// `admin`, `company` or `driver`.
	pub role: String,
	pub company_id: Option<String>,
}

impl From<&Profile> for ProfileResponse {
	fn from(profile: &Profile) -> Self {
		Self {
			id: profile.id.to_string(),
			email: profile.email.clone(),
			full_name: profile.full_name.clone(),
			phone: profile.phone.clone(),
			role: profile.role.as_str().to_string(),
			company_id: profile.company_id.as_ref().map(|c| c.to_string()),
		}
	}
}

/// The signed-in caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct MeResponse {
	pub user_id: String,
	pub email: String,
	/// `null` until onboarding has created a profile.
	pub profile: Option<ProfileResponse>,
	/// Landing page for the caller's role.
	pub home_path: String,
}

impl MeResponse {
	pub fn new(identity: &Identity, profile: Option<&Profile>) -> Self {
		let home_path = profile
			.map(|p| p.role.home_path())
			.unwrap_or(fleetdesk_server_auth::LOGIN_PATH);
		Self {
			user_id: identity.user_id.to_string(),
			email: identity.email.clone(),
			profile: profile.map(ProfileResponse::from),
			home_path: home_path.to_string(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct LogoutResponse {
	pub success: bool,
}

/// Error response for authentication endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AuthErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use fleetdesk_server_auth::{CompanyId, UserId};

	#[test]
	fn me_without_profile_points_at_login() {
		let identity = Identity::new(UserId::new("U1"), "u1@test");
		let me = MeResponse::new(&identity, None);
		assert!(me.profile.is_none());
		assert_eq!(me.home_path, "/login");
	}

	#[test]
	fn me_with_driver_profile() {
		let identity = Identity::new(UserId::new("D1"), "d1@test");
		let profile = Profile::driver(UserId::new("D1"), "d1@test", CompanyId::new("C1"));
		let me = MeResponse::new(&identity, Some(&profile));
		assert_eq!(me.home_path, "/driver");
		let profile = me.profile.unwrap();
		assert_eq!(profile.role, "driver");
		assert_eq!(profile.company_id.as_deref(), Some("C1"));
	}
}
