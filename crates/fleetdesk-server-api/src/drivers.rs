// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use fleetdesk_server_db::{Driver, DriverWithProfile, VehicleType};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

/// A driver with the display fields of its profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DriverResponse {
	pub id: String,
	pub company_id: String,
	pub driver_code: Option<String>,
	pub vehicle_type: VehicleType,
	pub license_plate: Option<String>,
	pub is_active: bool,
	pub is_available: bool,
	pub current_lat: Option<f64>,
	pub current_lng: Option<f64>,
	pub full_name: Option<String>,
	pub email: Option<String>,
	pub phone: Option<String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Driver> for DriverResponse {
	fn from(driver: Driver) -> Self {
		Self {
			id: driver.id.into_inner(),
			company_id: driver.company_id.into_inner(),
			driver_code: driver.driver_code,
			vehicle_type: driver.vehicle_type,
			license_plate: driver.license_plate,
			is_active: driver.is_active,
			is_available: driver.is_available,
			current_lat: driver.current_lat,
			current_lng: driver.current_lng,
			full_name: None,
			email: None,
			phone: None,
			created_at: driver.created_at,
			updated_at: driver.updated_at,
		}
	}
}

impl From<DriverWithProfile> for DriverResponse {
	fn from(d: DriverWithProfile) -> Self {
		Self {
			full_name: d.full_name,
			email: d.email,
			phone: d.phone,
			..DriverResponse::from(d.driver)
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListDriversResponse {
	pub drivers: Vec<DriverResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ValidateCodeRequest {
	pub code: String,
}

/// The company an invitation code belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct InviteCompany {
	pub id: String,
	pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ValidateCodeResponse {
	pub valid: bool,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub company: Option<InviteCompany>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl ValidateCodeResponse {
	pub fn valid(company: InviteCompany) -> Self {
		Self {
			valid: true,
			company: Some(company),
			error: None,
		}
	}

	pub fn invalid(error: impl Into<String>) -> Self {
		Self {
			valid: false,
			company: None,
			error: Some(error.into()),
		}
	}
}

/// Join a company as a driver with an invitation code.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct JoinCompanyRequest {
	pub code: String,
	pub vehicle_type: VehicleType,
	pub license_plate: Option<String>,
	pub full_name: String,
	pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct JoinCompanyResponse {
	pub driver: DriverResponse,
	pub company: InviteCompany,
}

/// Error response for driver endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DriverErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn invalid_code_response_has_no_company() {
		let json = serde_json::to_value(ValidateCodeResponse::invalid("expired")).unwrap();
		assert_eq!(json["valid"], false);
		assert_eq!(json["error"], "expired");
		assert!(json.get("company").is_none());
	}

	#[test]
	fn join_request_requires_known_vehicle() {
		let ok: Result<JoinCompanyRequest, _> = serde_json::from_str(
			r#"{"code":"x","vehicle_type":"van","full_name":"Luis"}"#,
		);
		assert!(ok.is_ok());
		let bad: Result<JoinCompanyRequest, _> = serde_json::from_str(
			r#"{"code":"x","vehicle_type":"rocket","full_name":"Luis"}"#,
		);
		assert!(bad.is_err());
	}
}
