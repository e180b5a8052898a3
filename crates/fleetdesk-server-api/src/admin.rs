// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fleetdesk_server_db::{CompanyPlan, CompanySummary, PlatformStats};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

use crate::auth::ProfileResponse;
use crate::companies::{CompanyResponse, RouteResponse};
use crate::deliveries::{status_counts, DeliveryResponse, StatusCount};
use crate::drivers::DriverResponse;

/// Query parameters for the admin company listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct ListCompaniesParams {
	/// Case-insensitive substring of name or email.
	pub search: Option<String>,
	/// `active` or `inactive`. Anything else lists both.
	pub status: Option<String>,
	pub plan: Option<CompanyPlan>,
	pub page: Option<i64>,
	#[serde(rename = "pageSize")]
	pub page_size: Option<i64>,
}

impl ListCompaniesParams {
	/// The `status` filter as an activation flag.
	pub fn is_active(&self) -> Option<bool> {
		match self.status.as_deref() {
			Some("active") => Some(true),
			Some("inactive") => Some(false),
			_ => None,
		}
	}
}

/// A company with its headline counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminCompanySummary {
	#[serde(flatten)]
	pub company: CompanyResponse,
	pub drivers_count: i64,
	pub deliveries_count: i64,
}

impl From<CompanySummary> for AdminCompanySummary {
	fn from(summary: CompanySummary) -> Self {
		Self {
			company: summary.company.into(),
			drivers_count: summary.drivers_count,
			deliveries_count: summary.deliveries_count,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PaginationResponse {
	pub page: i64,
	pub page_size: i64,
	pub total: i64,
	pub total_pages: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListCompaniesResponse {
	pub companies: Vec<AdminCompanySummary>,
	pub pagination: PaginationResponse,
}

/// Everything the admin sees about one tenant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminCompanyDetailResponse {
	pub company: CompanyResponse,
	pub owner: Option<ProfileResponse>,
	pub drivers: Vec<DriverResponse>,
	pub deliveries_by_status: Vec<StatusCount>,
	pub recent_deliveries: Vec<DeliveryResponse>,
	pub active_routes: Vec<RouteResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ToggleStatusResponse {
	pub success: bool,
	pub is_active: bool,
	pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PlatformTotals {
	pub companies: i64,
	pub active_companies: i64,
	pub drivers: i64,
	pub deliveries: i64,
	pub routes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RecentActivity {
	pub new_companies_last_30_days: i64,
	/// Deliveries completed since UTC midnight.
	pub deliveries_today: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct PlatformStatsResponse {
	pub totals: PlatformTotals,
	pub recent: RecentActivity,
	pub deliveries_by_status: Vec<StatusCount>,
}

impl From<PlatformStats> for PlatformStatsResponse {
	fn from(stats: PlatformStats) -> Self {
		Self {
			totals: PlatformTotals {
				companies: stats.total_companies,
				active_companies: stats.active_companies,
				drivers: stats.total_drivers,
				deliveries: stats.total_deliveries,
				routes: stats.total_routes,
			},
			recent: RecentActivity {
				new_companies_last_30_days: stats.new_companies_last_30_days,
				deliveries_today: stats.deliveries_today,
			},
			deliveries_by_status: status_counts(stats.deliveries_by_status),
		}
	}
}

/// Error response for admin operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct AdminErrorResponse {
	pub error: String,
	pub message: String,
}

#[cfg(test)]
mod tests {
	use super::*;
	use fleetdesk_server_auth::UserId;
	use fleetdesk_server_db::Company;

	#[test]
	fn status_filter_maps_to_flag() {
		let mut params = ListCompaniesParams::default();
		assert_eq!(params.is_active(), None);
		params.status = Some("active".to_string());
		assert_eq!(params.is_active(), Some(true));
		params.status = Some("inactive".to_string());
		assert_eq!(params.is_active(), Some(false));
		params.status = Some("all".to_string());
		assert_eq!(params.is_active(), None);
	}

	#[test]
	fn page_size_uses_camel_case() {
		let params: ListCompaniesParams =
			serde_json::from_str(r#"{"page":2,"pageSize":25}"#).unwrap();
		assert_eq!(params.page, Some(2));
		assert_eq!(params.page_size, Some(25));
	}

	#[test]
	fn summary_flattens_company_fields() {
		let summary = CompanySummary {
			company: Company::new(&UserId::new("C1"), "Acme"),
			drivers_count: 3,
			deliveries_count: 9,
		};
		let json = serde_json::to_value(AdminCompanySummary::from(summary)).unwrap();
		assert_eq!(json["id"], "C1");
		assert_eq!(json["name"], "Acme");
		assert_eq!(json["drivers_count"], 3);
	}
}
