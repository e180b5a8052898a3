// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, NaiveDate, Utc};
use fleetdesk_server_db::{
	Company, CompanyPlan, CompanyUpdate, Notification, NotificationChannel, NotificationStatus,
	Route, RouteStatus,
};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CompanyResponse {
	pub id: String,
	pub name: String,
	pub business_type: String,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub address: Option<String>,
	pub logo_url: Option<String>,
	pub plan: CompanyPlan,
	pub max_drivers: i64,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Company> for CompanyResponse {
	fn from(company: Company) -> Self {
		Self {
			id: company.id.into_inner(),
			name: company.name,
			business_type: company.business_type,
			phone: company.phone,
			email: company.email,
			address: company.address,
			logo_url: company.logo_url,
			plan: company.plan,
			max_drivers: company.max_drivers,
			is_active: company.is_active,
			created_at: company.created_at,
			updated_at: company.updated_at,
		}
	}
}

/// Onboarding request. The company is created for the signed-in caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct SetupCompanyRequest {
	pub company_name: String,
	pub business_type: Option<String>,
	pub full_name: String,
	pub phone: Option<String>,
}

/// Partial company update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateCompanyRequest {
	pub name: Option<String>,
	pub business_type: Option<String>,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub address: Option<String>,
	pub logo_url: Option<String>,
}

impl From<UpdateCompanyRequest> for CompanyUpdate {
	fn from(req: UpdateCompanyRequest) -> Self {
		Self {
			name: req.name,
			business_type: req.business_type,
			phone: req.phone,
			email: req.email,
			address: req.address,
			logo_url: req.logo_url,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct RouteResponse {
	pub id: String,
	pub company_id: String,
	pub driver_id: Option<String>,
	pub name: String,
	pub status: RouteStatus,
	pub scheduled_date: Option<NaiveDate>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl From<Route> for RouteResponse {
	fn from(route: Route) -> Self {
		Self {
			id: route.id.into_inner(),
			company_id: route.company_id.into_inner(),
			driver_id: route.driver_id.map(|d| d.into_inner()),
			name: route.name,
			status: route.status,
			scheduled_date: route.scheduled_date,
			created_at: route.created_at,
			updated_at: route.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListRoutesResponse {
	pub routes: Vec<RouteResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct NotificationResponse {
	pub id: String,
	pub company_id: String,
	pub delivery_id: Option<String>,
	pub channel: NotificationChannel,
	pub recipient: String,
	pub message: String,
	pub status: NotificationStatus,
	pub sent_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
}

impl From<Notification> for NotificationResponse {
	fn from(n: Notification) -> Self {
		Self {
			id: n.id.into_inner(),
			company_id: n.company_id.into_inner(),
			delivery_id: n.delivery_id.map(|d| d.into_inner()),
			channel: n.channel,
			recipient: n.recipient,
			message: n.message,
			status: n.status,
			sent_at: n.sent_at,
			created_at: n.created_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListNotificationsResponse {
	pub notifications: Vec<NotificationResponse>,
}

/// Error response for company endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CompanyErrorResponse {
	pub error: String,
	pub message: String,
}
