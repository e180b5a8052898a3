// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Domain records stored by the FleetDesk server.

use chrono::{DateTime, NaiveDate, Utc};
use fleetdesk_server_auth::{CompanyId, DeliveryId, NotificationId, RouteId, UserId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Declares a closed string enum stored as TEXT.
macro_rules! text_enum {
	(
		$(#[$meta:meta])*
		$name:ident { $($variant:ident => $text:literal),+ $(,)? }
	) => {
		$(#[$meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
		pub enum $name {
			$(
				#[serde(rename = $text)]
				$variant,
			)+
		}

		impl $name {
			pub fn all() -> &'static [$name] {
				&[$($name::$variant),+]
			}

			pub fn as_str(&self) -> &'static str {
				match self {
					$($name::$variant => $text),+
				}
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(self.as_str())
			}
		}

		impl std::str::FromStr for $name {
			type Err = String;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				match s {
					$($text => Ok($name::$variant),)+
					other => Err(format!("invalid {}: '{}'", stringify!($name), other)),
				}
			}
		}
	};
}

text_enum! {
	/// Subscription plan.
	CompanyPlan {
		Free => "free",
		Basic => "basic",
		Pro => "pro",
		Enterprise => "enterprise",
	}
}

text_enum! {
	VehicleType {
		Bike => "bike",
		Motorcycle => "motorcycle",
		Car => "car",
		Van => "van",
		Truck => "truck",
	}
}

text_enum! {
	/// Delivery lifecycle.
	DeliveryStatus {
		Pending => "pending",
		Assigned => "assigned",
		InTransit => "in_transit",
		Delivered => "delivered",
		Failed => "failed",
		Cancelled => "cancelled",
	}
}

text_enum! {
	DeliveryPriority {
		Alta => "alta",
		Media => "media",
		Baja => "baja",
	}
}

text_enum! {
	RouteStatus {
		Planned => "planned",
		InProgress => "in_progress",
		Completed => "completed",
		Cancelled => "cancelled",
	}
}

text_enum! {
	NotificationChannel {
		Whatsapp => "whatsapp",
		Email => "email",
		Sms => "sms",
		Push => "push",
	}
}

text_enum! {
	NotificationStatus {
		Pending => "pending",
		Sent => "sent",
		Delivered => "delivered",
		Failed => "failed",
	}
}

impl Default for CompanyPlan {
	fn default() -> Self {
		CompanyPlan::Free
	}
}

impl Default for DeliveryPriority {
	fn default() -> Self {
		DeliveryPriority::Media
	}
}

impl RouteStatus {
	/// Routes an admin sees as "active".
	pub fn is_active(&self) -> bool {
		matches!(self, RouteStatus::Planned | RouteStatus::InProgress)
	}
}

/// Business type recorded when onboarding does not name one.
pub const DEFAULT_BUSINESS_TYPE: &str = "otro";

/// A tenant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
	pub id: CompanyId,
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

impl Company {
	/// A new free-plan company owned by `owner`.
	pub fn new(owner: &UserId, name: impl Into<String>) -> Self {
		let now = Utc::now();
		Self {
			id: CompanyId::for_owner(owner),
			name: name.into(),
			business_type: DEFAULT_BUSINESS_TYPE.to_string(),
			phone: None,
			email: None,
			address: None,
			logo_url: None,
			plan: CompanyPlan::Free,
			max_drivers: 1,
			is_active: true,
			created_at: now,
			updated_at: now,
		}
	}
}

/// Partial update of a company. `None` leaves the column unchanged.
#[derive(Debug, Clone, Default)]
pub struct CompanyUpdate {
	pub name: Option<String>,
	pub business_type: Option<String>,
	pub phone: Option<String>,
	pub email: Option<String>,
	pub address: Option<String>,
	pub logo_url: Option<String>,
}

impl CompanyUpdate {
	pub fn is_empty(&self) -> bool {
		self.name.is_none()
			&& self.business_type.is_none()
			&& self.phone.is_none()
			&& self.email.is_none()
			&& self.address.is_none()
			&& self.logo_url.is_none()
	}
}

/// Filters for the admin company listing.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
	/// Case-insensitive substring of name or email.
	pub search: Option<String>,
	pub is_active: Option<bool>,
	pub plan: Option<CompanyPlan>,
	pub limit: i64,
	pub offset: i64,
}

/// A company with its headline counts.
#[derive(Debug, Clone, Serialize)]
pub struct CompanySummary {
	pub company: Company,
	pub drivers_count: i64,
	pub deliveries_count: i64,
}

/// A driver employed by a company. The id is the driver's user id.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Driver {
	pub id: UserId,
	pub company_id: CompanyId,
	pub driver_code: Option<String>,
	pub vehicle_type: VehicleType,
	pub license_plate: Option<String>,
	pub is_active: bool,
	pub is_available: bool,
	pub current_lat: Option<f64>,
	pub current_lng: Option<f64>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A driver joined with the display fields of its profile.
#[derive(Debug, Clone, Serialize)]
pub struct DriverWithProfile {
	pub driver: Driver,
	pub full_name: Option<String>,
	pub email: Option<String>,
	pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
	pub id: DeliveryId,
	pub company_id: CompanyId,
	pub driver_id: Option<UserId>,
	pub route_id: Option<RouteId>,
	pub customer_name: String,
	pub customer_phone: Option<String>,
	pub customer_email: Option<String>,
	pub pickup_address: Option<String>,
	pub delivery_address: String,
	pub status: DeliveryStatus,
	pub priority: DeliveryPriority,
	pub notes: Option<String>,
	pub scheduled_at: Option<DateTime<Utc>>,
	pub completed_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a delivery.
#[derive(Debug, Clone)]
pub struct NewDelivery {
	pub company_id: CompanyId,
	pub driver_id: Option<UserId>,
	pub route_id: Option<RouteId>,
	pub customer_name: String,
	pub customer_phone: Option<String>,
	pub customer_email: Option<String>,
	pub pickup_address: Option<String>,
	pub delivery_address: String,
	pub priority: DeliveryPriority,
	pub notes: Option<String>,
	pub scheduled_at: Option<DateTime<Utc>>,
}

impl NewDelivery {
	/// Assigned when created with a driver, pending otherwise.
	pub fn initial_status(&self) -> DeliveryStatus {
		if self.driver_id.is_some() {
			DeliveryStatus::Assigned
		} else {
			DeliveryStatus::Pending
		}
	}
}

/// A planned run for one driver.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
	pub id: RouteId,
	pub company_id: CompanyId,
	pub driver_id: Option<UserId>,
	pub name: String,
	pub status: RouteStatus,
	pub scheduled_date: Option<NaiveDate>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

/// A customer notification about a delivery.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
	pub id: NotificationId,
	pub company_id: CompanyId,
	pub delivery_id: Option<DeliveryId>,
	pub channel: NotificationChannel,
	pub recipient: String,
	pub message: String,
	pub status: NotificationStatus,
	pub sent_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
}

/// A signed-in session. Only the token hash is stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
	pub token_hash: String,
	pub user_id: UserId,
	pub email: String,
	pub expires_at: DateTime<Utc>,
	pub created_at: DateTime<Utc>,
}

/// Record of a redeemed invitation nonce.
#[derive(Debug, Clone, PartialEq)]
pub struct InviteRedemption {
	pub nonce: String,
	pub company_id: CompanyId,
	pub redeemed_by: UserId,
	pub redeemed_at: DateTime<Utc>,
}

/// Count of deliveries per status, in declaration order. Missing statuses count zero.
pub type StatusCounts = Vec<(DeliveryStatus, i64)>;

/// Platform-wide figures for the admin overview.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlatformStats {
	pub total_companies: i64,
	pub active_companies: i64,
	pub total_drivers: i64,
	pub total_deliveries: i64,
	pub total_routes: i64,
	pub new_companies_last_30_days: i64,
	pub deliveries_today: i64,
	pub deliveries_by_status: StatusCounts,
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	#[test]
	fn text_enums_parse_what_they_print() {
		for status in DeliveryStatus::all() {
			assert_eq!(DeliveryStatus::from_str(status.as_str()), Ok(*status));
		}
		assert_eq!(DeliveryStatus::InTransit.as_str(), "in_transit");
		assert!(DeliveryStatus::from_str("IN_TRANSIT").is_err());
	}

	#[test]
	fn serde_uses_stored_text() {
		assert_eq!(
			serde_json::to_string(&RouteStatus::InProgress).unwrap(),
			"\"in_progress\""
		);
		let plan: CompanyPlan = serde_json::from_str("\"enterprise\"").unwrap();
		assert_eq!(plan, CompanyPlan::Enterprise);
	}

	#[test]
	fn new_company_defaults() {
		let owner = UserId::new("U1");
		let company = Company::new(&owner, "Acme");
		assert_eq!(company.id.as_str(), "U1");
		assert_eq!(company.plan, CompanyPlan::Free);
		assert_eq!(company.max_drivers, 1);
		assert_eq!(company.business_type, "otro");
		assert!(company.is_active);
	}

	#[test]
	fn new_delivery_status_depends_on_driver() {
		let mut delivery = NewDelivery {
			company_id: CompanyId::new("C1"),
			driver_id: None,
			route_id: None,
			customer_name: "Ana".to_string(),
			customer_phone: None,
			customer_email: None,
			pickup_address: None,
			delivery_address: "Calle 1".to_string(),
			priority: DeliveryPriority::default(),
			notes: None,
			scheduled_at: None,
		};
		assert_eq!(delivery.initial_status(), DeliveryStatus::Pending);
		delivery.driver_id = Some(UserId::new("D1"));
		assert_eq!(delivery.initial_status(), DeliveryStatus::Assigned);
	}

	#[test]
	fn active_routes() {
		assert!(RouteStatus::Planned.is_active());
		assert!(RouteStatus::InProgress.is_active());
		assert!(!RouteStatus::Completed.is_active());
	}
}
