// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::{DateTime, Utc};
use fleetdesk_server_db::{Delivery, DeliveryPriority, DeliveryStatus, StatusCounts};
use serde::{Deserialize, Serialize};

#[cfg(feature = "openapi")]
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeliveryResponse {
	pub id: String,
	pub company_id: String,
	pub driver_id: Option<String>,
	pub route_id: Option<String>,
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

impl From<Delivery> for DeliveryResponse {
	fn from(d: Delivery) -> Self {
		Self {
			id: d.id.into_inner(),
			company_id: d.company_id.into_inner(),
			driver_id: d.driver_id.map(|id| id.into_inner()),
			route_id: d.route_id.map(|id| id.into_inner()),
			customer_name: d.customer_name,
			customer_phone: d.customer_phone,
			customer_email: d.customer_email,
			pickup_address: d.pickup_address,
			delivery_address: d.delivery_address,
			status: d.status,
			priority: d.priority,
			notes: d.notes,
			scheduled_at: d.scheduled_at,
			completed_at: d.completed_at,
			created_at: d.created_at,
			updated_at: d.updated_at,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct ListDeliveriesResponse {
	pub deliveries: Vec<DeliveryResponse>,
}

/// Query parameters for listing a company's deliveries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(IntoParams))]
pub struct ListDeliveriesParams {
	pub status: Option<DeliveryStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct CreateDeliveryRequest {
	pub customer_name: String,
	pub customer_phone: Option<String>,
	pub customer_email: Option<String>,
	pub pickup_address: Option<String>,
	pub delivery_address: String,
	#[serde(default)]
	pub priority: DeliveryPriority,
	pub notes: Option<String>,
	pub scheduled_at: Option<DateTime<Utc>>,
	/// Assign at creation. Must be a driver of the same company.
	pub driver_id: Option<String>,
	pub route_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct UpdateDeliveryStatusRequest {
	pub status: DeliveryStatus,
}

/// Number of deliveries in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct StatusCount {
	pub status: DeliveryStatus,
	pub count: i64,
}

pub fn status_counts(counts: StatusCounts) -> Vec<StatusCount> {
	counts
		.into_iter()
		.map(|(status, count)| StatusCount { status, count })
		.collect()
}

/// Error response for delivery endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(ToSchema))]
pub struct DeliveryErrorResponse {
	pub error: String,
	pub message: String,
}
