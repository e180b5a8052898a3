// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response types for the FleetDesk HTTP API.
//!
//! Identifiers cross the wire as plain strings and enums as their stored text.
//! Conversions from the database records live next to each response type.

pub mod admin;
pub mod auth;
pub mod companies;
pub mod deliveries;
pub mod drivers;
pub mod health;
pub mod invites;

pub use admin::{
	AdminCompanyDetailResponse, AdminCompanySummary, AdminErrorResponse, ListCompaniesParams,
	ListCompaniesResponse, PaginationResponse, PlatformStatsResponse, PlatformTotals,
	RecentActivity, ToggleStatusResponse,
};
pub use auth::{AuthErrorResponse, LogoutResponse, MeResponse, ProfileResponse};
pub use companies::{
	CompanyErrorResponse, CompanyResponse, ListNotificationsResponse, ListRoutesResponse,
	NotificationResponse, RouteResponse, SetupCompanyRequest, UpdateCompanyRequest,
};
pub use deliveries::{
	status_counts, CreateDeliveryRequest, DeliveryErrorResponse, DeliveryResponse,
	ListDeliveriesParams, ListDeliveriesResponse, StatusCount, UpdateDeliveryStatusRequest,
};
pub use drivers::{
	DriverErrorResponse, DriverResponse, InviteCompany, JoinCompanyRequest, JoinCompanyResponse,
	ListDriversResponse, ValidateCodeRequest, ValidateCodeResponse,
};
pub use health::{DatabaseHealth, HealthResponse, HealthStatus};
pub use invites::{CreateInviteResponse, InviteErrorResponse};
