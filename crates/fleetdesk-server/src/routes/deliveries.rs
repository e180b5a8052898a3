// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Delivery HTTP handlers.
//!
//! Drivers only ever see and update the deliveries assigned to them, even
//! inside their own company.

use axum::{
	extract::{Path, Query, State},
	http::StatusCode,
	response::IntoResponse,
	Json,
};
use fleetdesk_server_auth::{CompanyId, DeliveryId, Role, RouteId, UserId};
use fleetdesk_server_db::{DeliveryFilter, NewDelivery};

pub use fleetdesk_server_api::deliveries::{
	CreateDeliveryRequest, DeliveryErrorResponse, DeliveryResponse, ListDeliveriesParams,
	ListDeliveriesResponse, UpdateDeliveryStatusRequest,
};

use crate::{
	api::AppState,
	api_response::{access_denied, bad_request, forbidden, internal_error, not_found},
	auth_middleware::RequireAuth,
	routes::companies::{non_blank, COMPANY_MANAGERS},
};

#[utoipa::path(
    get,
    path = "/api/companies/{id}/deliveries",
    params(("id" = String, Path, description = "Company id"), ListDeliveriesParams),
    responses(
        (status = 200, description = "Deliveries, newest first", body = ListDeliveriesResponse),
        (status = 401, description = "Not authenticated", body = DeliveryErrorResponse),
        (status = 403, description = "Not a member of this company", body = DeliveryErrorResponse)
    ),
    tag = "deliveries"
)]
/// GET /api/companies/{id}/deliveries - List deliveries, optionally by status.
#[tracing::instrument(
	skip(state, params),
	fields(user_id = %current_user.identity.user_id, company_id = %id, status = ?params.status)
)]
pub async fn list_deliveries(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Query(params): Query<ListDeliveriesParams>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	let profile = match current_user.require_tenant(&company_id) {
		Ok(profile) => profile,
		Err(e) => return access_denied::<DeliveryErrorResponse>(&e).into_response(),
	};

	let filter = DeliveryFilter {
		status: params.status,
		driver_id: (profile.role == Role::Driver).then(|| profile.id.clone()),
		limit: None,
	};

	match state
		.delivery_repo
		.list_company_deliveries(&company_id, &filter)
		.await
	{
		Ok(deliveries) => (
			StatusCode::OK,
			Json(ListDeliveriesResponse {
				deliveries: deliveries.into_iter().map(DeliveryResponse::from).collect(),
			}),
		)
			.into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to list deliveries");
			internal_error::<DeliveryErrorResponse>("Failed to list deliveries").into_response()
		}
	}
}

#[utoipa::path(
    post,
    path = "/api/companies/{id}/deliveries",
    params(("id" = String, Path, description = "Company id")),
    request_body = CreateDeliveryRequest,
    responses(
        (status = 201, description = "Delivery created", body = DeliveryResponse),
        (status = 400, description = "Missing fields, or driver or route of another company", body = DeliveryErrorResponse),
        (status = 401, description = "Not authenticated", body = DeliveryErrorResponse),
        (status = 403, description = "Not allowed to create deliveries here", body = DeliveryErrorResponse),
        (status = 404, description = "Company not found", body = DeliveryErrorResponse)
    ),
    tag = "deliveries"
)]
/// POST /api/companies/{id}/deliveries - Create a delivery.
///
/// The delivery starts `assigned` when a driver is given, `pending` otherwise.
#[tracing::instrument(skip(state, payload), fields(user_id = %current_user.identity.user_id, company_id = %id))]
pub async fn create_delivery(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<CreateDeliveryRequest>,
) -> impl IntoResponse {
	let company_id = CompanyId::new(id);
	if let Err(e) = current_user
		.require_tenant(&company_id)
		.and_then(|_| current_user.require_role(COMPANY_MANAGERS))
	{
		return access_denied::<DeliveryErrorResponse>(&e).into_response();
	}

	let Some(customer_name) = non_blank(Some(payload.customer_name)) else {
		return bad_request::<DeliveryErrorResponse>("invalid_request", "Customer name is required")
			.into_response();
	};
	let Some(delivery_address) = non_blank(Some(payload.delivery_address)) else {
		return bad_request::<DeliveryErrorResponse>(
			"invalid_request",
			"Delivery address is required",
		)
		.into_response();
	};

	match state.company_repo.get_company(&company_id).await {
		Ok(Some(_)) => {}
		Ok(None) => return not_found::<DeliveryErrorResponse>("Company not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to load company");
			return internal_error::<DeliveryErrorResponse>("Failed to create delivery")
				.into_response();
		}
	}

	let driver_id = match non_blank(payload.driver_id) {
		None => None,
		Some(driver_id) => {
			let driver_id = UserId::new(driver_id);
			match state.driver_repo.get_driver(&driver_id).await {
				Ok(Some(driver)) if driver.company_id == company_id => Some(driver_id),
				Ok(_) => {
					tracing::info!(driver_id = %driver_id, "driver is not part of this company");
					return bad_request::<DeliveryErrorResponse>(
						"invalid_driver",
						"Driver does not belong to this company",
					)
					.into_response();
				}
				Err(e) => {
					tracing::error!(error = %e, "failed to load driver");
					return internal_error::<DeliveryErrorResponse>("Failed to create delivery")
						.into_response();
				}
			}
		}
	};

	let route_id = match non_blank(payload.route_id) {
		None => None,
		Some(route_id) => {
			let route_id = RouteId::new(route_id);
			match state.route_repo.get_route(&route_id).await {
				Ok(Some(route)) if route.company_id == company_id => Some(route_id),
				Ok(_) => {
					return bad_request::<DeliveryErrorResponse>(
						"invalid_route",
						"Route does not belong to this company",
					)
					.into_response();
				}
				Err(e) => {
					tracing::error!(error = %e, "failed to load route");
					return internal_error::<DeliveryErrorResponse>("Failed to create delivery")
						.into_response();
				}
			}
		}
	};

	let new_delivery = NewDelivery {
		company_id,
		driver_id,
		route_id,
		customer_name,
		customer_phone: non_blank(payload.customer_phone),
		customer_email: non_blank(payload.customer_email),
		pickup_address: non_blank(payload.pickup_address),
		delivery_address,
		priority: payload.priority,
		notes: non_blank(payload.notes),
		scheduled_at: payload.scheduled_at,
	};

	match state.delivery_repo.create_delivery(&new_delivery).await {
		Ok(delivery) => {
			tracing::info!(delivery_id = %delivery.id, status = %delivery.status, "delivery created");
			(StatusCode::CREATED, Json(DeliveryResponse::from(delivery))).into_response()
		}
		Err(e) => {
			tracing::error!(error = %e, "failed to create delivery");
			internal_error::<DeliveryErrorResponse>("Failed to create delivery").into_response()
		}
	}
}

#[utoipa::path(
    patch,
    path = "/api/deliveries/{id}/status",
    params(("id" = String, Path, description = "Delivery id")),
    request_body = UpdateDeliveryStatusRequest,
    responses(
        (status = 200, description = "Updated delivery", body = DeliveryResponse),
        (status = 401, description = "Not authenticated", body = DeliveryErrorResponse),
        (status = 403, description = "Delivery belongs to another company or driver", body = DeliveryErrorResponse),
        (status = 404, description = "Delivery not found", body = DeliveryErrorResponse)
    ),
    tag = "deliveries"
)]
/// PATCH /api/deliveries/{id}/status - Move a delivery through its lifecycle.
///
/// Marking a delivery `delivered` stamps its completion time.
#[tracing::instrument(
	skip(state, payload),
	fields(user_id = %current_user.identity.user_id, delivery_id = %id, status = %payload.status)
)]
pub async fn update_delivery_status(
	RequireAuth(current_user): RequireAuth,
	State(state): State<AppState>,
	Path(id): Path<String>,
	Json(payload): Json<UpdateDeliveryStatusRequest>,
) -> impl IntoResponse {
	let delivery_id = DeliveryId::new(id);

	let delivery = match state.delivery_repo.get_delivery(&delivery_id).await {
		Ok(Some(delivery)) => delivery,
		Ok(None) => return not_found::<DeliveryErrorResponse>("Delivery not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to load delivery");
			return internal_error::<DeliveryErrorResponse>("Failed to update delivery")
				.into_response();
		}
	};

	let profile = match current_user.require_tenant(&delivery.company_id) {
		Ok(profile) => profile,
		Err(e) => return access_denied::<DeliveryErrorResponse>(&e).into_response(),
	};

	if profile.role == Role::Driver && delivery.driver_id.as_ref() != Some(&profile.id) {
		tracing::info!("driver tried to update a delivery assigned to someone else");
		return forbidden::<DeliveryErrorResponse>("forbidden", "Insufficient permissions")
			.into_response();
	}

	let previous = delivery.status;
	match state
		.delivery_repo
		.update_status(&delivery_id, payload.status)
		.await
	{
		Ok(Some(delivery)) => {
			tracing::info!(from = %previous, "delivery status updated");
			(StatusCode::OK, Json(DeliveryResponse::from(delivery))).into_response()
		}
		Ok(None) => not_found::<DeliveryErrorResponse>("Delivery not found").into_response(),
		Err(e) => {
			tracing::error!(error = %e, "failed to update delivery status");
			internal_error::<DeliveryErrorResponse>("Failed to update delivery").into_response()
		}
	}
}
