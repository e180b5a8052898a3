// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery tests: creation is for managers of the tenant, drivers only see
//! and move their own deliveries.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn managers_create_deliveries_in_their_tenant() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let a = format!("/api/companies/{}/deliveries", f.company_a.id());
	let b = format!("/api/companies/{}/deliveries", f.company_b.id());
	let parcel = json!({ "customer_name": "Dana", "delivery_address": "5 Mill Lane" });

	let cases = vec![
		AuthzCase {
			name: "driver_cannot_create",
			method: Method::POST,
			path: a.clone(),
			user: Some(f.company_a.driver.clone()),
			body: Some(parcel.clone()),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner_cannot_create_in_other_company",
			method: Method::POST,
			path: b.clone(),
			user: Some(f.company_a.owner.clone()),
			body: Some(parcel.clone()),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "missing_address",
			method: Method::POST,
			path: a.clone(),
			user: Some(f.company_a.owner.clone()),
			body: Some(json!({ "customer_name": "Dana", "delivery_address": "" })),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "driver_of_other_company",
			method: Method::POST,
			path: a.clone(),
			user: Some(f.company_a.owner.clone()),
			body: Some(json!({
				"customer_name": "Dana",
				"delivery_address": "5 Mill Lane",
				"driver_id": f.company_b.driver.id().to_string(),
			})),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_creates_anywhere",
			method: Method::POST,
			path: b,
			user: Some(f.admin.clone()),
			body: Some(parcel),
			expected_status: StatusCode::CREATED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn initial_status_follows_driver_assignment() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/companies/{}/deliveries", f.company_a.id());

	let body = body_json(
		app
			.post(
				&path,
				Some(&f.company_a.owner),
				json!({ "customer_name": "Eli", "delivery_address": "9 Quay", "priority": "alta" }),
			)
			.await,
	)
	.await;
	assert_eq!(body["status"], "pending");
	assert_eq!(body["priority"], "alta");
	assert!(body["driver_id"].is_null());

	let response = app
		.post(
			&path,
			Some(&f.company_a.owner),
			json!({
				"customer_name": "Fay",
				"delivery_address": "10 Quay",
				"driver_id": f.company_a.driver.id().to_string(),
			}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let body = body_json(response).await;
	assert_eq!(body["status"], "assigned");
	assert_eq!(body["priority"], "media");
}

#[tokio::test]
async fn drivers_only_list_their_own_deliveries() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let path = format!("/api/companies/{}/deliveries", f.company_a.id());

	let response = app
		.post(
			&path,
			Some(&f.company_a.owner),
			json!({ "customer_name": "Gus", "delivery_address": "1 Pier" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);

	let body = body_json(app.get(&path, Some(&f.company_a.owner)).await).await;
	assert_eq!(body["deliveries"].as_array().map(Vec::len), Some(2));

	let body = body_json(app.get(&path, Some(&f.company_a.driver)).await).await;
	let deliveries = body["deliveries"].as_array().cloned().unwrap_or_default();
	assert_eq!(deliveries.len(), 1);
	assert_eq!(deliveries[0]["id"], f.company_a.delivery.id.to_string());

	let body = body_json(
		app
			.get(&format!("{path}?status=pending"), Some(&f.company_a.owner))
			.await,
	)
	.await;
	assert_eq!(body["deliveries"].as_array().map(Vec::len), Some(1));
	assert_eq!(body["deliveries"][0]["customer_name"], "Gus");
}

#[tokio::test]
async fn status_updates_respect_tenant_and_assignment() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let own = format!("/api/deliveries/{}/status", f.company_a.delivery.id);

	let created = body_json(
		app
			.post(
				&format!("/api/companies/{}/deliveries", f.company_a.id()),
				Some(&f.company_a.owner),
				json!({ "customer_name": "Hal", "delivery_address": "3 Wharf" }),
			)
			.await,
	)
	.await;
	let unassigned = format!(
		"/api/deliveries/{}/status",
		created["id"].as_str().unwrap_or_default()
	);

	let cases = vec![
		AuthzCase {
			name: "driver_of_other_company",
			method: Method::PATCH,
			path: own.clone(),
			user: Some(f.company_b.driver.clone()),
			body: Some(json!({ "status": "failed" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner_of_other_company",
			method: Method::PATCH,
			path: own.clone(),
			user: Some(f.company_b.owner.clone()),
			body: Some(json!({ "status": "cancelled" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "driver_not_assigned",
			method: Method::PATCH,
			path: unassigned,
			user: Some(f.company_a.driver.clone()),
			body: Some(json!({ "status": "in_transit" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "unknown_delivery",
			method: Method::PATCH,
			path: "/api/deliveries/no-such-delivery/status".to_string(),
			user: Some(f.admin.clone()),
			body: Some(json!({ "status": "failed" })),
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "assigned_driver",
			method: Method::PATCH,
			path: own.clone(),
			user: Some(f.company_a.driver.clone()),
			body: Some(json!({ "status": "in_transit" })),
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;

	let response = app
		.patch(&own, Some(&f.company_a.owner), json!({ "status": "delivered" }))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["status"], "delivered");
	assert!(body["completed_at"].is_string());
}
