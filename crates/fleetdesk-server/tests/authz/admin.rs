// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authorization tests for admin routes.
//!
//! Key invariant: ALL admin routes require a profile with the admin role.

use axum::http::{Method, StatusCode};

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn admin_routes_reject_everyone_but_admins() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let company_path = format!("/api/admin/companies/{}", f.company_a.id());
	let toggle_path = format!("{company_path}/toggle-status");

	let mut cases = Vec::new();
	for path in ["/api/admin/companies", "/api/admin/stats", company_path.as_str()] {
		cases.extend([
			AuthzCase {
				name: "anonymous",
				method: Method::GET,
				path: path.to_string(),
				user: None,
				body: None,
				expected_status: StatusCode::UNAUTHORIZED,
			},
			AuthzCase {
				name: "company_owner",
				method: Method::GET,
				path: path.to_string(),
				user: Some(f.company_a.owner.clone()),
				body: None,
				expected_status: StatusCode::FORBIDDEN,
			},
			AuthzCase {
				name: "driver",
				method: Method::GET,
				path: path.to_string(),
				user: Some(f.company_a.driver.clone()),
				body: None,
				expected_status: StatusCode::FORBIDDEN,
			},
			AuthzCase {
				name: "profile_less",
				method: Method::GET,
				path: path.to_string(),
				user: Some(f.newcomer.clone()),
				body: None,
				expected_status: StatusCode::FORBIDDEN,
			},
		]);
	}
	cases.push(AuthzCase {
		name: "owner_cannot_toggle_own_company",
		method: Method::POST,
		path: toggle_path,
		user: Some(f.company_a.owner.clone()),
		body: None,
		expected_status: StatusCode::FORBIDDEN,
	});

	run_authz_cases(&app, &cases).await;

	// The rejected toggle left the company alone
	let company = app
		.state
		.company_repo
		.get_company(f.company_a.id())
		.await
		.unwrap()
		.unwrap();
	assert!(company.is_active);
}

#[tokio::test]
async fn admin_lists_every_company() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let response = app.get("/api/admin/companies", Some(admin)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["companies"].as_array().map(Vec::len), Some(2));
	assert_eq!(body["pagination"]["total"], 2);
	assert_eq!(body["pagination"]["page"], 1);
	assert_eq!(body["pagination"]["total_pages"], 1);
	for company in body["companies"].as_array().into_iter().flatten() {
		assert_eq!(company["drivers_count"], 1);
		assert_eq!(company["deliveries_count"], 1);
	}
}

#[tokio::test]
async fn admin_filters_companies() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;

	let body = body_json(app.get("/api/admin/companies?search=ALPHA", Some(admin)).await).await;
	assert_eq!(body["pagination"]["total"], 1);
	assert_eq!(body["companies"][0]["name"], "Alpha Couriers");

	let body = body_json(
		app
			.get("/api/admin/companies?page=2&pageSize=1", Some(admin))
			.await,
	)
	.await;
	assert_eq!(body["companies"].as_array().map(Vec::len), Some(1));
	assert_eq!(body["pagination"]["total_pages"], 2);
}

#[tokio::test]
async fn admin_toggles_company_status() {
	let app = TestApp::new().await;
	let admin = &app.fixtures.admin;
	let path = format!(
		"/api/admin/companies/{}/toggle-status",
		app.fixtures.company_b.id()
	);

	let response = app.post(&path, Some(admin), serde_json::json!({})).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["is_active"], false);
	assert_eq!(body["message"], "Company deactivated");

	let body = body_json(
		app
			.get("/api/admin/companies?status=inactive", Some(admin))
			.await,
	)
	.await;
	assert_eq!(body["pagination"]["total"], 1);
	assert_eq!(body["companies"][0]["name"], "Bravo Freight");

	let body = body_json(app.post(&path, Some(admin), serde_json::json!({})).await).await;
	assert_eq!(body["is_active"], true);
	assert_eq!(body["message"], "Company activated");
}

#[tokio::test]
async fn admin_sees_company_detail() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.get(
			&format!("/api/admin/companies/{}", f.company_a.id()),
			Some(&f.admin),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["company"]["name"], "Alpha Couriers");
	assert_eq!(body["owner"]["role"], "company");
	assert_eq!(body["drivers"].as_array().map(Vec::len), Some(1));
	assert_eq!(
		body["recent_deliveries"][0]["id"],
		f.company_a.delivery.id.to_string()
	);
}

#[tokio::test]
async fn unknown_company_is_not_found() {
	let app = TestApp::new().await;
	let admin = app.fixtures.admin.clone();

	let cases = vec![
		AuthzCase {
			name: "detail_of_unknown_company",
			method: Method::GET,
			path: "/api/admin/companies/no-such-company".to_string(),
			user: Some(admin.clone()),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
		AuthzCase {
			name: "toggle_unknown_company",
			method: Method::POST,
			path: "/api/admin/companies/no-such-company/toggle-status".to_string(),
			user: Some(admin),
			body: None,
			expected_status: StatusCode::NOT_FOUND,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn admin_reads_platform_stats() {
	let app = TestApp::new().await;

	let response = app.get("/api/admin/stats", Some(&app.fixtures.admin)).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["totals"]["companies"], 2);
	assert_eq!(body["totals"]["active_companies"], 2);
	assert_eq!(body["totals"]["drivers"], 2);
	assert_eq!(body["totals"]["deliveries"], 2);
}
