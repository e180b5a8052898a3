// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant isolation tests.
//!
//! Key invariant: company and driver profiles only ever reach their own
//! company; admins reach every company.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn company_reads_are_scoped_to_the_tenant() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let a = f.company_a.id().to_string();
	let b = f.company_b.id().to_string();

	let mut cases = Vec::new();
	for suffix in ["", "/drivers", "/deliveries", "/routes", "/notifications"] {
		let own = format!("/api/companies/{a}{suffix}");
		let other = format!("/api/companies/{b}{suffix}");
		cases.extend([
			AuthzCase {
				name: "owner_reads_own_company",
				method: Method::GET,
				path: own.clone(),
				user: Some(f.company_a.owner.clone()),
				body: None,
				expected_status: StatusCode::OK,
			},
			AuthzCase {
				name: "driver_reads_own_company",
				method: Method::GET,
				path: own.clone(),
				user: Some(f.company_a.driver.clone()),
				body: None,
				expected_status: StatusCode::OK,
			},
			AuthzCase {
				name: "admin_reads_any_company",
				method: Method::GET,
				path: other.clone(),
				user: Some(f.admin.clone()),
				body: None,
				expected_status: StatusCode::OK,
			},
			AuthzCase {
				name: "owner_cannot_read_other_company",
				method: Method::GET,
				path: other.clone(),
				user: Some(f.company_a.owner.clone()),
				body: None,
				expected_status: StatusCode::FORBIDDEN,
			},
			AuthzCase {
				name: "driver_cannot_read_other_company",
				method: Method::GET,
				path: other.clone(),
				user: Some(f.company_a.driver.clone()),
				body: None,
				expected_status: StatusCode::FORBIDDEN,
			},
			AuthzCase {
				name: "profile_less_cannot_read_company",
				method: Method::GET,
				path: own.clone(),
				user: Some(f.newcomer.clone()),
				body: None,
				expected_status: StatusCode::FORBIDDEN,
			},
			AuthzCase {
				name: "anonymous_cannot_read_company",
				method: Method::GET,
				path: own,
				user: None,
				body: None,
				expected_status: StatusCode::UNAUTHORIZED,
			},
		]);
	}

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn tenant_denial_does_not_leak_the_company() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let b = f.company_b.id().to_string();

	let response = app
		.get(&format!("/api/companies/{b}"), Some(&f.company_a.owner))
		.await;
	assert_eq!(response.status(), StatusCode::FORBIDDEN);
	let body = body_json(response).await;
	assert!(!body.to_string().contains(&b));
	assert!(!body.to_string().contains("Bravo"));
}

#[tokio::test]
async fn only_managers_edit_a_company() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let a = format!("/api/companies/{}", f.company_a.id());
	let b = format!("/api/companies/{}", f.company_b.id());

	let cases = vec![
		AuthzCase {
			name: "driver_cannot_edit_own_company",
			method: Method::PATCH,
			path: a.clone(),
			user: Some(f.company_a.driver.clone()),
			body: Some(json!({ "name": "Driver Co" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner_cannot_edit_other_company",
			method: Method::PATCH,
			path: b.clone(),
			user: Some(f.company_a.owner.clone()),
			body: Some(json!({ "name": "Hostile Takeover" })),
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "blank_name_rejected",
			method: Method::PATCH,
			path: a.clone(),
			user: Some(f.company_a.owner.clone()),
			body: Some(json!({ "name": "   " })),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "admin_edits_any_company",
			method: Method::PATCH,
			path: b,
			user: Some(f.admin.clone()),
			body: Some(json!({ "phone": "+34 600 000 000" })),
			expected_status: StatusCode::OK,
		},
	];

	run_authz_cases(&app, &cases).await;

	let response = app
		.patch(
			&a,
			Some(&f.company_a.owner),
			json!({ "name": "  Alpha Express  ", "address": "2 Dock Street" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["name"], "Alpha Express");
	assert_eq!(body["address"], "2 Dock Street");
	assert_eq!(body["plan"], "free");
}

#[tokio::test]
async fn newcomer_sets_up_a_company() {
	let app = TestApp::new().await;
	let newcomer = app.fixtures.newcomer.clone();

	let response = app
		.post(
			"/api/companies/setup",
			Some(&newcomer),
			json!({ "company_name": "Charlie Cargo", "full_name": "Cara Charlie" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["name"], "Charlie Cargo");
	assert_eq!(body["business_type"], "otro");
	assert_eq!(body["email"], "newcomer@fleetdesk.test");
	let company_id = body["id"].as_str().unwrap_or_default().to_string();

	let me = body_json(app.get("/api/me", Some(&newcomer)).await).await;
	assert_eq!(me["profile"]["role"], "company");
	assert_eq!(me["profile"]["company_id"], company_id.as_str());
	assert_eq!(me["home_path"], "/dashboard");

	let response = app
		.get(&format!("/api/companies/{company_id}"), Some(&newcomer))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn setup_is_refused_for_other_roles_and_blank_names() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase {
			name: "driver_cannot_become_company",
			method: Method::POST,
			path: "/api/companies/setup".to_string(),
			user: Some(f.company_a.driver.clone()),
			body: Some(json!({ "company_name": "Side Hustle", "full_name": "D" })),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "admin_cannot_become_company",
			method: Method::POST,
			path: "/api/companies/setup".to_string(),
			user: Some(f.admin.clone()),
			body: Some(json!({ "company_name": "Admin Co", "full_name": "A" })),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "blank_company_name",
			method: Method::POST,
			path: "/api/companies/setup".to_string(),
			user: Some(f.newcomer.clone()),
			body: Some(json!({ "company_name": " ", "full_name": "N" })),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "anonymous_setup",
			method: Method::POST,
			path: "/api/companies/setup".to_string(),
			user: None,
			body: Some(json!({ "company_name": "Ghost Co", "full_name": "G" })),
			expected_status: StatusCode::UNAUTHORIZED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn driver_list_includes_profile_names() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(
		app
			.get(
				&format!("/api/companies/{}/drivers", f.company_b.id()),
				Some(&f.company_b.owner),
			)
			.await,
	)
	.await;
	assert_eq!(body["drivers"].as_array().map(Vec::len), Some(1));
	assert_eq!(body["drivers"][0]["full_name"], "Bravo Freight Driver");
	assert_eq!(body["drivers"][0]["vehicle_type"], "van");
}
