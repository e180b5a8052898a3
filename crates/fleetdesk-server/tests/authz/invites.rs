// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation tests: issuing is tenant-scoped, redemption is single-use and
//! the tenant always comes from the signed code.

use axum::http::{Method, StatusCode};
use serde_json::json;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

async fn issue_code(app: &TestApp) -> String {
	let f = &app.fixtures;
	let response = app
		.post(
			&format!("/api/companies/{}/invites", f.company_a.id()),
			Some(&f.company_a.owner),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let body = body_json(response).await;
	assert!(body["expires_at"].is_string());
	body["code"].as_str().unwrap_or_default().to_string()
}

fn join_body(code: &str, full_name: &str) -> serde_json::Value {
	json!({
		"code": code,
		"vehicle_type": "bike",
		"full_name": full_name,
		"license_plate": "B-42",
	})
}

#[tokio::test]
async fn only_managers_of_the_tenant_issue_invites() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let a = format!("/api/companies/{}/invites", f.company_a.id());

	let cases = vec![
		AuthzCase {
			name: "driver_cannot_invite",
			method: Method::POST,
			path: a.clone(),
			user: Some(f.company_a.driver.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "owner_cannot_invite_to_other_company",
			method: Method::POST,
			path: a.clone(),
			user: Some(f.company_b.owner.clone()),
			body: None,
			expected_status: StatusCode::FORBIDDEN,
		},
		AuthzCase {
			name: "anonymous_cannot_invite",
			method: Method::POST,
			path: a.clone(),
			user: None,
			body: None,
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "admin_invites_anywhere",
			method: Method::POST,
			path: a,
			user: Some(f.admin.clone()),
			body: None,
			expected_status: StatusCode::CREATED,
		},
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn code_validation_is_public() {
	let app = TestApp::new().await;
	let code = issue_code(&app).await;

	let response = app
		.post("/api/drivers/validate-code", None, json!({ "code": code }))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["valid"], true);
	assert_eq!(body["company"]["name"], "Alpha Couriers");
	assert_eq!(
		body["company"]["id"],
		app.fixtures.company_a.id().to_string()
	);

	let response = app
		.post(
			"/api/drivers/validate-code",
			None,
			json!({ "code": "definitely-not-a-code" }),
		)
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
	let body = body_json(response).await;
	assert_eq!(body["valid"], false);
	assert!(body.get("company").is_none());
}

#[tokio::test]
async fn tampered_code_is_rejected() {
	let app = TestApp::new().await;
	let code = issue_code(&app).await;

	let mut tampered = code.clone();
	let last = tampered.pop().unwrap_or('0');
	tampered.push(if last == '0' { '1' } else { '0' });

	let response = app
		.post("/api/drivers/validate-code", None, json!({ "code": tampered }))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn newcomer_joins_with_a_code_once() {
	let app = TestApp::new().await;
	let code = issue_code(&app).await;
	let first = app.fixtures.newcomer.clone();
	let second = app.sign_in("second@fleetdesk.test").await;

	let response = app
		.post("/api/drivers/join", Some(&first), join_body(&code, "Ivy Rider"))
		.await;
	assert_eq!(response.status(), StatusCode::CREATED);
	let body = body_json(response).await;
	assert_eq!(body["company"]["name"], "Alpha Couriers");
	assert_eq!(body["driver"]["vehicle_type"], "bike");
	assert_eq!(
		body["driver"]["company_id"],
		app.fixtures.company_a.id().to_string()
	);

	let me = body_json(app.get("/api/me", Some(&first)).await).await;
	assert_eq!(me["profile"]["role"], "driver");
	assert_eq!(me["home_path"], "/driver");

	let response = app
		.post("/api/drivers/join", Some(&second), join_body(&code, "Jon Rider"))
		.await;
	assert_eq!(response.status(), StatusCode::CONFLICT);
	let body = body_json(response).await;
	assert_eq!(body["error"], "code_redeemed");

	let response = app
		.post("/api/drivers/validate-code", None, json!({ "code": code }))
		.await;
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);

	// The first driver is now listed by the company
	let f = &app.fixtures;
	let body = body_json(
		app
			.get(
				&format!("/api/companies/{}/drivers", f.company_a.id()),
				Some(&f.company_a.owner),
			)
			.await,
	)
	.await;
	assert_eq!(body["drivers"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn registered_accounts_cannot_join() {
	let app = TestApp::new().await;
	let code = issue_code(&app).await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase {
			name: "driver_already_registered",
			method: Method::POST,
			path: "/api/drivers/join".to_string(),
			user: Some(f.company_b.driver.clone()),
			body: Some(join_body(&code, "Switcher")),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "owner_already_registered",
			method: Method::POST,
			path: "/api/drivers/join".to_string(),
			user: Some(f.company_b.owner.clone()),
			body: Some(join_body(&code, "Owner")),
			expected_status: StatusCode::CONFLICT,
		},
		AuthzCase {
			name: "anonymous_join",
			method: Method::POST,
			path: "/api/drivers/join".to_string(),
			user: None,
			body: Some(join_body(&code, "Ghost")),
			expected_status: StatusCode::UNAUTHORIZED,
		},
		AuthzCase {
			name: "blank_name",
			method: Method::POST,
			path: "/api/drivers/join".to_string(),
			user: Some(f.newcomer.clone()),
			body: Some(join_body(&code, "  ")),
			expected_status: StatusCode::BAD_REQUEST,
		},
		AuthzCase {
			name: "bad_code",
			method: Method::POST,
			path: "/api/drivers/join".to_string(),
			user: Some(f.newcomer.clone()),
			body: Some(join_body("nope", "Kim")),
			expected_status: StatusCode::BAD_REQUEST,
		},
	];

	run_authz_cases(&app, &cases).await;

	// None of the refusals burned the code
	let response = app
		.post("/api/drivers/validate-code", None, json!({ "code": code }))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn inactive_company_cannot_invite_or_accept_drivers() {
	let app = TestApp::new().await;
	let code = issue_code(&app).await;
	let f = &app.fixtures;

	let response = app
		.post(
			&format!("/api/admin/companies/{}/toggle-status", f.company_a.id()),
			Some(&f.admin),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::OK);

	let response = app
		.post(
			&format!("/api/companies/{}/invites", f.company_a.id()),
			Some(&f.company_a.owner),
			json!({}),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let response = app
		.post("/api/drivers/validate-code", None, json!({ "code": code }))
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);

	let response = app
		.post(
			"/api/drivers/join",
			Some(&f.newcomer),
			join_body(&code, "Lou"),
		)
		.await;
	assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
