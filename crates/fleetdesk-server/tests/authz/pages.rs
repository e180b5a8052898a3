// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Page gate tests.
//!
//! Key invariant: a page is only served when the decision engine allows it;
//! every other outcome is a `307` with the target in `Location`.

use axum::http::{header, StatusCode};
use chrono::Duration;
use fleetdesk_server_auth::{Identity, UserId};

use super::support::{body_json, location, TestApp, TestUser};

const ADMIN_PAGE: &str = "admin console";

async fn assert_redirect(app: &TestApp, path: &str, user: Option<&TestUser>, target: &str) {
	let response = app.get(path, user).await;
	assert_eq!(
		response.status(),
		StatusCode::TEMPORARY_REDIRECT,
		"{path} should redirect"
	);
	assert_eq!(location(&response), Some(target), "{path} redirect target");
}

async fn assert_served(app: &TestApp, path: &str, user: Option<&TestUser>) {
	let response = app.get(path, user).await;
	assert_eq!(response.status(), StatusCode::OK, "{path} should be served");
	assert!(location(&response).is_none());
}

#[tokio::test]
async fn anonymous_visitor_is_sent_to_login_with_return_path() {
	let app = TestApp::new().await;

	assert_redirect(&app, "/dashboard", None, "/login?redirectTo=%2Fdashboard").await;
	assert_redirect(
		&app,
		"/admin/companies",
		None,
		"/login?redirectTo=%2Fadmin%2Fcompanies",
	)
	.await;
	assert_redirect(&app, "/settings", None, "/login?redirectTo=%2Fsettings").await;
}

#[tokio::test]
async fn anonymous_visitor_sees_public_pages() {
	let app = TestApp::new().await;

	assert_served(&app, "/", None).await;
	assert_served(&app, "/login", None).await;
	assert_served(&app, "/register/driver", None).await;
}

#[tokio::test]
async fn signed_in_users_are_sent_home_from_public_pages() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	assert_redirect(&app, "/login", Some(&f.admin), "/admin").await;
	assert_redirect(&app, "/", Some(&f.company_a.owner), "/dashboard").await;
	assert_redirect(&app, "/register", Some(&f.company_a.driver), "/driver").await;
}

#[tokio::test]
async fn roles_reach_their_own_area() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	assert_served(&app, "/admin", Some(&f.admin)).await;
	assert_served(&app, "/dashboard/deliveries", Some(&f.company_a.owner)).await;
	assert_served(&app, "/driver", Some(&f.company_b.driver)).await;
	assert_served(&app, "/settings", Some(&f.company_b.driver)).await;
}

#[tokio::test]
async fn roles_are_sent_home_from_other_areas() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	assert_redirect(&app, "/admin", Some(&f.company_a.driver), "/driver").await;
	assert_redirect(&app, "/dashboard", Some(&f.company_a.driver), "/driver").await;
	assert_redirect(&app, "/admin/stats", Some(&f.company_a.owner), "/dashboard").await;
	assert_redirect(&app, "/driver", Some(&f.admin), "/admin").await;
}

#[tokio::test]
async fn disguised_scoped_paths_are_gated_like_plain_ones() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	app.write_page("admin/index.html", ADMIN_PAGE);
	app.write_page("dashboard/index.html", "company dashboard");

	for path in [
		"//admin/",
		"/%61dmin/",
		"//admin/index.html",
		"/./admin/",
		"/driver/../admin/",
		"/%2Fadmin/",
		"/%64ashboard",
	] {
		assert_redirect(&app, path, Some(&f.company_a.driver), "/driver").await;
	}
	assert_redirect(&app, "//dashboard/", Some(&f.admin), "/admin").await;
	assert_redirect(&app, "//admin/", None, "/login?redirectTo=%2Fadmin%2F").await;
}

#[tokio::test]
async fn disguised_paths_still_serve_the_right_role() {
	let app = TestApp::new().await;
	app.write_page("admin/index.html", ADMIN_PAGE);

	for path in ["//admin/", "/%61dmin/"] {
		let response = app.get(path, Some(&app.fixtures.admin)).await;
		assert_eq!(response.status(), StatusCode::OK, "{path}");
		let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
			.await
			.unwrap();
		assert_eq!(&bytes[..], ADMIN_PAGE.as_bytes(), "{path}");
	}
}

#[tokio::test]
async fn session_without_profile_goes_to_plain_login() {
	let app = TestApp::new().await;
	let newcomer = &app.fixtures.newcomer;

	assert_redirect(&app, "/dashboard", Some(newcomer), "/login").await;
	// No loop: the login page itself is served
	assert_served(&app, "/login", Some(newcomer)).await;
}

#[tokio::test]
async fn expired_session_counts_as_anonymous() {
	let app = TestApp::new().await;
	let identity = app.fixtures.company_a.owner.identity.clone();
	let (session_token, _) = app
		.state
		.session_repo
		.create_session(&identity, Duration::seconds(-60))
		.await
		.unwrap();
	let expired = TestUser {
		identity,
		session_token,
	};

	assert_redirect(&app, "/dashboard", Some(&expired), "/login?redirectTo=%2Fdashboard").await;
	assert_served(&app, "/login", Some(&expired)).await;
}

#[tokio::test]
async fn unknown_session_token_counts_as_anonymous() {
	let app = TestApp::new().await;
	let stranger = TestUser {
		identity: Identity::new(UserId::generate(), "stranger@fleetdesk.test"),
		session_token: "not-a-real-session".to_string(),
	};

	assert_redirect(&app, "/driver", Some(&stranger), "/login?redirectTo=%2Fdriver").await;
}

#[tokio::test]
async fn static_assets_skip_the_gate() {
	let app = TestApp::new().await;

	for path in ["/favicon.ico", "/_next/static/chunks/app.js", "/img/truck.png"] {
		let response = app.get(path, None).await;
		assert!(
			location(&response).is_none(),
			"{path} should not be redirected"
		);
	}
}

#[tokio::test]
async fn api_and_health_answer_without_redirects() {
	let app = TestApp::new().await;

	let response = app.get("/api/me", None).await;
	assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
	assert!(location(&response).is_none());

	let response = app.get("/health", None).await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn logout_ends_the_session() {
	let app = TestApp::new().await;
	let owner = app.fixtures.company_a.owner.clone();

	assert_eq!(app.get("/api/me", Some(&owner)).await.status(), StatusCode::OK);

	let response = app
		.post("/api/auth/logout", Some(&owner), serde_json::json!({}))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let cookie = response
		.headers()
		.get(header::SET_COOKIE)
		.and_then(|v| v.to_str().ok())
		.unwrap_or_default()
		.to_string();
	assert!(cookie.starts_with("fleetdesk_session="), "{cookie}");

	assert_eq!(
		app.get("/api/me", Some(&owner)).await.status(),
		StatusCode::UNAUTHORIZED
	);
	assert_redirect(&app, "/dashboard", Some(&owner), "/login?redirectTo=%2Fdashboard").await;
}

#[tokio::test]
async fn me_reports_role_and_home() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let body = body_json(app.get("/api/me", Some(&f.company_b.driver)).await).await;
	assert_eq!(body["profile"]["role"], "driver");
	assert_eq!(body["profile"]["company_id"], f.company_b.id().to_string());
	assert_eq!(body["home_path"], "/driver");

	let body = body_json(app.get("/api/me", Some(&f.newcomer)).await).await;
	assert!(body["profile"].is_null());
	assert_eq!(body["home_path"], "/login");
}
