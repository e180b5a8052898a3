// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::path::PathBuf;

use axum::{
	body::Body,
	http::{header, Method, Request, Response, StatusCode},
	Router,
};
use chrono::{Duration, Utc};
use fleetdesk_server::{create_app_state, create_router, AppState, ServerConfig};
use fleetdesk_server_auth::{CompanyId, Identity, Profile, UserId, SESSION_COOKIE_NAME};
use fleetdesk_server_db::{Company, Delivery, DeliveryPriority, Driver, NewDelivery, VehicleType};
use serde::Serialize;
use tempfile::TempDir;
use tower::ServiceExt;

pub const INDEX_HTML: &str = "<!doctype html><title>FleetDesk</title>";

#[derive(Clone)]
pub struct TestUser {
	pub identity: Identity,
	pub session_token: String,
}

impl TestUser {
	pub fn auth_header(&self) -> (header::HeaderName, String) {
		(
			header::COOKIE,
			format!("{SESSION_COOKIE_NAME}={}", self.session_token),
		)
	}

	pub fn id(&self) -> &UserId {
		&self.identity.user_id
	}
}

pub struct CompanyFixture {
	pub company: Company,
	pub owner: TestUser,
	pub driver: TestUser,
	/// Assigned to `driver`.
	pub delivery: Delivery,
}

impl CompanyFixture {
	pub fn id(&self) -> &CompanyId {
		&self.company.id
	}
}

pub struct Fixtures {
	pub admin: TestUser,
	pub company_a: CompanyFixture,
	pub company_b: CompanyFixture,
	/// Signed in, no profile yet.
	pub newcomer: TestUser,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	pub state: AppState,
	web_dir: PathBuf,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let web_dir = temp_dir.path().join("web");
		std::fs::create_dir_all(&web_dir).unwrap();
		std::fs::write(web_dir.join("index.html"), INDEX_HTML).unwrap();

		let db_path = temp_dir.path().join("test_authz.db");
		let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
		let pool = fleetdesk_server_db::create_pool(&db_url).await.unwrap();
		fleetdesk_server_db::run_migrations(&pool).await.unwrap();

		let mut config = ServerConfig::default();
		config.paths.web_dir = Some(web_dir.display().to_string());
		let state = create_app_state(pool, &config);

		let fixtures = create_fixtures(&state).await;
		let router = create_router(state.clone());

		Self {
			router,
			fixtures,
			state,
			web_dir,
			_temp_dir: temp_dir,
		}
	}

	/// Add a file to the served web bundle, e.g. `admin/index.html`.
	pub fn write_page(&self, relative: &str, contents: &str) {
		let path = self.web_dir.join(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent).unwrap();
		}
		std::fs::write(path, contents).unwrap();
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		self
			.request(Method::GET, path, user, Option::<()>::None)
			.await
	}

	pub async fn post(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::POST, path, user, Some(body)).await
	}

	pub async fn patch(
		&self,
		path: &str,
		user: Option<&TestUser>,
		body: impl Serialize,
	) -> Response<Body> {
		self.request(Method::PATCH, path, user, Some(body)).await
	}

	async fn request<T: Serialize>(
		&self,
		method: Method,
		path: &str,
		user: Option<&TestUser>,
		body: Option<T>,
	) -> Response<Body> {
		let mut builder = Request::builder().method(method).uri(path);

		if let Some(test_user) = user {
			let (name, value) = test_user.auth_header();
			builder = builder.header(name, value);
		}

		let request_body = match body {
			Some(b) => {
				builder = builder.header(header::CONTENT_TYPE, "application/json");
				Body::from(serde_json::to_string(&b).unwrap())
			}
			None => Body::empty(),
		};

		let request = builder.body(request_body).unwrap();

		self.router.clone().oneshot(request).await.unwrap()
	}

	/// Sign in a fresh identity with no profile.
	pub async fn sign_in(&self, email: &str) -> TestUser {
		create_session(&self.state, Identity::new(UserId::generate(), email)).await
	}
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> Option<&str> {
	response
		.headers()
		.get(header::LOCATION)
		.and_then(|v| v.to_str().ok())
}

pub struct AuthzCase {
	pub name: &'static str,
	pub method: Method,
	pub path: String,
	pub user: Option<TestUser>,
	pub body: Option<serde_json::Value>,
	pub expected_status: StatusCode,
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = match (&case.method, &case.body) {
			(m, Some(body)) if *m == Method::POST => {
				app.post(&case.path, case.user.as_ref(), body.clone()).await
			}
			(m, Some(body)) if *m == Method::PATCH => {
				app
					.patch(&case.path, case.user.as_ref(), body.clone())
					.await
			}
			(m, None) if *m == Method::POST => {
				app
					.request(Method::POST, &case.path, case.user.as_ref(), Option::<()>::None)
					.await
			}
			_ => app.get(&case.path, case.user.as_ref()).await,
		};

		if response.status() != case.expected_status {
			let (parts, body) = response.into_parts();
			let body_bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
			let body_str = String::from_utf8_lossy(&body_bytes);
			panic!(
				"Case '{}': {} {} - expected {}, got {}\nResponse body: {}",
				case.name, case.method, case.path, case.expected_status, parts.status, body_str
			);
		}
	}
}

async fn create_fixtures(state: &AppState) -> Fixtures {
	let admin_identity = Identity::new(UserId::generate(), "admin@fleetdesk.test");
	state
		.profile_repo
		.upsert_profile(
			&Profile::admin(admin_identity.user_id.clone(), admin_identity.email.clone())
				.with_full_name("Platform Admin"),
		)
		.await
		.unwrap();
	let admin = create_session(state, admin_identity).await;

	let company_a = create_company_fixture(state, "alpha", "Alpha Couriers").await;
	let company_b = create_company_fixture(state, "bravo", "Bravo Freight").await;

	let newcomer = create_session(
		state,
		Identity::new(UserId::generate(), "newcomer@fleetdesk.test"),
	)
	.await;

	Fixtures {
		admin,
		company_a,
		company_b,
		newcomer,
	}
}

async fn create_company_fixture(state: &AppState, slug: &str, name: &str) -> CompanyFixture {
	let owner_identity = Identity::new(UserId::generate(), format!("owner@{slug}.test"));
	state
		.profile_repo
		.upsert_profile(
			&Profile::company(owner_identity.user_id.clone(), owner_identity.email.clone())
				.with_full_name(format!("{name} Owner")),
		)
		.await
		.unwrap();

	let mut company = Company::new(&owner_identity.user_id, name);
	company.max_drivers = 5;
	let company = state.company_repo.upsert_company(&company).await.unwrap();

	let driver_identity = Identity::new(UserId::generate(), format!("driver@{slug}.test"));
	state
		.profile_repo
		.upsert_profile(
			&Profile::driver(
				driver_identity.user_id.clone(),
				driver_identity.email.clone(),
				company.id.clone(),
			)
			.with_full_name(format!("{name} Driver")),
		)
		.await
		.unwrap();

	let now = Utc::now();
	state
		.driver_repo
		.create_driver(&Driver {
			id: driver_identity.user_id.clone(),
			company_id: company.id.clone(),
			driver_code: None,
			vehicle_type: VehicleType::Van,
			license_plate: Some(format!("{}-001", slug.to_uppercase())),
			is_active: true,
			is_available: true,
			current_lat: None,
			current_lng: None,
			created_at: now,
			updated_at: now,
		})
		.await
		.unwrap();

	let delivery = state
		.delivery_repo
		.create_delivery(&NewDelivery {
			company_id: company.id.clone(),
			driver_id: Some(driver_identity.user_id.clone()),
			route_id: None,
			customer_name: format!("{name} Customer"),
			customer_phone: None,
			customer_email: None,
			pickup_address: None,
			delivery_address: "1 Harbour Road".to_string(),
			priority: DeliveryPriority::Media,
			notes: None,
			scheduled_at: None,
		})
		.await
		.unwrap();

	CompanyFixture {
		company,
		owner: create_session(state, owner_identity).await,
		driver: create_session(state, driver_identity).await,
		delivery,
	}
}

async fn create_session(state: &AppState, identity: Identity) -> TestUser {
	let (session_token, _) = state
		.session_repo
		.create_session(&identity, Duration::hours(1))
		.await
		.unwrap();

	TestUser {
		identity,
		session_token,
	}
}
