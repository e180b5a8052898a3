// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router assembly.

use std::sync::Arc;

use axum::{
	middleware::from_fn_with_state,
	routing::{get, patch, post},
	Router,
};
use fleetdesk_server_auth::{
	AccessGate, AuthConfig, InviteSigner, ProfileLoader, SessionResolver,
};
use fleetdesk_server_config::ServerConfig;
use fleetdesk_server_db::{
	CompanyRepository, DeliveryRepository, DriverRepository, InviteRepository,
	NotificationRepository, ProfileRepository, RouteRepository, SessionRepository,
	StatsRepository,
};
use sqlx::SqlitePool;
use tower_http::services::{ServeDir, ServeFile};

use crate::{
	abac_middleware::RequireRole, api_docs, auth_middleware::auth_layer,
	gate_middleware::page_gate, routes,
};

/// Longest invitation lifetime accepted from configuration.
pub const MAX_INVITE_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
	pub pool: SqlitePool,
	pub session_repo: Arc<SessionRepository>,
	pub profile_repo: Arc<ProfileRepository>,
	pub company_repo: Arc<CompanyRepository>,
	pub driver_repo: Arc<DriverRepository>,
	pub delivery_repo: Arc<DeliveryRepository>,
	pub route_repo: Arc<RouteRepository>,
	pub notification_repo: Arc<NotificationRepository>,
	pub invite_repo: Arc<InviteRepository>,
	pub stats_repo: Arc<StatsRepository>,
	pub gate: AccessGate,
	pub auth_config: AuthConfig,
	pub invite_signer: InviteSigner,
	pub invite_ttl: chrono::Duration,
	pub web_dir: Option<String>,
}

/// Creates the application state from a migrated pool and resolved configuration.
pub fn create_app_state(pool: SqlitePool, config: &ServerConfig) -> AppState {
	let session_repo = Arc::new(SessionRepository::new(pool.clone()));
	let profile_repo = Arc::new(ProfileRepository::new(pool.clone()));

	let sessions: Arc<dyn SessionResolver> = session_repo.clone();
	let profiles: Arc<dyn ProfileLoader> = profile_repo.clone();

	let auth_config = AuthConfig::new()
		.with_session_cookie_name(config.auth.session_cookie_name.clone())
		.with_secure_cookies(config.auth.secure_cookies);

	let ttl_secs = config.auth.invite_ttl_secs.min(MAX_INVITE_TTL_SECS);
	if ttl_secs != config.auth.invite_ttl_secs {
		tracing::warn!(
			configured = config.auth.invite_ttl_secs,
			clamped = ttl_secs,
			"invitation TTL too long, clamping"
		);
	}

	AppState {
		session_repo,
		profile_repo,
		company_repo: Arc::new(CompanyRepository::new(pool.clone())),
		driver_repo: Arc::new(DriverRepository::new(pool.clone())),
		delivery_repo: Arc::new(DeliveryRepository::new(pool.clone())),
		route_repo: Arc::new(RouteRepository::new(pool.clone())),
		notification_repo: Arc::new(NotificationRepository::new(pool.clone())),
		invite_repo: Arc::new(InviteRepository::new(pool.clone())),
		stats_repo: Arc::new(StatsRepository::new(pool.clone())),
		gate: AccessGate::new(sessions, profiles),
		auth_config,
		invite_signer: invite_signer(config),
		invite_ttl: chrono::Duration::seconds(ttl_secs as i64),
		web_dir: config.paths.web_dir.clone(),
		pool,
	}
}

fn invite_signer(config: &ServerConfig) -> InviteSigner {
	let Some(key) = config.auth.invite_signing_key.as_ref() else {
		tracing::info!("using a per-process invitation signing key");
		return InviteSigner::ephemeral();
	};

	match InviteSigner::new(key.expose().as_bytes().to_vec()) {
		Ok(signer) => signer,
		Err(e) => {
			tracing::warn!(error = %e, "invitation signing key rejected, using a per-process key");
			InviteSigner::ephemeral()
		}
	}
}

fn admin_routes(state: AppState) -> Router<AppState> {
	Router::new()
		.route("/companies", get(routes::admin::list_companies))
		.route("/companies/{id}", get(routes::admin::get_company_detail))
		.route(
			"/companies/{id}/toggle-status",
			post(routes::admin::toggle_company_status),
		)
		.route("/stats", get(routes::admin::platform_stats))
		.route_layer(RequireRole::admin())
		.layer(from_fn_with_state(state, auth_layer))
}

/// Create the router: JSON API, admin API and the gated web bundle.
pub fn create_router(state: AppState) -> Router {
	let web_dir = state.web_dir.clone();

	// Public routes - no session required
	let public = Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/openapi.json", get(api_docs::openapi_json))
		.route("/api/auth/logout", post(routes::auth::logout))
		.route(
			"/api/drivers/validate-code",
			post(routes::drivers::validate_code),
		);

	// Session-aware routes; handlers decide what the caller may do
	let authed = Router::new()
		.route("/api/me", get(routes::auth::me))
		.route("/api/companies/setup", post(routes::companies::setup_company))
		.route(
			"/api/companies/{id}",
			get(routes::companies::get_company).patch(routes::companies::update_company),
		)
		.route(
			"/api/companies/{id}/drivers",
			get(routes::drivers::list_drivers),
		)
		.route(
			"/api/companies/{id}/deliveries",
			get(routes::deliveries::list_deliveries).post(routes::deliveries::create_delivery),
		)
		.route(
			"/api/companies/{id}/routes",
			get(routes::companies::list_routes),
		)
		.route(
			"/api/companies/{id}/notifications",
			get(routes::companies::list_notifications),
		)
		.route(
			"/api/companies/{id}/invites",
			post(routes::invites::create_invite),
		)
		.route("/api/drivers/join", post(routes::drivers::join_company))
		.route(
			"/api/deliveries/{id}/status",
			patch(routes::deliveries::update_delivery_status),
		)
		.layer(from_fn_with_state(state.clone(), auth_layer));

	let mut router = Router::new()
		.merge(public)
		.merge(authed)
		.nest("/api/admin", admin_routes(state.clone()))
		.with_state(state.clone());

	// Serve the web bundle behind the access gate
	router = match web_dir {
		Some(web_path) => {
			tracing::info!(web_dir = %web_path, "serving static web assets");
			router.fallback_service(
				ServeDir::new(&web_path).fallback(ServeFile::new(format!("{web_path}/index.html"))),
			)
		}
		None => router.fallback(routes::not_found),
	};

	router.layer(from_fn_with_state(state, page_gate))
}
