// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Page access gate.
//!
//! Every page request runs [`AccessGate::evaluate`](fleetdesk_server_auth::AccessGate::evaluate)
//! and either passes through to the web bundle or gets a `307` redirect to
//! the login page or the caller's home. The JSON API, the health check and
//! static assets are not gated here.
//!
//! The request URI is rewritten to its [`canonical_path`] before anything
//! else runs, so the gate, the router and the file server all see the same
//! path.

use std::sync::LazyLock;

use axum::{
	extract::{Request, State},
	http::{
		uri::{PathAndQuery, Uri},
		StatusCode,
	},
	middleware::Next,
	response::{IntoResponse, Redirect, Response},
};
use fleetdesk_server_auth::canonical_path;
use regex::Regex;

use crate::api::AppState;

/// Build artifacts and images served without a session.
static STATIC_ASSET: LazyLock<Option<Regex>> = LazyLock::new(|| {
	Regex::new(r"^/(_next/static|_next/image|favicon\.ico)|\.(svg|png|jpg|jpeg|gif|webp)$").ok()
});

pub fn is_static_asset(path: &str) -> bool {
	STATIC_ASSET.as_ref().is_some_and(|re| re.is_match(path))
}

/// Whether the page gate applies to `path`.
pub fn is_gated_path(path: &str) -> bool {
	let api = path == "/api" || path.starts_with("/api/");
	!(api || path == "/health" || is_static_asset(path))
}

/// Percent-encode each segment of a canonical path for use in a URI.
pub fn encode_path(path: &str) -> String {
	path.split('/')
		.map(|segment| urlencoding::encode(segment).into_owned())
		.collect::<Vec<_>>()
		.join("/")
}

/// Replace the path of `uri` with `path`, keeping the query.
fn with_path(uri: &Uri, path: &str) -> Option<Uri> {
	let path_and_query = match uri.query() {
		Some(query) => format!("{path}?{query}"),
		None => path.to_string(),
	};

	let mut parts = uri.clone().into_parts();
	parts.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
	Uri::from_parts(parts).ok()
}

/// Apply the access decision to a page request.
pub async fn page_gate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
	let path = canonical_path(req.uri().path());
	let encoded = encode_path(&path);
	if encoded != req.uri().path() {
		let Some(uri) = with_path(req.uri(), &encoded) else {
			tracing::debug!(raw = %req.uri().path(), "unrepresentable request path");
			return StatusCode::BAD_REQUEST.into_response();
		};
		tracing::debug!(raw = %req.uri().path(), canonical = %path, "canonicalized request path");
		*req.uri_mut() = uri;
	}

	if !is_gated_path(&path) {
		return next.run(req).await;
	}

	let token = state.auth_config.extract_token(req.headers());
	let outcome = state.gate.evaluate(token.as_deref(), &path).await;

	match outcome.decision.location() {
		None => {
			req.extensions_mut().insert(outcome.context);
			next.run(req).await
		}
		Some(location) => Redirect::temporary(&location).into_response(),
	}
}
