// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Authentication and invitation configuration.

use fleetdesk_common_config::SecretString;
use serde::Deserialize;

/// Shortest invitation signing key accepted in production.
pub const MIN_SIGNING_KEY_BYTES: usize = 32;

const DEFAULT_COOKIE_NAME: &str = "fleetdesk_session";
const DEFAULT_INVITE_TTL_SECS: u64 = 7 * 24 * 60 * 60;
const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub session_cookie_name: String,
	/// Mark cookies `Secure`. Defaults to on in production.
	pub secure_cookies: bool,
	pub invite_ttl_secs: u64,
	/// Key for signing driver invitation codes. `None` means a per-process key.
	pub invite_signing_key: Option<SecretString>,
	pub environment: String,
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment.eq_ignore_ascii_case("production")
	}
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub secure_cookies: Option<bool>,
	#[serde(default)]
	pub invite_ttl_secs: Option<u64>,
	#[serde(default)]
	pub invite_signing_key: Option<SecretString>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.secure_cookies.is_some() {
			self.secure_cookies = other.secure_cookies;
		}
		if other.invite_ttl_secs.is_some() {
			self.invite_ttl_secs = other.invite_ttl_secs;
		}
		if other.invite_signing_key.is_some() {
			self.invite_signing_key = other.invite_signing_key;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		let environment = self
			.environment
			.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string());
		let production = environment.eq_ignore_ascii_case("production");
		AuthConfig {
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string()),
			secure_cookies: self.secure_cookies.unwrap_or(production),
			invite_ttl_secs: self.invite_ttl_secs.unwrap_or(DEFAULT_INVITE_TTL_SECS),
			invite_signing_key: self.invite_signing_key,
			environment,
		}
	}
}
