// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access gate: session resolution, role loading and the access decision.
//!
//! [`AccessGate::evaluate`] runs once per page request:
//!
//! ```text
//! Start ──resolve session──▶ IdentityResolved ──load profile──▶ RoleResolved ──decide──▶ Decided
//! ```
//!
//! Anonymous callers on public routes skip the profile lookup. Any failure
//! from the identity provider or profile store is logged and treated as
//! "absent", so errors can only ever narrow access.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::instrument;

use crate::decision::{decide, AccessDecision};
use crate::error::ResolveError;
use crate::middleware::AuthContext;
use crate::profile::{Identity, Profile};
use crate::route::{classify, RouteClass};
use crate::types::UserId;

/// Turns a session token into an identity.
#[async_trait]
pub trait SessionResolver: Send + Sync {
	/// Returns `Ok(None)` for unknown or expired tokens.
	async fn resolve_session(&self, token: &str) -> Result<Option<Identity>, ResolveError>;
}

/// Loads the profile for an identity. Always reads from source.
#[async_trait]
pub trait ProfileLoader: Send + Sync {
	async fn load_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ResolveError>;
}

/// Result of evaluating a page request.
#[derive(Debug, Clone)]
pub struct GateOutcome {
	pub class: RouteClass,
	pub decision: AccessDecision,
	pub context: AuthContext,
}

/// Resolves who is calling and decides whether they may see a path.
#[derive(Clone)]
pub struct AccessGate {
	sessions: Arc<dyn SessionResolver>,
	profiles: Arc<dyn ProfileLoader>,
}

impl AccessGate {
	pub fn new(sessions: Arc<dyn SessionResolver>, profiles: Arc<dyn ProfileLoader>) -> Self {
		Self { sessions, profiles }
	}

	/// Resolve the caller's identity. Provider errors count as anonymous.
	pub async fn resolve_identity(&self, token: Option<&str>) -> Option<Identity> {
		let token = token?;
		match self.sessions.resolve_session(token).await {
			Ok(identity) => identity,
			Err(e) => {
				tracing::warn!(error = %e, "session resolution failed, treating request as anonymous");
				None
			}
		}
	}

	/// Load the caller's profile. Store errors and inconsistent profiles count as absent.
	pub async fn load_profile(&self, identity: &Identity) -> Option<Profile> {
		match self.profiles.load_profile(&identity.user_id).await {
			Ok(Some(profile)) => {
				let role = profile.role;
				let normalized = profile.normalized();
				if normalized.is_none() {
					tracing::warn!(
						user_id = %identity.user_id,
						role = %role,
						"profile is inconsistent with its role, treating as missing"
					);
				}
				normalized
			}
			Ok(None) => None,
			Err(e) => {
				tracing::warn!(
					user_id = %identity.user_id,
					error = %e,
					"profile load failed, treating as missing"
				);
				None
			}
		}
	}

	/// Resolve identity and profile without making a routing decision.
	pub async fn authenticate(&self, token: Option<&str>) -> AuthContext {
		let Some(identity) = self.resolve_identity(token).await else {
			return AuthContext::anonymous();
		};
		let profile = self.load_profile(&identity).await;
		AuthContext::new(Some(identity), profile)
	}

	/// Decide what to do with a page request.
	#[instrument(level = "debug", skip(self, token), fields(has_token = token.is_some()))]
	pub async fn evaluate(&self, token: Option<&str>, path: &str) -> GateOutcome {
		let class = classify(path);
		let identity = self.resolve_identity(token).await;

		let context = match identity {
			Some(identity) => {
				let profile = self.load_profile(&identity).await;
				AuthContext::new(Some(identity), profile)
			}
			None => AuthContext::anonymous(),
		};

		let decision = decide(class, path, context.is_authenticated(), context.role());

		if let Some(reason) = decision.denial_reason(class) {
			tracing::info!(
				path,
				user_id = context.identity.as_ref().map(|i| i.user_id.as_str()),
				reason = %reason,
				"access gate redirected request"
			);
		}

		GateOutcome {
			class,
			decision,
			context,
		}
	}
}
