// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Access control and tenant isolation for FleetDesk.
//!
//! This crate provides:
//! - Route classification ([`classify`])
//! - The per-request access decision ([`decide`], [`AccessGate`])
//! - Tenant checks for company-scoped data ([`has_access`], [`require_access`])
//! - Session token helpers and credential extraction
//! - Signed driver invitation codes ([`InviteSigner`])
//!
//! Storage lives elsewhere: the server wires implementations of
//! [`SessionResolver`] and [`ProfileLoader`] into an [`AccessGate`].

pub mod decision;
pub mod error;
pub mod gate;
pub mod invite;
pub mod middleware;
pub mod profile;
pub mod route;
pub mod session;
pub mod tenant;
pub mod types;

pub use decision::{decide, login_location, AccessDecision, LOGIN_PATH, RETURN_TO_PARAM};
pub use error::{AccessError, ResolveError};
pub use gate::{AccessGate, GateOutcome, ProfileLoader, SessionResolver};
pub use invite::{InviteClaims, InviteError, InviteSigner, IssuedInvite};
pub use middleware::{
	extract_bearer_token, extract_session_cookie, extract_session_cookie_with_name, AuthConfig,
	AuthContext, SESSION_COOKIE_NAME,
};
pub use profile::{Identity, Profile};
pub use route::{canonical_path, classify, is_public_path, RouteClass};
pub use session::{generate_session_token, hash_token};
pub use tenant::{has_access, require_access};
pub use types::{CompanyId, DeliveryId, NotificationId, Role, RouteId, UserId};
