// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! FleetDesk HTTP server.
//!
//! This crate wires the access gate in front of the web bundle, serves the
//! tenant-scoped JSON API and exposes the admin API.

pub mod abac_middleware;
pub mod api;
pub mod api_docs;
pub mod api_response;
pub mod auth_middleware;
pub mod gate_middleware;
pub mod pagination;
pub mod routes;
pub mod version;

pub use api::{create_app_state, create_router, AppState};
pub use api_docs::ApiDoc;
pub use fleetdesk_server_config::ServerConfig;
