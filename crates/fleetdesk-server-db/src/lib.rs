// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Database layer for the FleetDesk server.
//!
//! This crate provides SQLite-backed repositories for sessions, profiles,
//! companies, drivers, deliveries, routes, notifications and invitation
//! redemptions. Every repository has a matching `*Store` trait so handlers can
//! be exercised against other implementations.

pub mod company;
pub mod delivery;
pub mod driver;
pub mod error;
pub mod invite;
pub mod notification;
pub mod pool;
pub mod profile;
pub mod route;
pub mod session;
pub mod stats;
pub mod types;

mod rows;

#[cfg(test)]
pub mod testing;

pub use company::{CompanyRepository, CompanyStore, RegisterOutcome};
pub use delivery::{DeliveryFilter, DeliveryRepository, DeliveryStore};
pub use driver::{DriverJoin, DriverRepository, DriverStore, JoinOutcome};
pub use error::{DbError, Result};
pub use invite::{InviteRepository, InviteStore};
pub use notification::{NotificationRepository, NotificationStore, NOTIFICATION_PAGE_LIMIT};
pub use pool::{create_pool, ping, run_migrations};
pub use profile::{ProfileRepository, ProfileStore};
pub use route::{RouteRepository, RouteStore};
pub use session::{SessionRepository, SessionStore};
pub use stats::{StatsRepository, StatsStore};
pub use types::*;
