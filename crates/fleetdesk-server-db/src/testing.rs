// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use chrono::Utc;
use fleetdesk_server_auth::{CompanyId, Profile, UserId};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::company::CompanyRepository;
use crate::pool::run_migrations;
use crate::profile::ProfileRepository;
use crate::types::Company;

/// In-memory pool with the full schema. A single connection keeps every
/// query on the same database.
pub async fn create_test_pool() -> SqlitePool {
	let options = SqliteConnectOptions::from_str(":memory:")
		.unwrap()
		.foreign_keys(true);
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await
		.unwrap();
	run_migrations(&pool).await.unwrap();
	pool
}

/// Insert a company owned by a company-role profile with the same id.
pub async fn seed_company(pool: &SqlitePool, owner: &str, name: &str) -> Company {
	let owner = UserId::new(owner);
	ProfileRepository::new(pool.clone())
		.upsert_profile(&Profile::company(owner.clone(), format!("{owner}@test")))
		.await
		.unwrap();
	let mut company = Company::new(&owner, name);
	company.created_at = Utc::now();
	CompanyRepository::new(pool.clone())
		.upsert_company(&company)
		.await
		.unwrap();
	company
}

/// Insert a driver profile for `company`.
pub async fn seed_driver_profile(pool: &SqlitePool, id: &str, company: &CompanyId) -> Profile {
	let profile = Profile::driver(UserId::new(id), format!("{id}@test"), company.clone())
		.with_full_name(format!("Driver {id}"));
	ProfileRepository::new(pool.clone())
		.upsert_profile(&profile)
		.await
		.unwrap();
	profile
}
