// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Profile repository: the role and tenant record of each identity.

use async_trait::async_trait;
use chrono::Utc;
use fleetdesk_server_auth::{CompanyId, ProfileLoader, Profile, ResolveError, Role, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;

#[async_trait]
pub trait ProfileStore: Send + Sync {
	async fn get_profile(&self, id: &UserId) -> Result<Option<Profile>, DbError>;
	async fn upsert_profile(&self, profile: &Profile) -> Result<(), DbError>;
	async fn list_company_profiles(&self, company_id: &CompanyId) -> Result<Vec<Profile>, DbError>;
}

/// Repository for profile database operations.
#[derive(Clone)]
pub struct ProfileRepository {
	pool: SqlitePool,
}

impl ProfileRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Get a profile exactly as stored. Callers decide whether to normalize.
	#[tracing::instrument(skip(self), fields(user_id = %id))]
	pub async fn get_profile(&self, id: &UserId) -> Result<Option<Profile>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, email, full_name, phone, role, company_id
			FROM profiles
			WHERE id = ?
			"#,
		)
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		Ok(row.map(|r| self.row_to_profile(&r)))
	}

	/// Insert a profile or replace the existing one with the same id.
	#[tracing::instrument(skip(self, profile), fields(user_id = %profile.id, role = %profile.role))]
	pub async fn upsert_profile(&self, profile: &Profile) -> Result<(), DbError> {
		let now = Utc::now().to_rfc3339();
		sqlx::query(
			r#"
			INSERT INTO profiles (id, email, full_name, phone, role, company_id, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				email = excluded.email,
				full_name = excluded.full_name,
				phone = excluded.phone,
				role = excluded.role,
				company_id = excluded.company_id,
				updated_at = excluded.updated_at
			"#,
		)
		.bind(profile.id.as_str())
		.bind(&profile.email)
		.bind(&profile.full_name)
		.bind(&profile.phone)
		.bind(profile.role.as_str())
		.bind(profile.company_id.as_ref().map(|c| c.as_str()))
		.bind(&now)
		.bind(&now)
		.execute(&self.pool)
		.await?;

		tracing::debug!(user_id = %profile.id, "profile saved");
		Ok(())
	}

	/// Every profile bound to a company: its owner and its drivers.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_company_profiles(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<Profile>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, email, full_name, phone, role, company_id
			FROM profiles
			WHERE company_id = ?
			ORDER BY created_at ASC
			"#,
		)
		.bind(company_id.as_str())
		.fetch_all(&self.pool)
		.await?;

		Ok(rows.iter().map(|r| self.row_to_profile(r)).collect())
	}

	fn row_to_profile(&self, row: &sqlx::sqlite::SqliteRow) -> Profile {
		let role: String = row.get("role");
		let company_id: Option<String> = row.get("company_id");
		Profile {
			id: UserId::new(row.get::<String, _>("id")),
			email: row.get("email"),
			full_name: row.get("full_name"),
			phone: row.get("phone"),
			role: Role::parse(&role),
			company_id: company_id.map(CompanyId::new),
		}
	}
}

#[async_trait]
impl ProfileStore for ProfileRepository {
	async fn get_profile(&self, id: &UserId) -> Result<Option<Profile>, DbError> {
		self.get_profile(id).await
	}

	async fn upsert_profile(&self, profile: &Profile) -> Result<(), DbError> {
		self.upsert_profile(profile).await
	}

	async fn list_company_profiles(&self, company_id: &CompanyId) -> Result<Vec<Profile>, DbError> {
		self.list_company_profiles(company_id).await
	}
}

#[async_trait]
impl ProfileLoader for ProfileRepository {
	async fn load_profile(&self, user_id: &UserId) -> Result<Option<Profile>, ResolveError> {
		Ok(self.get_profile(user_id).await?)
	}
}
