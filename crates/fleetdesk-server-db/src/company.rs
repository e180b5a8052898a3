// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Company repository for database operations.
//!
//! This module provides database access for tenants including:
//! - Company lookup, onboarding upsert and partial updates
//! - Activation toggling
//! - The filtered, paginated admin listing with per-company counts

use async_trait::async_trait;
use chrono::Utc;
use fleetdesk_server_auth::{CompanyId, Profile, Role};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::rows::{like_pattern, parse_enum, parse_timestamp};
use crate::types::{Company, CompanyFilter, CompanySummary, CompanyUpdate};

/// Result of [`CompanyRepository::register_company`].
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
	Registered(Company),
	/// The owner's identity already holds a driver or admin profile.
	ProfileTaken,
}

#[async_trait]
pub trait CompanyStore: Send + Sync {
	async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, DbError>;
	async fn upsert_company(&self, company: &Company) -> Result<Company, DbError>;
	async fn register_company(
		&self,
		company: &Company,
		owner: &Profile,
	) -> Result<RegisterOutcome, DbError>;
	async fn update_company(
		&self,
		id: &CompanyId,
		update: &CompanyUpdate,
	) -> Result<Option<Company>, DbError>;
	async fn toggle_active(&self, id: &CompanyId) -> Result<Option<bool>, DbError>;
	async fn list_companies(
		&self,
		filter: &CompanyFilter,
	) -> Result<(Vec<CompanySummary>, i64), DbError>;
}

/// Repository for company database operations.
#[derive(Clone)]
pub struct CompanyRepository {
	pool: SqlitePool,
}

const COMPANY_COLUMNS: &str = "c.id, c.name, c.business_type, c.phone, c.email, c.address, \
	c.logo_url, c.plan, c.max_drivers, c.is_active, c.created_at, c.updated_at";

impl CompanyRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(company_id = %id))]
	pub async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {COMPANY_COLUMNS} FROM companies c WHERE c.id = ?"
		))
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_company(&r)).transpose()
	}

	/// Insert a company, or refresh the contact details of an existing one.
	///
	/// Plan, driver limit, activation and creation time are only written on
	/// insert, so re-running onboarding never resets a paid plan.
	#[tracing::instrument(skip(self, company), fields(company_id = %company.id))]
	pub async fn upsert_company(&self, company: &Company) -> Result<Company, DbError> {
		write_company(&self.pool, company).await?;

		tracing::debug!(company_id = %company.id, "company saved");
		self
			.get_company(&company.id)
			.await?
			.ok_or_else(|| DbError::Internal(format!("company {} vanished after upsert", company.id)))
	}

	/// Save an owner's company profile and their company in one transaction.
	///
	/// An existing profile is only rewritten while it still has the company
	/// role. A driver or admin profile written by a concurrent request is left
	/// alone and nothing is saved.
	#[tracing::instrument(
		skip(self, company, owner),
		fields(company_id = %company.id, user_id = %owner.id)
	)]
	pub async fn register_company(
		&self,
		company: &Company,
		owner: &Profile,
	) -> Result<RegisterOutcome, DbError> {
		let mut tx = self.pool.begin().await?;
		let now = Utc::now().to_rfc3339();

		let saved = sqlx::query(
			r#"
			INSERT INTO profiles (id, email, full_name, phone, role, company_id, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO UPDATE SET
				email = excluded.email,
				full_name = excluded.full_name,
				phone = excluded.phone,
				company_id = excluded.company_id,
				updated_at = excluded.updated_at
			WHERE profiles.role = excluded.role
			"#,
		)
		.bind(owner.id.as_str())
		.bind(&owner.email)
		.bind(&owner.full_name)
		.bind(&owner.phone)
		.bind(Role::Company.as_str())
		.bind(company.id.as_str())
		.bind(&now)
		.bind(&now)
		.execute(&mut *tx)
		.await?;
		if saved.rows_affected() == 0 {
			tracing::info!("owner already holds another role");
			return Ok(RegisterOutcome::ProfileTaken);
		}

		write_company(&mut *tx, company).await?;
		let row = sqlx::query(&format!(
			"SELECT {COMPANY_COLUMNS} FROM companies c WHERE c.id = ?"
		))
		.bind(company.id.as_str())
		.fetch_one(&mut *tx)
		.await?;
		let registered = self.row_to_company(&row)?;

		tx.commit().await?;
		tracing::info!(company_id = %registered.id, "company registered");
		Ok(RegisterOutcome::Registered(registered))
	}

	/// Apply a partial update. Returns `None` if the company does not exist.
	#[tracing::instrument(skip(self, update), fields(company_id = %id))]
	pub async fn update_company(
		&self,
		id: &CompanyId,
		update: &CompanyUpdate,
	) -> Result<Option<Company>, DbError> {
		let result = sqlx::query(
			r#"
			UPDATE companies SET
				name = COALESCE(?, name),
				business_type = COALESCE(?, business_type),
				phone = COALESCE(?, phone),
				email = COALESCE(?, email),
				address = COALESCE(?, address),
				logo_url = COALESCE(?, logo_url),
				updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(&update.name)
		.bind(&update.business_type)
		.bind(&update.phone)
		.bind(&update.email)
		.bind(&update.address)
		.bind(&update.logo_url)
		.bind(Utc::now().to_rfc3339())
		.bind(id.as_str())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_company(id).await
	}

	/// Flip `is_active`. Returns the new value, or `None` if the company does not exist.
	#[tracing::instrument(skip(self), fields(company_id = %id))]
	pub async fn toggle_active(&self, id: &CompanyId) -> Result<Option<bool>, DbError> {
		let row = sqlx::query(
			r#"
			UPDATE companies
			SET is_active = CASE is_active WHEN 0 THEN 1 ELSE 0 END, updated_at = ?
			WHERE id = ?
			RETURNING is_active
			"#,
		)
		.bind(Utc::now().to_rfc3339())
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		let is_active = row.map(|r| r.get::<i64, _>("is_active") != 0);
		if let Some(is_active) = is_active {
			tracing::info!(company_id = %id, is_active, "company activation changed");
		}
		Ok(is_active)
	}

	/// Companies matching `filter`, newest first, with the total match count.
	#[tracing::instrument(skip(self, filter), fields(search = ?filter.search, limit = filter.limit, offset = filter.offset))]
	pub async fn list_companies(
		&self,
		filter: &CompanyFilter,
	) -> Result<(Vec<CompanySummary>, i64), DbError> {
		let mut count_query: QueryBuilder<Sqlite> =
			QueryBuilder::new("SELECT COUNT(*) AS total FROM companies c WHERE 1 = 1");
		push_filters(&mut count_query, filter);
		let total: i64 = count_query
			.build()
			.fetch_one(&self.pool)
			.await?
			.get("total");

		let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
			"SELECT {COMPANY_COLUMNS}, \
			 (SELECT COUNT(*) FROM drivers d WHERE d.company_id = c.id) AS drivers_count, \
			 (SELECT COUNT(*) FROM deliveries v WHERE v.company_id = c.id) AS deliveries_count \
			 FROM companies c WHERE 1 = 1"
		));
		push_filters(&mut query, filter);
		query
			.push(" ORDER BY c.created_at DESC, c.id ASC LIMIT ")
			.push_bind(filter.limit)
			.push(" OFFSET ")
			.push_bind(filter.offset);

		let rows = query.build().fetch_all(&self.pool).await?;
		let companies = rows
			.iter()
			.map(|r| {
				Ok(CompanySummary {
					company: self.row_to_company(r)?,
					drivers_count: r.get("drivers_count"),
					deliveries_count: r.get("deliveries_count"),
				})
			})
			.collect::<Result<Vec<_>, DbError>>()?;

		Ok((companies, total))
	}

	fn row_to_company(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Company, DbError> {
		let plan: String = row.get("plan");
		let is_active: i64 = row.get("is_active");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		Ok(Company {
			id: CompanyId::new(row.get::<String, _>("id")),
			name: row.get("name"),
			business_type: row.get("business_type"),
			phone: row.get("phone"),
			email: row.get("email"),
			address: row.get("address"),
			logo_url: row.get("logo_url"),
			plan: parse_enum(&plan, "plan")?,
			max_drivers: row.get("max_drivers"),
			is_active: is_active != 0,
			created_at: parse_timestamp(&created_at, "created_at")?,
			updated_at: parse_timestamp(&updated_at, "updated_at")?,
		})
	}
}

async fn write_company<'e, E>(executor: E, company: &Company) -> Result<(), DbError>
where
	E: sqlx::Executor<'e, Database = Sqlite>,
{
	let now = Utc::now().to_rfc3339();
	sqlx::query(
		r#"
		INSERT INTO companies (
			id, name, business_type, phone, email, address, logo_url,
			plan, max_drivers, is_active, created_at, updated_at
		)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
		ON CONFLICT(id) DO UPDATE SET
			name = excluded.name,
			business_type = excluded.business_type,
			phone = COALESCE(excluded.phone, companies.phone),
			email = COALESCE(excluded.email, companies.email),
			updated_at = excluded.updated_at
		"#,
	)
	.bind(company.id.as_str())
	.bind(&company.name)
	.bind(&company.business_type)
	.bind(&company.phone)
	.bind(&company.email)
	.bind(&company.address)
	.bind(&company.logo_url)
	.bind(company.plan.as_str())
	.bind(company.max_drivers)
	.bind(company.is_active as i32)
	.bind(company.created_at.to_rfc3339())
	.bind(&now)
	.execute(executor)
	.await?;
	Ok(())
}

fn push_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &CompanyFilter) {
	if let Some(search) = filter.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
		let pattern = like_pattern(search);
		query
			.push(" AND (LOWER(c.name) LIKE ")
			.push_bind(pattern.clone())
			.push(" ESCAPE '\\' OR LOWER(COALESCE(c.email, '')) LIKE ")
			.push_bind(pattern)
			.push(" ESCAPE '\\')");
	}
	if let Some(is_active) = filter.is_active {
		query.push(" AND c.is_active = ").push_bind(is_active as i32);
	}
	if let Some(plan) = filter.plan {
		query.push(" AND c.plan = ").push_bind(plan.as_str());
	}
}

#[async_trait]
impl CompanyStore for CompanyRepository {
	async fn get_company(&self, id: &CompanyId) -> Result<Option<Company>, DbError> {
		self.get_company(id).await
	}

	async fn upsert_company(&self, company: &Company) -> Result<Company, DbError> {
		self.upsert_company(company).await
	}

	async fn register_company(
		&self,
		company: &Company,
		owner: &Profile,
	) -> Result<RegisterOutcome, DbError> {
		self.register_company(company, owner).await
	}

	async fn update_company(
		&self,
		id: &CompanyId,
		update: &CompanyUpdate,
	) -> Result<Option<Company>, DbError> {
		self.update_company(id, update).await
	}

	async fn toggle_active(&self, id: &CompanyId) -> Result<Option<bool>, DbError> {
		self.toggle_active(id).await
	}

	async fn list_companies(
		&self,
		filter: &CompanyFilter,
	) -> Result<(Vec<CompanySummary>, i64), DbError> {
		self.list_companies(filter).await
	}
}
