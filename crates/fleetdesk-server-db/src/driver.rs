// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Driver repository, including joining a company with an invitation.

use async_trait::async_trait;
use chrono::Utc;
use fleetdesk_server_auth::{CompanyId, Profile, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::rows::{parse_enum, parse_timestamp};
use crate::types::{Driver, DriverWithProfile, VehicleType};

/// Everything needed to turn an invited identity into a driver.
#[derive(Debug, Clone)]
pub struct DriverJoin {
	pub profile: Profile,
	pub company_id: CompanyId,
	/// Invitation nonce, redeemed as part of the join.
	pub nonce: String,
	pub vehicle_type: VehicleType,
	pub license_plate: Option<String>,
}

/// Result of [`DriverRepository::join_company`].
#[derive(Debug, Clone, PartialEq)]
pub enum JoinOutcome {
	Joined(Driver),
	/// The company is missing or deactivated.
	CompanyUnavailable,
	DriverLimitReached { max_drivers: i64 },
	/// The invitation nonce was already used.
	AlreadyRedeemed,
	/// The identity gained a profile since the request started.
	ProfileTaken,
}

#[async_trait]
pub trait DriverStore: Send + Sync {
	async fn get_driver(&self, id: &UserId) -> Result<Option<Driver>, DbError>;
	async fn create_driver(&self, driver: &Driver) -> Result<(), DbError>;
	async fn list_company_drivers(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<DriverWithProfile>, DbError>;
	async fn count_company_drivers(&self, company_id: &CompanyId) -> Result<i64, DbError>;
	async fn join_company(&self, join: &DriverJoin) -> Result<JoinOutcome, DbError>;
}

/// Repository for driver database operations.
#[derive(Clone)]
pub struct DriverRepository {
	pool: SqlitePool,
}

impl DriverRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(driver_id = %id))]
	pub async fn get_driver(&self, id: &UserId) -> Result<Option<Driver>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, company_id, driver_code, vehicle_type, license_plate, is_active,
				is_available, current_lat, current_lng, created_at, updated_at
			FROM drivers
			WHERE id = ?
			"#,
		)
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_driver(&r)).transpose()
	}

	#[tracing::instrument(skip(self, driver), fields(driver_id = %driver.id, company_id = %driver.company_id))]
	pub async fn create_driver(&self, driver: &Driver) -> Result<(), DbError> {
		insert_driver(&self.pool, driver).await?;
		tracing::debug!(driver_id = %driver.id, "driver created");
		Ok(())
	}

	/// Drivers of a company with their profile names, oldest first.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_company_drivers(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<DriverWithProfile>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT d.id, d.company_id, d.driver_code, d.vehicle_type, d.license_plate, d.is_active,
				d.is_available, d.current_lat, d.current_lng, d.created_at, d.updated_at,
				p.full_name, p.email AS profile_email, p.phone AS profile_phone
			FROM drivers d
			LEFT JOIN profiles p ON p.id = d.id
			WHERE d.company_id = ?
			ORDER BY d.created_at ASC
			"#,
		)
		.bind(company_id.as_str())
		.fetch_all(&self.pool)
		.await?;

		rows
			.iter()
			.map(|r| {
				Ok(DriverWithProfile {
					driver: self.row_to_driver(r)?,
					full_name: r.get("full_name"),
					email: r.get("profile_email"),
					phone: r.get("profile_phone"),
				})
			})
			.collect()
	}

	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn count_company_drivers(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		let row = sqlx::query("SELECT COUNT(*) AS total FROM drivers WHERE company_id = ?")
			.bind(company_id.as_str())
			.fetch_one(&self.pool)
			.await?;
		Ok(row.get("total"))
	}

	/// Redeem an invitation and create the driver profile and record in one transaction.
	///
	/// Either everything is written or nothing is. An existing profile is
	/// never overwritten.
	#[tracing::instrument(
		skip(self, join),
		fields(user_id = %join.profile.id, company_id = %join.company_id)
	)]
	pub async fn join_company(&self, join: &DriverJoin) -> Result<JoinOutcome, DbError> {
		let mut tx = self.pool.begin().await?;

		let company = sqlx::query("SELECT max_drivers, is_active FROM companies WHERE id = ?")
			.bind(join.company_id.as_str())
			.fetch_optional(&mut *tx)
			.await?;
		let Some(company) = company else {
			return Ok(JoinOutcome::CompanyUnavailable);
		};
		let max_drivers: i64 = company.get("max_drivers");
		let is_active: i64 = company.get("is_active");
		if is_active == 0 {
			return Ok(JoinOutcome::CompanyUnavailable);
		}

		let current: i64 = sqlx::query("SELECT COUNT(*) AS total FROM drivers WHERE company_id = ?")
			.bind(join.company_id.as_str())
			.fetch_one(&mut *tx)
			.await?
			.get("total");
		if current >= max_drivers {
			tracing::info!(max_drivers, current, "driver limit reached");
			return Ok(JoinOutcome::DriverLimitReached { max_drivers });
		}

		let now = Utc::now();
		let redeemed = sqlx::query(
			r#"
			INSERT INTO invite_redemptions (nonce, company_id, redeemed_by, redeemed_at)
			VALUES (?, ?, ?, ?)
			ON CONFLICT(nonce) DO NOTHING
			"#,
		)
		.bind(&join.nonce)
		.bind(join.company_id.as_str())
		.bind(join.profile.id.as_str())
		.bind(now.to_rfc3339())
		.execute(&mut *tx)
		.await?;
		if redeemed.rows_affected() == 0 {
			return Ok(JoinOutcome::AlreadyRedeemed);
		}

		let created = sqlx::query(
			r#"
			INSERT INTO profiles (id, email, full_name, phone, role, company_id, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			ON CONFLICT(id) DO NOTHING
			"#,
		)
		.bind(join.profile.id.as_str())
		.bind(&join.profile.email)
		.bind(&join.profile.full_name)
		.bind(&join.profile.phone)
		.bind(join.profile.role.as_str())
		.bind(join.company_id.as_str())
		.bind(now.to_rfc3339())
		.bind(now.to_rfc3339())
		.execute(&mut *tx)
		.await?;
		if created.rows_affected() == 0 {
			tracing::info!("identity already has a profile");
			return Ok(JoinOutcome::ProfileTaken);
		}

		let driver = Driver {
			id: join.profile.id.clone(),
			company_id: join.company_id.clone(),
			driver_code: Some(driver_code(&join.nonce)),
			vehicle_type: join.vehicle_type,
			license_plate: join.license_plate.clone(),
			is_active: true,
			is_available: true,
			current_lat: None,
			current_lng: None,
			created_at: now,
			updated_at: now,
		};
		insert_driver(&mut *tx, &driver).await?;

		tx.commit().await?;
		tracing::info!(driver_id = %driver.id, company_id = %driver.company_id, "driver joined company");
		Ok(JoinOutcome::Joined(driver))
	}

	fn row_to_driver(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Driver, DbError> {
		let vehicle_type: String = row.get("vehicle_type");
		let is_active: i64 = row.get("is_active");
		let is_available: i64 = row.get("is_available");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		Ok(Driver {
			id: UserId::new(row.get::<String, _>("id")),
			company_id: CompanyId::new(row.get::<String, _>("company_id")),
			driver_code: row.get("driver_code"),
			vehicle_type: parse_enum(&vehicle_type, "vehicle_type")?,
			license_plate: row.get("license_plate"),
			is_active: is_active != 0,
			is_available: is_available != 0,
			current_lat: row.get("current_lat"),
			current_lng: row.get("current_lng"),
			created_at: parse_timestamp(&created_at, "created_at")?,
			updated_at: parse_timestamp(&updated_at, "updated_at")?,
		})
	}
}

/// Short code shown to dispatchers, derived from the invitation nonce.
fn driver_code(nonce: &str) -> String {
	let short: String = nonce.chars().take(8).collect();
	format!("DRV-{}", short.to_uppercase())
}

async fn insert_driver<'e, E>(executor: E, driver: &Driver) -> Result<(), DbError>
where
	E: sqlx::Executor<'e, Database = sqlx::Sqlite>,
{
	sqlx::query(
		r#"
		INSERT INTO drivers (
			id, company_id, driver_code, vehicle_type, license_plate, is_active,
			is_available, current_lat, current_lng, created_at, updated_at
		)
		VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
		"#,
	)
	.bind(driver.id.as_str())
	.bind(driver.company_id.as_str())
	.bind(&driver.driver_code)
	.bind(driver.vehicle_type.as_str())
	.bind(&driver.license_plate)
	.bind(driver.is_active as i32)
	.bind(driver.is_available as i32)
	.bind(driver.current_lat)
	.bind(driver.current_lng)
	.bind(driver.created_at.to_rfc3339())
	.bind(driver.updated_at.to_rfc3339())
	.execute(executor)
	.await?;
	Ok(())
}

#[async_trait]
impl DriverStore for DriverRepository {
	async fn get_driver(&self, id: &UserId) -> Result<Option<Driver>, DbError> {
		self.get_driver(id).await
	}

	async fn create_driver(&self, driver: &Driver) -> Result<(), DbError> {
		self.create_driver(driver).await
	}

	async fn list_company_drivers(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<DriverWithProfile>, DbError> {
		self.list_company_drivers(company_id).await
	}

	async fn count_company_drivers(&self, company_id: &CompanyId) -> Result<i64, DbError> {
		self.count_company_drivers(company_id).await
	}

	async fn join_company(&self, join: &DriverJoin) -> Result<JoinOutcome, DbError> {
		self.join_company(join).await
	}
}
