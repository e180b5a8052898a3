// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use fleetdesk_server_auth::{CompanyId, RouteId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::rows::{parse_date, parse_enum, parse_timestamp};
use crate::types::Route;

#[async_trait]
pub trait RouteStore: Send + Sync {
	async fn create_route(&self, route: &Route) -> Result<(), DbError>;
	async fn get_route(&self, id: &RouteId) -> Result<Option<Route>, DbError>;
	async fn list_company_routes(
		&self,
		company_id: &CompanyId,
		active_only: bool,
	) -> Result<Vec<Route>, DbError>;
	async fn count_routes(&self) -> Result<i64, DbError>;
}

/// Repository for route database operations.
#[derive(Clone)]
pub struct RouteRepository {
	pool: SqlitePool,
}

impl RouteRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, route), fields(route_id = %route.id, company_id = %route.company_id))]
	pub async fn create_route(&self, route: &Route) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO routes (id, company_id, driver_id, name, status, scheduled_date, created_at, updated_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(route.id.as_str())
		.bind(route.company_id.as_str())
		.bind(route.driver_id.as_ref().map(|d| d.as_str()))
		.bind(&route.name)
		.bind(route.status.as_str())
		.bind(route.scheduled_date.map(|d| d.format("%Y-%m-%d").to_string()))
		.bind(route.created_at.to_rfc3339())
		.bind(route.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(route_id = %id))]
	pub async fn get_route(&self, id: &RouteId) -> Result<Option<Route>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, company_id, driver_id, name, status, scheduled_date, created_at, updated_at
			FROM routes
			WHERE id = ?
			"#,
		)
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_route(&r)).transpose()
	}

	/// Routes of a company, newest first. `active_only` keeps planned and in-progress routes.
	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_company_routes(
		&self,
		company_id: &CompanyId,
		active_only: bool,
	) -> Result<Vec<Route>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, company_id, driver_id, name, status, scheduled_date, created_at, updated_at
			FROM routes
			WHERE company_id = ?
				AND (? = 0 OR status IN ('planned', 'in_progress'))
			ORDER BY created_at DESC, id ASC
			"#,
		)
		.bind(company_id.as_str())
		.bind(active_only)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_route(r)).collect()
	}

	#[tracing::instrument(skip(self))]
	pub async fn count_routes(&self) -> Result<i64, DbError> {
		let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM routes")
			.fetch_one(&self.pool)
			.await?;
		Ok(count)
	}

	fn row_to_route(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Route, DbError> {
		let status: String = row.get("status");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		Ok(Route {
			id: RouteId::new(row.get::<String, _>("id")),
			company_id: CompanyId::new(row.get::<String, _>("company_id")),
			driver_id: row.get::<Option<String>, _>("driver_id").map(UserId::new),
			name: row.get("name"),
			status: parse_enum(&status, "status")?,
			scheduled_date: parse_date(row.get("scheduled_date"), "scheduled_date")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
			updated_at: parse_timestamp(&updated_at, "updated_at")?,
		})
	}
}

#[async_trait]
impl RouteStore for RouteRepository {
	async fn create_route(&self, route: &Route) -> Result<(), DbError> {
		self.create_route(route).await
	}

	async fn get_route(&self, id: &RouteId) -> Result<Option<Route>, DbError> {
		self.get_route(id).await
	}

	async fn list_company_routes(
		&self,
		company_id: &CompanyId,
		active_only: bool,
	) -> Result<Vec<Route>, DbError> {
		self.list_company_routes(company_id, active_only).await
	}

	async fn count_routes(&self) -> Result<i64, DbError> {
		self.count_routes().await
	}
}
