// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Delivery repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fleetdesk_server_auth::{CompanyId, DeliveryId, RouteId, UserId};
use sqlx::{sqlite::SqlitePool, QueryBuilder, Row, Sqlite};

use crate::error::DbError;
use crate::rows::{parse_enum, parse_optional_timestamp, parse_timestamp};
use crate::types::{Delivery, DeliveryStatus, NewDelivery, StatusCounts};

/// Narrowing for delivery listings.
#[derive(Debug, Clone, Default)]
pub struct DeliveryFilter {
	pub status: Option<DeliveryStatus>,
	/// Only deliveries assigned to this driver.
	pub driver_id: Option<UserId>,
	pub limit: Option<i64>,
}

#[async_trait]
pub trait DeliveryStore: Send + Sync {
	async fn create_delivery(&self, delivery: &NewDelivery) -> Result<Delivery, DbError>;
	async fn get_delivery(&self, id: &DeliveryId) -> Result<Option<Delivery>, DbError>;
	async fn list_company_deliveries(
		&self,
		company_id: &CompanyId,
		filter: &DeliveryFilter,
	) -> Result<Vec<Delivery>, DbError>;
	async fn update_status(
		&self,
		id: &DeliveryId,
		status: DeliveryStatus,
	) -> Result<Option<Delivery>, DbError>;
	async fn count_by_status(&self, company_id: Option<&CompanyId>)
		-> Result<StatusCounts, DbError>;
	async fn count_delivered_since(&self, since: DateTime<Utc>) -> Result<i64, DbError>;
}

/// Repository for delivery database operations.
#[derive(Clone)]
pub struct DeliveryRepository {
	pool: SqlitePool,
}

const DELIVERY_COLUMNS: &str = "id, company_id, driver_id, route_id, customer_name, customer_phone, \
	customer_email, pickup_address, delivery_address, status, priority, notes, scheduled_at, \
	completed_at, created_at, updated_at";

impl DeliveryRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, delivery), fields(company_id = %delivery.company_id))]
	pub async fn create_delivery(&self, delivery: &NewDelivery) -> Result<Delivery, DbError> {
		let now = Utc::now();
		let created = Delivery {
			id: DeliveryId::generate(),
			company_id: delivery.company_id.clone(),
			driver_id: delivery.driver_id.clone(),
			route_id: delivery.route_id.clone(),
			customer_name: delivery.customer_name.clone(),
			customer_phone: delivery.customer_phone.clone(),
			customer_email: delivery.customer_email.clone(),
			pickup_address: delivery.pickup_address.clone(),
			delivery_address: delivery.delivery_address.clone(),
			status: delivery.initial_status(),
			priority: delivery.priority,
			notes: delivery.notes.clone(),
			scheduled_at: delivery.scheduled_at,
			completed_at: None,
			created_at: now,
			updated_at: now,
		};

		sqlx::query(&format!(
			"INSERT INTO deliveries ({DELIVERY_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
		))
		.bind(created.id.as_str())
		.bind(created.company_id.as_str())
		.bind(created.driver_id.as_ref().map(|d| d.as_str()))
		.bind(created.route_id.as_ref().map(|r| r.as_str()))
		.bind(&created.customer_name)
		.bind(&created.customer_phone)
		.bind(&created.customer_email)
		.bind(&created.pickup_address)
		.bind(&created.delivery_address)
		.bind(created.status.as_str())
		.bind(created.priority.as_str())
		.bind(&created.notes)
		.bind(created.scheduled_at.map(|t| t.to_rfc3339()))
		.bind(Option::<String>::None)
		.bind(created.created_at.to_rfc3339())
		.bind(created.updated_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(delivery_id = %created.id, status = %created.status, "delivery created");
		Ok(created)
	}

	#[tracing::instrument(skip(self), fields(delivery_id = %id))]
	pub async fn get_delivery(&self, id: &DeliveryId) -> Result<Option<Delivery>, DbError> {
		let row = sqlx::query(&format!(
			"SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE id = ?"
		))
		.bind(id.as_str())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| self.row_to_delivery(&r)).transpose()
	}

	/// Deliveries of a company, newest first.
	#[tracing::instrument(skip(self, filter), fields(company_id = %company_id, status = ?filter.status))]
	pub async fn list_company_deliveries(
		&self,
		company_id: &CompanyId,
		filter: &DeliveryFilter,
	) -> Result<Vec<Delivery>, DbError> {
		let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
			"SELECT {DELIVERY_COLUMNS} FROM deliveries WHERE company_id = "
		));
		query.push_bind(company_id.as_str().to_string());
		if let Some(status) = filter.status {
			query.push(" AND status = ").push_bind(status.as_str());
		}
		if let Some(driver_id) = &filter.driver_id {
			query
				.push(" AND driver_id = ")
				.push_bind(driver_id.as_str().to_string());
		}
		query.push(" ORDER BY created_at DESC, id ASC");
		if let Some(limit) = filter.limit {
			query.push(" LIMIT ").push_bind(limit);
		}

		let rows = query.build().fetch_all(&self.pool).await?;
		rows.iter().map(|r| self.row_to_delivery(r)).collect()
	}

	/// Move a delivery to `status`. Reaching `delivered` stamps `completed_at`.
	#[tracing::instrument(skip(self), fields(delivery_id = %id, status = %status))]
	pub async fn update_status(
		&self,
		id: &DeliveryId,
		status: DeliveryStatus,
	) -> Result<Option<Delivery>, DbError> {
		let now = Utc::now().to_rfc3339();
		let completed_at = (status == DeliveryStatus::Delivered).then(|| now.clone());
		let result = sqlx::query(
			r#"
			UPDATE deliveries
			SET status = ?, completed_at = COALESCE(?, completed_at), updated_at = ?
			WHERE id = ?
			"#,
		)
		.bind(status.as_str())
		.bind(completed_at)
		.bind(&now)
		.bind(id.as_str())
		.execute(&self.pool)
		.await?;

		if result.rows_affected() == 0 {
			return Ok(None);
		}
		self.get_delivery(id).await
	}

	/// Delivery counts per status, across the platform or for one company.
	#[tracing::instrument(skip(self))]
	pub async fn count_by_status(
		&self,
		company_id: Option<&CompanyId>,
	) -> Result<StatusCounts, DbError> {
		let mut query: QueryBuilder<Sqlite> =
			QueryBuilder::new("SELECT status, COUNT(*) AS total FROM deliveries");
		if let Some(company_id) = company_id {
			query
				.push(" WHERE company_id = ")
				.push_bind(company_id.as_str().to_string());
		}
		query.push(" GROUP BY status");

		let rows = query.build().fetch_all(&self.pool).await?;
		let mut counts: StatusCounts = DeliveryStatus::all().iter().map(|s| (*s, 0)).collect();
		for row in rows {
			let status: String = row.get("status");
			let status: DeliveryStatus = parse_enum(&status, "status")?;
			let total: i64 = row.get("total");
			if let Some(entry) = counts.iter_mut().find(|(s, _)| *s == status) {
				entry.1 = total;
			}
		}
		Ok(counts)
	}

	/// Deliveries marked delivered at or after `since`.
	#[tracing::instrument(skip(self))]
	pub async fn count_delivered_since(&self, since: DateTime<Utc>) -> Result<i64, DbError> {
		let rows = sqlx::query(
			"SELECT completed_at FROM deliveries WHERE status = 'delivered' AND completed_at IS NOT NULL",
		)
		.fetch_all(&self.pool)
		.await?;

		let mut total = 0;
		for row in rows {
			let completed_at: String = row.get("completed_at");
			if parse_timestamp(&completed_at, "completed_at")? >= since {
				total += 1;
			}
		}
		Ok(total)
	}

	fn row_to_delivery(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Delivery, DbError> {
		let status: String = row.get("status");
		let priority: String = row.get("priority");
		let created_at: String = row.get("created_at");
		let updated_at: String = row.get("updated_at");

		Ok(Delivery {
			id: DeliveryId::new(row.get::<String, _>("id")),
			company_id: CompanyId::new(row.get::<String, _>("company_id")),
			driver_id: row.get::<Option<String>, _>("driver_id").map(UserId::new),
			route_id: row.get::<Option<String>, _>("route_id").map(RouteId::new),
			customer_name: row.get("customer_name"),
			customer_phone: row.get("customer_phone"),
			customer_email: row.get("customer_email"),
			pickup_address: row.get("pickup_address"),
			delivery_address: row.get("delivery_address"),
			status: parse_enum(&status, "status")?,
			priority: parse_enum(&priority, "priority")?,
			notes: row.get("notes"),
			scheduled_at: parse_optional_timestamp(row.get("scheduled_at"), "scheduled_at")?,
			completed_at: parse_optional_timestamp(row.get("completed_at"), "completed_at")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
			updated_at: parse_timestamp(&updated_at, "updated_at")?,
		})
	}
}

#[async_trait]
impl DeliveryStore for DeliveryRepository {
	async fn create_delivery(&self, delivery: &NewDelivery) -> Result<Delivery, DbError> {
		self.create_delivery(delivery).await
	}

	async fn get_delivery(&self, id: &DeliveryId) -> Result<Option<Delivery>, DbError> {
		self.get_delivery(id).await
	}

	async fn list_company_deliveries(
		&self,
		company_id: &CompanyId,
		filter: &DeliveryFilter,
	) -> Result<Vec<Delivery>, DbError> {
		self.list_company_deliveries(company_id, filter).await
	}

	async fn update_status(
		&self,
		id: &DeliveryId,
		status: DeliveryStatus,
	) -> Result<Option<Delivery>, DbError> {
		self.update_status(id, status).await
	}

	async fn count_by_status(
		&self,
		company_id: Option<&CompanyId>,
	) -> Result<StatusCounts, DbError> {
		self.count_by_status(company_id).await
	}

	async fn count_delivered_since(&self, since: DateTime<Utc>) -> Result<i64, DbError> {
		self.count_delivered_since(since).await
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::testing::{create_test_pool, seed_company};
	use crate::types::DeliveryPriority;
	use chrono::Duration;

	fn new_delivery(company: &str, driver: Option<&str>) -> NewDelivery {
		NewDelivery {
			company_id: CompanyId::new(company),
			driver_id: driver.map(UserId::new),
			route_id: None,
			customer_name: "Ana".to_string(),
			customer_phone: None,
			customer_email: None,
			pickup_address: Some("Almacén".to_string()),
			delivery_address: "Calle 1".to_string(),
			priority: DeliveryPriority::Alta,
			notes: None,
			scheduled_at: None,
		}
	}

	async fn repo_with_companies() -> DeliveryRepository {
		let pool = create_test_pool().await;
		seed_company(&pool, "C1", "Acme").await;
		seed_company(&pool, "C2", "Globex").await;
		DeliveryRepository::new(pool)
	}

	#[tokio::test]
	async fn create_and_get() {
		let repo = repo_with_companies().await;
		let created = repo.create_delivery(&new_delivery("C1", None)).await.unwrap();
		assert_eq!(created.status, DeliveryStatus::Pending);
		assert_eq!(repo.get_delivery(&created.id).await.unwrap(), Some(created));
	}

	#[tokio::test]
	async fn listing_is_tenant_scoped_and_filtered() {
		let repo = repo_with_companies().await;
		repo.create_delivery(&new_delivery("C1", None)).await.unwrap();
		repo.create_delivery(&new_delivery("C1", Some("D1"))).await.unwrap();
		repo.create_delivery(&new_delivery("C2", None)).await.unwrap();

		let c1 = CompanyId::new("C1");
		let all = repo
			.list_company_deliveries(&c1, &DeliveryFilter::default())
			.await
			.unwrap();
		assert_eq!(all.len(), 2);
		assert!(all.iter().all(|d| d.company_id == c1));

		let assigned = repo
			.list_company_deliveries(
				&c1,
				&DeliveryFilter {
					status: Some(DeliveryStatus::Assigned),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(assigned.len(), 1);

		let mine = repo
			.list_company_deliveries(
				&c1,
				&DeliveryFilter {
					driver_id: Some(UserId::new("D1")),
					..Default::default()
				},
			)
			.await
			.unwrap();
		assert_eq!(mine.len(), 1);
		assert_eq!(mine[0].driver_id, Some(UserId::new("D1")));
	}

	#[tokio::test]
	async fn delivered_stamps_completion() {
		let repo = repo_with_companies().await;
		let created = repo.create_delivery(&new_delivery("C1", Some("D1"))).await.unwrap();

		let in_transit = repo
			.update_status(&created.id, DeliveryStatus::InTransit)
			.await
			.unwrap()
			.unwrap();
		assert!(in_transit.completed_at.is_none());

		let delivered = repo
			.update_status(&created.id, DeliveryStatus::Delivered)
			.await
			.unwrap()
			.unwrap();
		assert!(delivered.completed_at.is_some());

		let since = Utc::now() - Duration::hours(1);
		assert_eq!(repo.count_delivered_since(since).await.unwrap(), 1);
		assert!(repo
			.update_status(&DeliveryId::new("missing"), DeliveryStatus::Failed)
			.await
			.unwrap()
			.is_none());
	}

	#[tokio::test]
	async fn status_counts_cover_every_status() {
		let repo = repo_with_companies().await;
		repo.create_delivery(&new_delivery("C1", None)).await.unwrap();
		repo.create_delivery(&new_delivery("C1", Some("D1"))).await.unwrap();
		repo.create_delivery(&new_delivery("C2", None)).await.unwrap();

		let c1 = repo
			.count_by_status(Some(&CompanyId::new("C1")))
			.await
			.unwrap();
		assert_eq!(c1.len(), DeliveryStatus::all().len());
		assert!(c1.contains(&(DeliveryStatus::Pending, 1)));
		assert!(c1.contains(&(DeliveryStatus::Assigned, 1)));
		assert!(c1.contains(&(DeliveryStatus::Delivered, 0)));

		let all = repo.count_by_status(None).await.unwrap();
		assert!(all.contains(&(DeliveryStatus::Pending, 2)));
	}
}
