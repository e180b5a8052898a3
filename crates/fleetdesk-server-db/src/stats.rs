// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Platform-wide figures for the admin overview.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::{sqlite::SqlitePool, Row};

use crate::delivery::DeliveryRepository;
use crate::error::DbError;
use crate::rows::parse_timestamp;
use crate::types::PlatformStats;

#[async_trait]
pub trait StatsStore: Send + Sync {
	async fn platform_stats(&self, now: DateTime<Utc>) -> Result<PlatformStats, DbError>;
}

#[derive(Clone)]
pub struct StatsRepository {
	pool: SqlitePool,
	deliveries: DeliveryRepository,
}

impl StatsRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self {
			deliveries: DeliveryRepository::new(pool.clone()),
			pool,
		}
	}

	/// Totals, recent activity relative to `now`, and delivery status counts.
	///
	/// "Today" starts at UTC midnight.
	#[tracing::instrument(skip(self))]
	pub async fn platform_stats(&self, now: DateTime<Utc>) -> Result<PlatformStats, DbError> {
		let totals = sqlx::query(
			r#"
			SELECT
				(SELECT COUNT(*) FROM companies) AS total_companies,
				(SELECT COUNT(*) FROM companies WHERE is_active = 1) AS active_companies,
				(SELECT COUNT(*) FROM drivers) AS total_drivers,
				(SELECT COUNT(*) FROM deliveries) AS total_deliveries,
				(SELECT COUNT(*) FROM routes) AS total_routes
			"#,
		)
		.fetch_one(&self.pool)
		.await?;

		let month_ago = now - Duration::days(30);
		let created: Vec<String> = sqlx::query("SELECT created_at FROM companies")
			.fetch_all(&self.pool)
			.await?
			.iter()
			.map(|r| r.get("created_at"))
			.collect();
		let mut new_companies_last_30_days = 0;
		for created_at in &created {
			if parse_timestamp(created_at, "created_at")? >= month_ago {
				new_companies_last_30_days += 1;
			}
		}

		let midnight = now
			.date_naive()
			.and_hms_opt(0, 0, 0)
			.map(|t| t.and_utc())
			.unwrap_or(now);

		Ok(PlatformStats {
			total_companies: totals.get("total_companies"),
			active_companies: totals.get("active_companies"),
			total_drivers: totals.get("total_drivers"),
			total_deliveries: totals.get("total_deliveries"),
			total_routes: totals.get("total_routes"),
			new_companies_last_30_days,
			deliveries_today: self.deliveries.count_delivered_since(midnight).await?,
			deliveries_by_status: self.deliveries.count_by_status(None).await?,
		})
	}
}

#[async_trait]
impl StatsStore for StatsRepository {
	async fn platform_stats(&self, now: DateTime<Utc>) -> Result<PlatformStats, DbError> {
		self.platform_stats(now).await
	}
}
