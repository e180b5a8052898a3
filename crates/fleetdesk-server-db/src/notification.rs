// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use async_trait::async_trait;
use fleetdesk_server_auth::{CompanyId, DeliveryId, NotificationId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::rows::{parse_enum, parse_optional_timestamp, parse_timestamp};
use crate::types::Notification;

/// Most notifications returned by a company listing.
pub const NOTIFICATION_PAGE_LIMIT: i64 = 100;

#[async_trait]
pub trait NotificationStore: Send + Sync {
	async fn create_notification(&self, notification: &Notification) -> Result<(), DbError>;
	async fn list_company_notifications(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<Notification>, DbError>;
}

/// Repository for notification database operations.
#[derive(Clone)]
pub struct NotificationRepository {
	pool: SqlitePool,
}

impl NotificationRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, notification), fields(notification_id = %notification.id))]
	pub async fn create_notification(&self, notification: &Notification) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO notifications (id, company_id, delivery_id, channel, recipient, message, status, sent_at, created_at)
			VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(notification.id.as_str())
		.bind(notification.company_id.as_str())
		.bind(notification.delivery_id.as_ref().map(|d| d.as_str()))
		.bind(notification.channel.as_str())
		.bind(&notification.recipient)
		.bind(&notification.message)
		.bind(notification.status.as_str())
		.bind(notification.sent_at.map(|t| t.to_rfc3339()))
		.bind(notification.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		Ok(())
	}

	#[tracing::instrument(skip(self), fields(company_id = %company_id))]
	pub async fn list_company_notifications(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<Notification>, DbError> {
		let rows = sqlx::query(
			r#"
			SELECT id, company_id, delivery_id, channel, recipient, message, status, sent_at, created_at
			FROM notifications
			WHERE company_id = ?
			ORDER BY created_at DESC, id ASC
			LIMIT ?
			"#,
		)
		.bind(company_id.as_str())
		.bind(NOTIFICATION_PAGE_LIMIT)
		.fetch_all(&self.pool)
		.await?;

		rows.iter().map(|r| self.row_to_notification(r)).collect()
	}

	fn row_to_notification(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Notification, DbError> {
		let channel: String = row.get("channel");
		let status: String = row.get("status");
		let created_at: String = row.get("created_at");

		Ok(Notification {
			id: NotificationId::new(row.get::<String, _>("id")),
			company_id: CompanyId::new(row.get::<String, _>("company_id")),
			delivery_id: row.get::<Option<String>, _>("delivery_id").map(DeliveryId::new),
			channel: parse_enum(&channel, "channel")?,
			recipient: row.get("recipient"),
			message: row.get("message"),
			status: parse_enum(&status, "status")?,
			sent_at: parse_optional_timestamp(row.get("sent_at"), "sent_at")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
		})
	}
}

#[async_trait]
impl NotificationStore for NotificationRepository {
	async fn create_notification(&self, notification: &Notification) -> Result<(), DbError> {
		self.create_notification(notification).await
	}

	async fn list_company_notifications(
		&self,
		company_id: &CompanyId,
	) -> Result<Vec<Notification>, DbError> {
		self.list_company_notifications(company_id).await
	}
}
