// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Invitation redemption records.
//!
//! Redemption itself happens inside [`crate::DriverRepository::join_company`];
//! this repository only answers whether a nonce has been used.

use async_trait::async_trait;
use fleetdesk_server_auth::{CompanyId, UserId};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::rows::parse_timestamp;
use crate::types::InviteRedemption;

#[async_trait]
pub trait InviteStore: Send + Sync {
	async fn get_redemption(&self, nonce: &str) -> Result<Option<InviteRedemption>, DbError>;
	async fn is_redeemed(&self, nonce: &str) -> Result<bool, DbError>;
}

#[derive(Clone)]
pub struct InviteRepository {
	pool: SqlitePool,
}

impl InviteRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, nonce))]
	pub async fn get_redemption(&self, nonce: &str) -> Result<Option<InviteRedemption>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT nonce, company_id, redeemed_by, redeemed_at
			FROM invite_redemptions
			WHERE nonce = ?
			"#,
		)
		.bind(nonce)
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| {
			let redeemed_at: String = r.get("redeemed_at");
			Ok(InviteRedemption {
				nonce: r.get("nonce"),
				company_id: CompanyId::new(r.get::<String, _>("company_id")),
				redeemed_by: UserId::new(r.get::<String, _>("redeemed_by")),
				redeemed_at: parse_timestamp(&redeemed_at, "redeemed_at")?,
			})
		})
		.transpose()
	}

	pub async fn is_redeemed(&self, nonce: &str) -> Result<bool, DbError> {
		Ok(self.get_redemption(nonce).await?.is_some())
	}
}

#[async_trait]
impl InviteStore for InviteRepository {
	async fn get_redemption(&self, nonce: &str) -> Result<Option<InviteRedemption>, DbError> {
		self.get_redemption(nonce).await
	}

	async fn is_redeemed(&self, nonce: &str) -> Result<bool, DbError> {
		self.is_redeemed(nonce).await
	}
}
