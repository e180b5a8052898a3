// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session repository: the local identity-provider seam.
//!
//! Tokens are never stored. Lookups hash the presented token and compare
//! against `token_hash`.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use fleetdesk_server_auth::{
	generate_session_token, hash_token, Identity, ResolveError, SessionResolver, UserId,
};
use sqlx::{sqlite::SqlitePool, Row};

use crate::error::DbError;
use crate::rows::parse_timestamp;
use crate::types::Session;

#[async_trait]
pub trait SessionStore: Send + Sync {
	async fn create_session(
		&self,
		identity: &Identity,
		ttl: Duration,
	) -> Result<(String, Session), DbError>;
	async fn find_active_session(&self, token: &str) -> Result<Option<Session>, DbError>;
	async fn delete_session(&self, token: &str) -> Result<bool, DbError>;
	async fn delete_expired_sessions(&self) -> Result<u64, DbError>;
}

/// Repository for session database operations.
#[derive(Clone)]
pub struct SessionRepository {
	pool: SqlitePool,
}

impl SessionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Create a session for `identity` and return the raw token with the stored row.
	///
	/// The raw token is only available here; hand it to the client and drop it.
	#[tracing::instrument(skip(self, identity), fields(user_id = %identity.user_id))]
	pub async fn create_session(
		&self,
		identity: &Identity,
		ttl: Duration,
	) -> Result<(String, Session), DbError> {
		let token = generate_session_token();
		let now = Utc::now();
		let session = Session {
			token_hash: hash_token(&token),
			user_id: identity.user_id.clone(),
			email: identity.email.clone(),
			expires_at: now + ttl,
			created_at: now,
		};

		sqlx::query(
			r#"
			INSERT INTO sessions (token_hash, user_id, email, expires_at, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(&session.token_hash)
		.bind(session.user_id.as_str())
		.bind(&session.email)
		.bind(session.expires_at.to_rfc3339())
		.bind(session.created_at.to_rfc3339())
		.execute(&self.pool)
		.await?;

		tracing::debug!(user_id = %session.user_id, "session created");
		Ok((token, session))
	}

	/// Find the unexpired session for a raw token.
	#[tracing::instrument(skip(self, token))]
	pub async fn find_active_session(&self, token: &str) -> Result<Option<Session>, DbError> {
		self.find_active_session_at(token, Utc::now()).await
	}

	async fn find_active_session_at(
		&self,
		token: &str,
		now: DateTime<Utc>,
	) -> Result<Option<Session>, DbError> {
		let row = sqlx::query(
			r#"
			SELECT token_hash, user_id, email, expires_at, created_at
			FROM sessions
			WHERE token_hash = ?
			"#,
		)
		.bind(hash_token(token))
		.fetch_optional(&self.pool)
		.await?;

		let Some(session) = row.map(|r| self.row_to_session(&r)).transpose()? else {
			return Ok(None);
		};

		// Compared after parsing: RFC 3339 strings with offsets do not sort lexically.
		if session.expires_at <= now {
			tracing::debug!(user_id = %session.user_id, "session expired");
			return Ok(None);
		}
		Ok(Some(session))
	}

	/// Delete the session for a raw token. Returns whether one existed.
	#[tracing::instrument(skip(self, token))]
	pub async fn delete_session(&self, token: &str) -> Result<bool, DbError> {
		let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
			.bind(hash_token(token))
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	/// Remove every expired session.
	#[tracing::instrument(skip(self))]
	pub async fn delete_expired_sessions(&self) -> Result<u64, DbError> {
		let now = Utc::now();
		let rows = sqlx::query("SELECT token_hash, expires_at FROM sessions")
			.fetch_all(&self.pool)
			.await?;

		let mut removed = 0;
		for row in rows {
			let expires_at: String = row.get("expires_at");
			if parse_timestamp(&expires_at, "expires_at")? <= now {
				let token_hash: String = row.get("token_hash");
				removed += sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
					.bind(token_hash)
					.execute(&self.pool)
					.await?
					.rows_affected();
			}
		}

		if removed > 0 {
			tracing::info!(removed, "expired sessions removed");
		}
		Ok(removed)
	}

	fn row_to_session(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Session, DbError> {
		let expires_at: String = row.get("expires_at");
		let created_at: String = row.get("created_at");
		Ok(Session {
			token_hash: row.get("token_hash"),
			user_id: UserId::new(row.get::<String, _>("user_id")),
			email: row.get("email"),
			expires_at: parse_timestamp(&expires_at, "expires_at")?,
			created_at: parse_timestamp(&created_at, "created_at")?,
		})
	}
}

#[async_trait]
impl SessionStore for SessionRepository {
	async fn create_session(
		&self,
		identity: &Identity,
		ttl: Duration,
	) -> Result<(String, Session), DbError> {
		self.create_session(identity, ttl).await
	}

	async fn find_active_session(&self, token: &str) -> Result<Option<Session>, DbError> {
		self.find_active_session(token).await
	}

	async fn delete_session(&self, token: &str) -> Result<bool, DbError> {
		self.delete_session(token).await
	}

	async fn delete_expired_sessions(&self) -> Result<u64, DbError> {
		self.delete_expired_sessions().await
	}
}

#[async_trait]
impl SessionResolver for SessionRepository {
	async fn resolve_session(&self, token: &str) -> Result<Option<Identity>, ResolveError> {
		let session = self
			.find_active_session(token)
			.await
			.map_err(|e| ResolveError::Provider(e.to_string()))?;
		Ok(session.map(|s| Identity::new(s.user_id, s.email)))
	}
}
