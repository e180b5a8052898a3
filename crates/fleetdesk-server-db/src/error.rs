// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use fleetdesk_server_auth::ResolveError;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
	#[error("Database error: {0}")]
	Sqlx(#[from] sqlx::Error),

	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),

	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),
}

impl DbError {
	/// Whether the error is a uniqueness or constraint violation.
	pub fn is_unique_violation(&self) -> bool {
		match self {
			DbError::Conflict(_) => true,
			DbError::Sqlx(sqlx::Error::Database(e)) => e.is_unique_violation(),
			_ => false,
		}
	}
}

impl From<DbError> for ResolveError {
	fn from(e: DbError) -> Self {
		ResolveError::Store(e.to_string())
	}
}

pub type Result<T> = std::result::Result<T, DbError>;
