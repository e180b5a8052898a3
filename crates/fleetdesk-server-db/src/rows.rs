// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding shared by the repositories.

use chrono::{DateTime, NaiveDate, Utc};
use std::str::FromStr;

use crate::error::DbError;

pub(crate) fn parse_timestamp(value: &str, column: &str) -> Result<DateTime<Utc>, DbError> {
	Ok(DateTime::parse_from_rfc3339(value)
		.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))?
		.with_timezone(&Utc))
}

pub(crate) fn parse_optional_timestamp(
	value: Option<String>,
	column: &str,
) -> Result<Option<DateTime<Utc>>, DbError> {
	value.map(|v| parse_timestamp(&v, column)).transpose()
}

pub(crate) fn parse_date(value: Option<String>, column: &str) -> Result<Option<NaiveDate>, DbError> {
	value
		.map(|v| {
			NaiveDate::parse_from_str(&v, "%Y-%m-%d")
				.map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
		})
		.transpose()
}

pub(crate) fn parse_enum<T>(value: &str, column: &str) -> Result<T, DbError>
where
	T: FromStr<Err = String>,
{
	T::from_str(value).map_err(|e| DbError::Internal(format!("Invalid {column}: {e}")))
}

/// Escape `%`, `_` and `\` for use inside a `LIKE ... ESCAPE '\'` pattern.
pub(crate) fn like_pattern(search: &str) -> String {
	let mut escaped = String::with_capacity(search.len() + 2);
	escaped.push('%');
	for c in search.to_lowercase().chars() {
		if matches!(c, '%' | '_' | '\\') {
			escaped.push('\\');
		}
		escaped.push(c);
	}
	escaped.push('%');
	escaped
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::types::DeliveryStatus;
	use proptest::prelude::*;

	/// Undo `like_pattern`, failing on any unescaped wildcard in the body.
	fn unescape(pattern: &str) -> Option<String> {
		let body = pattern.strip_prefix('%')?.strip_suffix('%')?;
		let mut out = String::new();
		let mut chars = body.chars();
		while let Some(c) = chars.next() {
			match c {
				'\\' => out.push(chars.next()?),
				'%' | '_' => return None,
				c => out.push(c),
			}
		}
		Some(out)
	}

	#[test]
	fn like_pattern_escapes_wildcards() {
		assert_eq!(like_pattern("Acme"), "%acme%");
		assert_eq!(like_pattern("50%_off"), "%50\\%\\_off%");
	}

	proptest! {
		#[test]
		fn like_pattern_matches_the_search_literally(search in "[a-zA-Z0-9 %_\\\\]{0,24}") {
			let pattern = like_pattern(&search);
			prop_assert_eq!(unescape(&pattern), Some(search.to_lowercase()));
		}
	}

	#[test]
	fn bad_values_are_internal_errors() {
		assert!(matches!(
			parse_timestamp("yesterday", "created_at"),
			Err(DbError::Internal(_))
		));
		assert!(parse_enum::<DeliveryStatus>("lost", "status").is_err());
		assert_eq!(
			parse_date(Some("2025-03-01".to_string()), "scheduled_date").unwrap(),
			NaiveDate::from_ymd_opt(2025, 3, 1)
		);
	}
}
