// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Secret wrapper type for FleetDesk.
//!
//! [`Secret<T>`] holds a sensitive value (signing keys, session tokens) and
//! guarantees that:
//!
//! - `Debug` and `Display` print [`REDACTED`] instead of the value
//! - the value is zeroized when the wrapper is dropped
//! - reading the value requires an explicit [`Secret::expose`] call
//!
//! `Serialize` is intentionally not implemented, so a secret cannot end up in
//! a JSON response by accident.

use std::fmt;

use zeroize::Zeroize;

/// Placeholder printed in place of secret values.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be logged.
pub struct Secret<T: Zeroize> {
	inner: T,
}

/// Convenience alias for the most common secret type.
pub type SecretString = Secret<String>;

impl<T: Zeroize> Secret<T> {
	/// Wrap a value.
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Borrow the underlying value.
	///
	/// Call sites should be easy to audit; keep the exposed reference short-lived.
	pub fn expose(&self) -> &T {
		&self.inner
	}
}

impl<T: Zeroize> Drop for Secret<T> {
	fn drop(&mut self) {
		self.inner.zeroize();
	}
}

impl<T: Zeroize + Clone> Clone for Secret<T> {
	fn clone(&self) -> Self {
		Self::new(self.inner.clone())
	}
}

impl<T: Zeroize> fmt::Debug for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> fmt::Display for Secret<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T: Zeroize> From<T> for Secret<T> {
	fn from(inner: T) -> Self {
		Self::new(inner)
	}
}

impl<T: Zeroize + PartialEq> PartialEq for Secret<T> {
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

#[cfg(feature = "serde")]
impl<'de, T> serde::Deserialize<'de> for Secret<T>
where
	T: Zeroize + serde::Deserialize<'de>,
{
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		T::deserialize(deserializer).map(Secret::new)
	}
}
