// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Signed driver invitation codes.
//!
//! A code binds a company, an expiry and a random nonce under an HMAC-SHA256
//! signature:
//!
//! ```text
//! {company_id}.{expires_unix}.{nonce_hex}.{signature_hex}
//! ```
//!
//! Verification checks the signature in constant time and then the expiry.
//! Single use is enforced by the caller recording the nonce on redemption.

use chrono::{DateTime, Duration, TimeZone, Utc};
use fleetdesk_common_secret::Secret;
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::Serialize;
use sha2::Sha256;

use crate::types::CompanyId;

type HmacSha256 = Hmac<Sha256>;

const NONCE_BYTES: usize = 16;

/// Errors from issuing or verifying an invitation code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InviteError {
	#[error("invitation signing key must not be empty")]
	EmptyKey,

	#[error("invitation code is malformed")]
	Malformed,

	#[error("invitation code signature is invalid")]
	BadSignature,

	#[error("invitation code has expired")]
	Expired,
}

/// What a valid code vouches for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InviteClaims {
	pub company_id: CompanyId,
	pub expires_at: DateTime<Utc>,
	pub nonce: String,
}

/// A freshly issued code and its claims.
#[derive(Debug, Clone)]
pub struct IssuedInvite {
	pub code: String,
	pub claims: InviteClaims,
}

/// Issues and verifies invitation codes with a server-held key.
#[derive(Clone)]
pub struct InviteSigner {
	key: Secret<Vec<u8>>,
}

impl std::fmt::Debug for InviteSigner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InviteSigner").field("key", &self.key).finish()
	}
}

impl InviteSigner {
	pub fn new(key: impl Into<Vec<u8>>) -> Result<Self, InviteError> {
		let key = key.into();
		if key.is_empty() {
			return Err(InviteError::EmptyKey);
		}
		Ok(Self {
			key: Secret::new(key),
		})
	}

	/// Signer with a random key, for deployments that did not configure one.
	/// Codes stop verifying when the process restarts.
	pub fn ephemeral() -> Self {
		let mut key = vec![0u8; 32];
		rand::thread_rng().fill_bytes(&mut key);
		Self {
			key: Secret::new(key),
		}
	}

	fn mac(&self) -> Result<HmacSha256, InviteError> {
		HmacSha256::new_from_slice(self.key.expose()).map_err(|_| InviteError::EmptyKey)
	}

	/// Issue a code for `company_id` valid for `ttl` from `now`.
	pub fn issue(
		&self,
		company_id: &CompanyId,
		ttl: Duration,
		now: DateTime<Utc>,
	) -> Result<IssuedInvite, InviteError> {
		if company_id.as_str().is_empty() || company_id.as_str().contains('.') {
			return Err(InviteError::Malformed);
		}

		let expires_at = now + ttl;
		let mut nonce = [0u8; NONCE_BYTES];
		rand::thread_rng().fill_bytes(&mut nonce);
		let nonce = hex::encode(nonce);

		let payload = format!("{}.{}.{}", company_id, expires_at.timestamp(), nonce);
		let mut mac = self.mac()?;
		mac.update(payload.as_bytes());
		let signature = hex::encode(mac.finalize().into_bytes());

		Ok(IssuedInvite {
			code: format!("{payload}.{signature}"),
			claims: InviteClaims {
				company_id: company_id.clone(),
				// Claims carry the same second-resolution expiry the code encodes.
				expires_at: Utc
					.timestamp_opt(expires_at.timestamp(), 0)
					.single()
					.unwrap_or(expires_at),
				nonce,
			},
		})
	}

	/// Verify a code presented at `now`.
	pub fn verify(&self, code: &str, now: DateTime<Utc>) -> Result<InviteClaims, InviteError> {
		let code = code.trim();
		let (payload, signature) = code.rsplit_once('.').ok_or(InviteError::Malformed)?;

		let mut parts = payload.splitn(3, '.');
		let (Some(company), Some(expires), Some(nonce)) = (parts.next(), parts.next(), parts.next())
		else {
			return Err(InviteError::Malformed);
		};
		if company.is_empty() || nonce.is_empty() {
			return Err(InviteError::Malformed);
		}

		let signature = hex::decode(signature).map_err(|_| InviteError::Malformed)?;
		let mut mac = self.mac()?;
		mac.update(payload.as_bytes());
		mac
			.verify_slice(&signature)
			.map_err(|_| InviteError::BadSignature)?;

		let expires: i64 = expires.parse().map_err(|_| InviteError::Malformed)?;
		let expires_at = Utc
			.timestamp_opt(expires, 0)
			.single()
			.ok_or(InviteError::Malformed)?;
		if expires_at <= now {
			return Err(InviteError::Expired);
		}

		Ok(InviteClaims {
			company_id: CompanyId::new(company),
			expires_at,
			nonce: nonce.to_string(),
		})
	}
}
