// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Session token helpers.
//!
//! Raw tokens only ever live in the client's cookie. The session store keeps
//! the SHA-256 hash.

use rand::RngCore;
use sha2::{Digest, Sha256};

/// Generate a new random session token (32 bytes, hex encoded).
pub fn generate_session_token() -> String {
	let mut bytes = [0u8; 32];
	rand::thread_rng().fill_bytes(&mut bytes);
	hex::encode(bytes)
}

/// Hash a session token for storage and lookup.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}
