// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment helpers for secrets.

use std::path::PathBuf;

use fleetdesk_common_secret::SecretString;

/// Errors raised while loading a secret from the environment.
#[derive(Debug, thiserror::Error)]
pub enum SecretEnvError {
	#[error("both {name} and {name}_FILE are set; use only one")]
	Conflict { name: String },

	#[error("failed to read secret file {path} for {name}: {source}")]
	FileRead {
		name: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file {path} for {name} is empty")]
	EmptyFile { name: String, path: PathBuf },
}

/// Load a secret from `name`, or from the file path in `{name}_FILE`.
///
/// Returns `Ok(None)` when neither variable is set. Empty values count as unset.
/// A single trailing newline in the file is stripped so that secrets written by
/// `echo` work as expected.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{name}_FILE");
	let direct = std::env::var(name).ok().filter(|v| !v.is_empty());
	let file = std::env::var(&file_var).ok().filter(|v| !v.is_empty());

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Conflict {
			name: name.to_string(),
		}),
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let mut content =
				std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
					name: name.to_string(),
					path: path.clone(),
					source,
				})?;

			if content.ends_with('\n') {
				content.pop();
				if content.ends_with('\r') {
					content.pop();
				}
			}

			if content.is_empty() {
				return Err(SecretEnvError::EmptyFile {
					name: name.to_string(),
					path,
				});
			}

			Ok(Some(SecretString::new(content)))
		}
		(None, None) => Ok(None),
	}
}
