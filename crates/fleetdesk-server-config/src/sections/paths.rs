// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filesystem paths.

use serde::Deserialize;

#[derive(Debug, Clone, Default)]
pub struct PathsConfig {
	/// Directory holding the built web bundle. Pages are not served when unset.
	pub web_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfigLayer {
	#[serde(default)]
	pub web_dir: Option<String>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: PathsConfigLayer) {
		if other.web_dir.is_some() {
			self.web_dir = other.web_dir;
		}
	}

	pub fn finalize(self) -> PathsConfig {
		PathsConfig {
			web_dir: self.web_dir,
		}
	}
}
