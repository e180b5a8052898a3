// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared pagination utilities for API handlers.

use fleetdesk_server_api::PaginationResponse;

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// A 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
	pub page: i64,
	pub page_size: i64,
}

impl PageRequest {
	/// Clamp raw query values: page ≥ 1, 1 ≤ page_size ≤ [`MAX_PAGE_SIZE`].
	pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Self {
		Self {
			page: page.unwrap_or(1).max(1),
			page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
		}
	}

	pub fn offset(&self) -> i64 {
		(self.page - 1).saturating_mul(self.page_size)
	}

	pub fn response(&self, total: i64) -> PaginationResponse {
		PaginationResponse {
			page: self.page,
			page_size: self.page_size,
			total,
			total_pages: total_pages(total, self.page_size),
		}
	}
}

pub fn total_pages(total: i64, page_size: i64) -> i64 {
	if total <= 0 || page_size <= 0 {
		return 0;
	}
	(total + page_size - 1) / page_size
}
