//! Pagination and list query parameters.
//!
//! Every list endpoint accepts the same query string:
//!
//! - `page`: 1-indexed page number (default: 1)
//! - `limit`: items per page (1-100, default: 10)
//! - `filter`: case-insensitive substring matched against `name`
//! - `sortBy`: a single field name, prefixed with `-` for descending order
//!
//! Responses carry `total`, `page`, `limit` and `totalPages` next to the
//! page of records, where `totalPages = ceil(total / limit)`.
//!
//! # Example
//!
//! ```ignore
//! // GET /api/students?page=3&limit=10
//! let params: ListParams = ...;
//! assert_eq!(params.offset(), 20);
//!
//! let meta = PaginationMeta::new(25, &params);
//! assert_eq!(meta.total_pages, 3);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::serde::{deserialize_optional_i64, deserialize_optional_string};

pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

/// Query parameters shared by the class, teacher and student list endpoints.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Page number (1-indexed, default: 1)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    /// Items per page (1-100, default: 10)
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub limit: Option<i64>,
    /// Case-insensitive substring filter on `name`
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub filter: Option<String>,
    /// Sort field; a leading `-` sorts descending (e.g. `-createdAt`)
    #[serde(
        default,
        rename = "sortBy",
        deserialize_with = "deserialize_optional_string"
    )]
    pub sort_by: Option<String>,
}

impl ListParams {
    /// Returns the page number, clamped to a minimum of 1.
    #[must_use]
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Returns the effective limit, clamped to [1, 100].
    #[must_use]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Number of records to skip: `(page - 1) * limit`, saturating at `i64::MAX`.
    #[must_use]
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Paging information returned next to every list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Total number of matching records across all pages
    pub total: i64,
    /// Current page (1-indexed)
    pub page: i64,
    /// Page size that was applied
    pub limit: i64,
    /// `ceil(total / limit)`
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, params: &ListParams) -> Self {
        let limit = params.limit();
        Self {
            total,
            page: params.page(),
            limit,
            total_pages: total_pages(total, limit),
        }
    }
}

/// `ceil(total / limit)`; zero records give zero pages.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    if total <= 0 || limit <= 0 {
        return 0;
    }
    (total + limit - 1) / limit
}
