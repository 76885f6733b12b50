//! Single-field sorting and name filtering for list queries.
//!
//! Each entity exposes a whitelist of `(api field, column)` pairs. A `sortBy`
//! value is looked up in that whitelist, so the resulting `ORDER BY` clause
//! only ever contains known column names.

use anyhow::anyhow;

use crate::errors::AppError;

/// Column used when no `sortBy` is given.
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// A `(api field, column)` whitelist entry.
pub type SortField = (&'static str, &'static str);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: &'static str,
    pub descending: bool,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            column: DEFAULT_SORT_COLUMN,
            descending: false,
        }
    }
}

impl SortSpec {
    /// Parses `name`, `-name` or `+name` against the allowed fields.
    ///
    /// `None` yields the default `createdAt` ascending order.
    pub fn parse(sort_by: Option<&str>, allowed: &[SortField]) -> Result<Self, AppError> {
        let Some(raw) = sort_by.map(str::trim).filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };

        let (field, descending) = match raw.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (raw.strip_prefix('+').unwrap_or(raw), false),
        };

        allowed
            .iter()
            .find(|(api, _)| *api == field)
            .map(|(_, column)| Self {
                column: *column,
                descending,
            })
            .ok_or_else(|| AppError::bad_request(anyhow!("Invalid sort field")))
    }

    /// `ORDER BY` clause with `id` as a tie-breaker so pages stay stable.
    pub fn order_by(&self) -> String {
        let direction = if self.descending { "DESC" } else { "ASC" };
        format!("ORDER BY {} {}, id ASC", self.column, direction)
    }
}

/// Builds an `ILIKE` pattern matching `filter` as a literal substring.
pub fn name_pattern(filter: Option<&str>) -> Option<String> {
    let filter = filter.map(str::trim).filter(|f| !f.is_empty())?;
    let mut escaped = String::with_capacity(filter.len() + 2);
    escaped.push('%');
    for c in filter.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}
