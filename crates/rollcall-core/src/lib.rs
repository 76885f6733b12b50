//! # Rollcall Core
//!
//! Core types, errors, and query utilities for the Rollcall API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`pagination`]: List query parameters and pagination metadata
//! - [`sort`]: Whitelisted single-field sorting and `ILIKE` name filters
//! - [`serde`]: Custom deserialization helpers for query strings and DTOs
//!
//! # Example
//!
//! ```ignore
//! use rollcall_core::{AppError, ListParams, PaginationMeta, SortSpec};
//!
//! let error = AppError::not_found(anyhow::anyhow!("Class not found"));
//!
//! let params = ListParams::default();
//! let sort = SortSpec::parse(params.sort_by.as_deref(), &[("name", "name")])?;
//! let meta = PaginationMeta::new(42, &params);
//! ```

pub mod errors;
pub mod pagination;
pub mod serde;
pub mod sort;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorKind};
pub use pagination::{ListParams, PaginationMeta};
pub use sort::{SortField, SortSpec, name_pattern};
