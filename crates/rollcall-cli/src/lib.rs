//! # Rollcall CLI
//!
//! Database seeding utilities for Rollcall testing and development.
//!
//! This library crate provides the seeding functionality used by the CLI binary.
//!
//! ## Usage
//!
//! ```ignore
//! use rollcall_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(5, 5, 100);
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
