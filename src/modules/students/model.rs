//! Student data models and DTOs, re-exported from the `rollcall-models` crate.

pub use rollcall_models::students::*;
