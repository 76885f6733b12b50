//! Analytics read models, re-exported from the `rollcall-models` crate.

pub use rollcall_models::analytics::*;
