//! Referential integrity between classes, teachers and students.
//!
//! Every write to `classes.student_ids`, `classes.teacher_id`,
//! `teachers.assigned_class_id` or `students.class_id` goes through
//! [`RelationshipService`], which talks to storage through [`ReferenceStore`].

#[cfg(any(test, feature = "test-utils"))]
pub mod memory;
pub mod pg_store;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryReferenceStore;
pub use pg_store::PgReferenceStore;
pub use service::RelationshipService;
pub use store::{ReferenceStore, StoreResult};
