//! Storage seam for relationship bookkeeping.
//!
//! [`RelationshipService`](super::service::RelationshipService) is the only
//! caller of the pointer-writing methods below. Each method is a single-row
//! or single-statement write; multi-step operations are sequenced by the
//! service and are not atomic.

use std::future::Future;

use rollcall_core::AppError;
use rollcall_models::{Class, ClassId, Student, StudentId, Teacher, TeacherId};

pub type StoreResult<T> = Result<T, AppError>;

pub trait ReferenceStore: Send + Sync {
    fn find_class(&self, id: ClassId) -> impl Future<Output = StoreResult<Option<Class>>> + Send;

    fn find_teacher(
        &self,
        id: TeacherId,
    ) -> impl Future<Output = StoreResult<Option<Teacher>>> + Send;

    fn find_student(
        &self,
        id: StudentId,
    ) -> impl Future<Output = StoreResult<Option<Student>>> + Send;

    /// Appends `student_id` to the class list only if it is not listed yet
    /// and the list is below `student_limit`.
    ///
    /// Returns `None` when the class is missing or either condition fails.
    fn append_class_student(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> impl Future<Output = StoreResult<Option<Class>>> + Send;

    /// Removes every occurrence of `student_id` from the class list.
    ///
    /// Returns `None` when the class is missing.
    fn remove_class_student(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> impl Future<Output = StoreResult<Option<Class>>> + Send;

    /// Returns `false` when the student is missing.
    fn set_student_class(
        &self,
        student_id: StudentId,
        class_id: Option<ClassId>,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Clears `class` on every student pointing at `class_id`, in one statement.
    fn clear_class_from_students(
        &self,
        class_id: ClassId,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    fn set_class_teacher(
        &self,
        class_id: ClassId,
        teacher_id: Option<TeacherId>,
    ) -> impl Future<Output = StoreResult<Option<Class>>> + Send;

    /// Returns `false` when the teacher is missing.
    fn set_teacher_class(
        &self,
        teacher_id: TeacherId,
        class_id: Option<ClassId>,
    ) -> impl Future<Output = StoreResult<bool>> + Send;

    /// Clears `assignedClass` on every teacher pointing at `class_id`.
    fn clear_teacher_assignments(
        &self,
        class_id: ClassId,
    ) -> impl Future<Output = StoreResult<u64>> + Send;

    fn delete_class(&self, id: ClassId) -> impl Future<Output = StoreResult<bool>> + Send;

    fn delete_teacher(&self, id: TeacherId) -> impl Future<Output = StoreResult<bool>> + Send;

    fn delete_student(&self, id: StudentId) -> impl Future<Output = StoreResult<bool>> + Send;
}
