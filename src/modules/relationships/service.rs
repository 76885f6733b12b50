use anyhow::anyhow;
use tracing::instrument;

use rollcall_core::{AppError, ErrorKind};
use rollcall_models::{Class, ClassId, StudentId, TeacherId};

use super::store::ReferenceStore;
use crate::metrics::track_relationship_operation;

/// Keeps the class/teacher/student pointers in agreement.
///
/// Invariants maintained after every successful call:
///
/// - a student listed by a class points back at that class, and vice versa
/// - a class's student list has no duplicates and never exceeds its limit
/// - `class.teacher` and `teacher.assignedClass` name each other or are both empty
///
/// Writes are issued one after another without a transaction. A failure
/// between two writes leaves the pointers disagreeing until the next
/// operation on the same records.
pub struct RelationshipService;

fn outcome<T>(result: &Result<T, AppError>) -> &'static str {
    match result {
        Ok(_) => "success",
        Err(err) => match err.kind {
            ErrorKind::Validation => "invalid",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::CapacityExceeded => "capacity_exceeded",
            ErrorKind::Store => "error",
        },
    }
}

fn record<T>(operation: &'static str, result: Result<T, AppError>) -> Result<T, AppError> {
    track_relationship_operation(operation, outcome(&result));
    result
}

fn already_assigned() -> AppError {
    AppError::conflict(anyhow!("Student already assigned to this class"))
}

fn limit_reached() -> AppError {
    AppError::capacity_exceeded(anyhow!("Student limit for this class is reached"))
}

fn class_not_found() -> AppError {
    AppError::not_found(anyhow!("Class not found"))
}

impl RelationshipService {
    /// Appends the student to the class list, then points the student at the class.
    #[instrument(skip(store))]
    pub async fn assign_student_to_class<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
        student_id: StudentId,
    ) -> Result<Class, AppError> {
        record(
            "assign_student_to_class",
            Self::assign(store, class_id, student_id).await,
        )
    }

    async fn assign<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
        student_id: StudentId,
    ) -> Result<Class, AppError> {
        let class = store.find_class(class_id).await?;
        let student = store.find_student(student_id).await?;
        let (Some(class), Some(student)) = (class, student) else {
            return Err(AppError::not_found(anyhow!("Class or student not found")));
        };

        if class.has_student(student_id) {
            return Err(already_assigned());
        }

        if let Some(current) = student.class_id
            && current != class_id
            && store.find_class(current).await?.is_some()
        {
            return Err(AppError::conflict(anyhow!(
                "Student is already assigned to another class"
            )));
        }

        if class.is_full() {
            return Err(limit_reached());
        }

        let updated = Self::append(store, class_id, student_id).await?;
        store.set_student_class(student_id, Some(class_id)).await?;

        tracing::info!(%class_id, %student_id, "Student assigned to class");
        Ok(updated)
    }

    /// Conditional append; a rejected append is re-read to report why.
    async fn append<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
        student_id: StudentId,
    ) -> Result<Class, AppError> {
        if let Some(class) = store.append_class_student(class_id, student_id).await? {
            return Ok(class);
        }

        match store.find_class(class_id).await? {
            None => Err(class_not_found()),
            Some(class) if class.has_student(student_id) => Err(already_assigned()),
            Some(_) => Err(limit_reached()),
        }
    }

    /// Removes the student from the class list and clears the student's class.
    #[instrument(skip(store))]
    pub async fn unassign_student_from_class<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
        student_id: StudentId,
    ) -> Result<Class, AppError> {
        record(
            "unassign_student_from_class",
            Self::unassign(store, class_id, student_id).await,
        )
    }

    async fn unassign<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
        student_id: StudentId,
    ) -> Result<Class, AppError> {
        let class = store.find_class(class_id).await?;
        let student = store.find_student(student_id).await?;
        let (Some(class), Some(student)) = (class, student) else {
            return Err(AppError::not_found(anyhow!("Class or student not found")));
        };

        if !class.has_student(student_id) {
            return Err(AppError::conflict(anyhow!(
                "Student is not assigned to this class"
            )));
        }

        let updated = store
            .remove_class_student(class_id, student_id)
            .await?
            .ok_or_else(class_not_found)?;

        if student.class_id == Some(class_id) {
            store.set_student_class(student_id, None).await?;
        }

        tracing::info!(%class_id, %student_id, "Student unassigned from class");
        Ok(updated)
    }

    /// Moves a student to `new_class_id`, detaching it from its current class first.
    ///
    /// Duplicate and capacity checks against the new class run before any
    /// write. A missing old class is skipped.
    #[instrument(skip(store))]
    pub async fn reassign_student_class<S: ReferenceStore>(
        store: &S,
        student_id: StudentId,
        new_class_id: ClassId,
    ) -> Result<Class, AppError> {
        record(
            "reassign_student_class",
            Self::reassign(store, student_id, new_class_id).await,
        )
    }

    async fn reassign<S: ReferenceStore>(
        store: &S,
        student_id: StudentId,
        new_class_id: ClassId,
    ) -> Result<Class, AppError> {
        let student = store
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;
        let new_class = store
            .find_class(new_class_id)
            .await?
            .ok_or_else(class_not_found)?;

        // Moving within the same class frees the slot it is about to take.
        let same_class = student.class_id == Some(new_class_id);
        let listed = new_class.has_student(student_id);

        if listed && !same_class {
            return Err(already_assigned());
        }
        if new_class.is_full() && !(same_class && listed) {
            return Err(limit_reached());
        }

        if let Some(old_class_id) = student.class_id {
            let detached = store.remove_class_student(old_class_id, student_id).await?;
            if detached.is_none() {
                tracing::warn!(%student_id, %old_class_id, "Previous class missing, skipping detach");
            }
        }

        let updated = Self::append(store, new_class_id, student_id).await?;
        store.set_student_class(student_id, Some(new_class_id)).await?;

        tracing::info!(%student_id, %new_class_id, "Student reassigned");
        Ok(updated)
    }

    /// Detaches a student from whatever class it points at. No-op for unassigned students.
    #[instrument(skip(store))]
    pub async fn unassign_student_class<S: ReferenceStore>(
        store: &S,
        student_id: StudentId,
    ) -> Result<(), AppError> {
        record(
            "unassign_student_class",
            Self::clear_student_class(store, student_id).await,
        )
    }

    async fn clear_student_class<S: ReferenceStore>(
        store: &S,
        student_id: StudentId,
    ) -> Result<(), AppError> {
        let student = store
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        if let Some(class_id) = student.class_id {
            store.remove_class_student(class_id, student_id).await?;
        }
        store.set_student_class(student_id, None).await?;

        Ok(())
    }

    /// Sets or clears the teacher of a class, updating `assignedClass` on both
    /// the outgoing and incoming teacher.
    #[instrument(skip(store))]
    pub async fn set_class_teacher<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
        teacher_id: Option<TeacherId>,
    ) -> Result<Class, AppError> {
        record(
            "set_class_teacher",
            Self::set_teacher(store, class_id, teacher_id).await,
        )
    }

    async fn set_teacher<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
        teacher_id: Option<TeacherId>,
    ) -> Result<Class, AppError> {
        store
            .find_class(class_id)
            .await?
            .ok_or_else(class_not_found)?;

        let Some(teacher_id) = teacher_id else {
            store.clear_teacher_assignments(class_id).await?;
            let updated = store
                .set_class_teacher(class_id, None)
                .await?
                .ok_or_else(class_not_found)?;
            tracing::info!(%class_id, "Class teacher cleared");
            return Ok(updated);
        };

        let teacher = store
            .find_teacher(teacher_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))?;

        store.clear_teacher_assignments(class_id).await?;

        // The incoming teacher leaves its previous class without a teacher.
        if let Some(previous) = teacher.assigned_class_id
            && previous != class_id
            && let Some(previous_class) = store.find_class(previous).await?
            && previous_class.teacher_id == Some(teacher_id)
        {
            store.set_class_teacher(previous, None).await?;
        }

        let updated = store
            .set_class_teacher(class_id, Some(teacher_id))
            .await?
            .ok_or_else(class_not_found)?;
        store.set_teacher_class(teacher_id, Some(class_id)).await?;

        tracing::info!(%class_id, %teacher_id, "Class teacher set");
        Ok(updated)
    }

    /// Clears every pointer to the class, then deletes it. Students and teachers are kept.
    #[instrument(skip(store))]
    pub async fn delete_class<S: ReferenceStore>(
        store: &S,
        class_id: ClassId,
    ) -> Result<(), AppError> {
        record("delete_class", Self::remove_class(store, class_id).await)
    }

    async fn remove_class<S: ReferenceStore>(store: &S, class_id: ClassId) -> Result<(), AppError> {
        store
            .find_class(class_id)
            .await?
            .ok_or_else(class_not_found)?;

        let teachers = store.clear_teacher_assignments(class_id).await?;
        let students = store.clear_class_from_students(class_id).await?;
        if !store.delete_class(class_id).await? {
            return Err(class_not_found());
        }

        tracing::info!(%class_id, teachers, students, "Class deleted");
        Ok(())
    }

    /// Refuses to delete a teacher that is still assigned to a class.
    #[instrument(skip(store))]
    pub async fn delete_teacher<S: ReferenceStore>(
        store: &S,
        teacher_id: TeacherId,
    ) -> Result<(), AppError> {
        record("delete_teacher", Self::remove_teacher(store, teacher_id).await)
    }

    async fn remove_teacher<S: ReferenceStore>(
        store: &S,
        teacher_id: TeacherId,
    ) -> Result<(), AppError> {
        let teacher = store
            .find_teacher(teacher_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))?;

        if teacher.assigned_class_id.is_some() {
            return Err(AppError::conflict(anyhow!(
                "Cannot delete teacher assigned to a class"
            )));
        }

        store.delete_teacher(teacher_id).await?;
        tracing::info!(%teacher_id, "Teacher deleted");
        Ok(())
    }

    /// Removes the student from its class list, then deletes it.
    #[instrument(skip(store))]
    pub async fn delete_student<S: ReferenceStore>(
        store: &S,
        student_id: StudentId,
    ) -> Result<(), AppError> {
        record("delete_student", Self::remove_student(store, student_id).await)
    }

    async fn remove_student<S: ReferenceStore>(
        store: &S,
        student_id: StudentId,
    ) -> Result<(), AppError> {
        let student = store
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))?;

        if let Some(class_id) = student.class_id {
            store.remove_class_student(class_id, student_id).await?;
        }

        store.delete_student(student_id).await?;
        tracing::info!(%student_id, "Student deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::relationships::memory::MemoryReferenceStore;
    use chrono::{NaiveDate, Utc};
    use rollcall_models::{Gender, Student, Teacher};

    fn class(limit: i32) -> Class {
        Class {
            id: ClassId::new(),
            name: "Grade 4B".to_string(),
            year: 2024,
            teacher_id: None,
            student_fees: 900.0,
            student_limit: limit,
            student_ids: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn teacher(name: &str) -> Teacher {
        Teacher {
            id: TeacherId::new(),
            name: name.to_string(),
            gender: Gender::Male,
            dob: NaiveDate::from_ymd_opt(1979, 3, 14).unwrap(),
            contact: "0123456789".to_string(),
            salary: 40000.0,
            email: format!("{}@school.test", name.to_lowercase()),
            assigned_class_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn student() -> Student {
        Student {
            id: StudentId::new(),
            name: "Student".to_string(),
            gender: Gender::Other,
            dob: NaiveDate::from_ymd_opt(2013, 9, 1).unwrap(),
            contact: "0123456789".to_string(),
            fees_paid: 0.0,
            class_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_set_class_teacher_replaces_previous_teacher() {
        let store = MemoryReferenceStore::new();
        let c = class(30);
        let first = teacher("First");
        let second = teacher("Second");
        store.insert_class(c.clone());
        store.insert_teacher(first.clone());
        store.insert_teacher(second.clone());

        RelationshipService::set_class_teacher(&store, c.id, Some(first.id))
            .await
            .unwrap();
        let updated = RelationshipService::set_class_teacher(&store, c.id, Some(second.id))
            .await
            .unwrap();

        assert_eq!(updated.teacher_id, Some(second.id));
        assert_eq!(store.teacher(first.id).unwrap().assigned_class_id, None);
        assert_eq!(store.teacher(second.id).unwrap().assigned_class_id, Some(c.id));
    }

    #[tokio::test]
    async fn test_moving_teacher_vacates_old_class() {
        let store = MemoryReferenceStore::new();
        let old_class = class(30);
        let new_class = class(30);
        let t = teacher("Mover");
        store.insert_class(old_class.clone());
        store.insert_class(new_class.clone());
        store.insert_teacher(t.clone());

        RelationshipService::set_class_teacher(&store, old_class.id, Some(t.id))
            .await
            .unwrap();
        RelationshipService::set_class_teacher(&store, new_class.id, Some(t.id))
            .await
            .unwrap();

        assert_eq!(store.class(old_class.id).unwrap().teacher_id, None);
        assert_eq!(store.class(new_class.id).unwrap().teacher_id, Some(t.id));
        assert_eq!(store.teacher(t.id).unwrap().assigned_class_id, Some(new_class.id));
    }

    #[tokio::test]
    async fn test_clearing_class_teacher_clears_both_sides() {
        let store = MemoryReferenceStore::new();
        let c = class(30);
        let t = teacher("Leaving");
        store.insert_class(c.clone());
        store.insert_teacher(t.clone());

        RelationshipService::set_class_teacher(&store, c.id, Some(t.id))
            .await
            .unwrap();
        let updated = RelationshipService::set_class_teacher(&store, c.id, None)
            .await
            .unwrap();

        assert_eq!(updated.teacher_id, None);
        assert_eq!(store.teacher(t.id).unwrap().assigned_class_id, None);
    }

    #[tokio::test]
    async fn test_set_class_teacher_missing_ids() {
        let store = MemoryReferenceStore::new();
        let c = class(30);
        store.insert_class(c.clone());

        let err = RelationshipService::set_class_teacher(&store, c.id, Some(TeacherId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
        assert_eq!(err.message(), "Teacher not found");

        let err = RelationshipService::set_class_teacher(&store, ClassId::new(), None)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Class not found");
        assert_eq!(store.writes(), 0);
    }

    #[tokio::test]
    async fn test_assign_rejects_student_in_another_class() {
        let store = MemoryReferenceStore::new();
        let a = class(30);
        let b = class(30);
        let s = student();
        store.insert_class(a.clone());
        store.insert_class(b.clone());
        store.insert_student(s.clone());

        RelationshipService::assign_student_to_class(&store, a.id, s.id)
            .await
            .unwrap();
        let err = RelationshipService::assign_student_to_class(&store, b.id, s.id)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Conflict);
        assert_eq!(err.message(), "Student is already assigned to another class");
        assert!(store.class(b.id).unwrap().student_ids.is_empty());
    }

    #[tokio::test]
    async fn test_assign_overwrites_dangling_student_pointer() {
        let store = MemoryReferenceStore::new();
        let c = class(30);
        let mut s = student();
        s.class_id = Some(ClassId::new());
        store.insert_class(c.clone());
        store.insert_student(s.clone());

        RelationshipService::assign_student_to_class(&store, c.id, s.id)
            .await
            .unwrap();

        assert_eq!(store.student(s.id).unwrap().class_id, Some(c.id));
    }

    #[tokio::test]
    async fn test_reassign_to_same_class_keeps_single_entry() {
        let store = MemoryReferenceStore::new();
        let c = class(1);
        let s = student();
        store.insert_class(c.clone());
        store.insert_student(s.clone());

        RelationshipService::assign_student_to_class(&store, c.id, s.id)
            .await
            .unwrap();
        let updated = RelationshipService::reassign_student_class(&store, s.id, c.id)
            .await
            .unwrap();

        assert_eq!(updated.student_ids, vec![s.id]);
        assert_eq!(store.student(s.id).unwrap().class_id, Some(c.id));
    }

    #[tokio::test]
    async fn test_reassign_into_full_class_writes_nothing() {
        let store = MemoryReferenceStore::new();
        let old = class(30);
        let full = class(1);
        let s = student();
        let occupant = student();
        store.insert_class(old.clone());
        store.insert_class(full.clone());
        store.insert_student(s.clone());
        store.insert_student(occupant.clone());

        RelationshipService::assign_student_to_class(&store, old.id, s.id)
            .await
            .unwrap();
        RelationshipService::assign_student_to_class(&store, full.id, occupant.id)
            .await
            .unwrap();
        let writes = store.writes();

        let err = RelationshipService::reassign_student_class(&store, s.id, full.id)
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::CapacityExceeded);
        assert_eq!(store.writes(), writes);
        assert_eq!(store.class(old.id).unwrap().student_ids, vec![s.id]);
    }

    #[tokio::test]
    async fn test_unassign_student_class_without_class_succeeds() {
        let store = MemoryReferenceStore::new();
        let s = student();
        store.insert_student(s.clone());

        RelationshipService::unassign_student_class(&store, s.id)
            .await
            .unwrap();
        assert_eq!(store.student(s.id).unwrap().class_id, None);

        let err = RelationshipService::unassign_student_class(&store, StudentId::new())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Student not found");
    }

    #[tokio::test]
    async fn test_delete_student_tolerates_missing_class() {
        let store = MemoryReferenceStore::new();
        let mut s = student();
        s.class_id = Some(ClassId::new());
        store.insert_student(s.clone());

        RelationshipService::delete_student(&store, s.id)
            .await
            .unwrap();
        assert!(store.student(s.id).is_none());
    }
}
