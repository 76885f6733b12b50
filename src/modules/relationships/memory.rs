//! In-memory [`ReferenceStore`] for exercising relationship rules without a database.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rollcall_models::{Class, ClassId, Student, StudentId, Teacher, TeacherId};

use super::store::{ReferenceStore, StoreResult};

#[derive(Debug, Default)]
struct State {
    classes: HashMap<ClassId, Class>,
    teachers: HashMap<TeacherId, Teacher>,
    students: HashMap<StudentId, Student>,
    writes: usize,
}

#[derive(Debug, Default)]
pub struct MemoryReferenceStore {
    state: Mutex<State>,
}

impl MemoryReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Seeds a class as-is. Seeding does not count as a write.
    pub fn insert_class(&self, class: Class) {
        self.lock().classes.insert(class.id, class);
    }

    pub fn insert_teacher(&self, teacher: Teacher) {
        self.lock().teachers.insert(teacher.id, teacher);
    }

    pub fn insert_student(&self, student: Student) {
        self.lock().students.insert(student.id, student);
    }

    pub fn class(&self, id: ClassId) -> Option<Class> {
        self.lock().classes.get(&id).cloned()
    }

    pub fn teacher(&self, id: TeacherId) -> Option<Teacher> {
        self.lock().teachers.get(&id).cloned()
    }

    pub fn student(&self, id: StudentId) -> Option<Student> {
        self.lock().students.get(&id).cloned()
    }

    /// Number of mutating store calls made so far.
    pub fn writes(&self) -> usize {
        self.lock().writes
    }
}

impl ReferenceStore for MemoryReferenceStore {
    async fn find_class(&self, id: ClassId) -> StoreResult<Option<Class>> {
        Ok(self.class(id))
    }

    async fn find_teacher(&self, id: TeacherId) -> StoreResult<Option<Teacher>> {
        Ok(self.teacher(id))
    }

    async fn find_student(&self, id: StudentId) -> StoreResult<Option<Student>> {
        Ok(self.student(id))
    }

    async fn append_class_student(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> StoreResult<Option<Class>> {
        let mut state = self.lock();
        state.writes += 1;
        let Some(class) = state.classes.get_mut(&class_id) else {
            return Ok(None);
        };
        if class.has_student(student_id) || class.is_full() {
            return Ok(None);
        }
        class.student_ids.push(student_id);
        class.updated_at = Utc::now();
        Ok(Some(class.clone()))
    }

    async fn remove_class_student(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> StoreResult<Option<Class>> {
        let mut state = self.lock();
        state.writes += 1;
        Ok(state.classes.get_mut(&class_id).map(|class| {
            class.student_ids.retain(|id| *id != student_id);
            class.updated_at = Utc::now();
            class.clone()
        }))
    }

    async fn set_student_class(
        &self,
        student_id: StudentId,
        class_id: Option<ClassId>,
    ) -> StoreResult<bool> {
        let mut state = self.lock();
        state.writes += 1;
        Ok(state
            .students
            .get_mut(&student_id)
            .map(|student| {
                student.class_id = class_id;
                student.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn clear_class_from_students(&self, class_id: ClassId) -> StoreResult<u64> {
        let mut state = self.lock();
        state.writes += 1;
        let mut cleared = 0;
        for student in state.students.values_mut() {
            if student.class_id == Some(class_id) {
                student.class_id = None;
                student.updated_at = Utc::now();
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn set_class_teacher(
        &self,
        class_id: ClassId,
        teacher_id: Option<TeacherId>,
    ) -> StoreResult<Option<Class>> {
        let mut state = self.lock();
        state.writes += 1;
        Ok(state.classes.get_mut(&class_id).map(|class| {
            class.teacher_id = teacher_id;
            class.updated_at = Utc::now();
            class.clone()
        }))
    }

    async fn set_teacher_class(
        &self,
        teacher_id: TeacherId,
        class_id: Option<ClassId>,
    ) -> StoreResult<bool> {
        let mut state = self.lock();
        state.writes += 1;
        Ok(state
            .teachers
            .get_mut(&teacher_id)
            .map(|teacher| {
                teacher.assigned_class_id = class_id;
                teacher.updated_at = Utc::now();
            })
            .is_some())
    }

    async fn clear_teacher_assignments(&self, class_id: ClassId) -> StoreResult<u64> {
        let mut state = self.lock();
        state.writes += 1;
        let mut cleared = 0;
        for teacher in state.teachers.values_mut() {
            if teacher.assigned_class_id == Some(class_id) {
                teacher.assigned_class_id = None;
                teacher.updated_at = Utc::now();
                cleared += 1;
            }
        }
        Ok(cleared)
    }

    async fn delete_class(&self, id: ClassId) -> StoreResult<bool> {
        let mut state = self.lock();
        state.writes += 1;
        Ok(state.classes.remove(&id).is_some())
    }

    async fn delete_teacher(&self, id: TeacherId) -> StoreResult<bool> {
        let mut state = self.lock();
        state.writes += 1;
        Ok(state.teachers.remove(&id).is_some())
    }

    async fn delete_student(&self, id: StudentId) -> StoreResult<bool> {
        let mut state = self.lock();
        state.writes += 1;
        Ok(state.students.remove(&id).is_some())
    }
}
