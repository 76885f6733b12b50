use sqlx::PgPool;

use rollcall_models::{
    CLASS_COLUMNS, Class, ClassId, STUDENT_COLUMNS, Student, StudentId, TEACHER_COLUMNS, Teacher,
    TeacherId,
};

use super::store::{ReferenceStore, StoreResult};

/// [`ReferenceStore`] over the `classes`, `teachers` and `students` tables.
#[derive(Clone, Debug)]
pub struct PgReferenceStore {
    db: PgPool,
}

impl PgReferenceStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

impl ReferenceStore for PgReferenceStore {
    async fn find_class(&self, id: ClassId) -> StoreResult<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(&format!(
            "SELECT {CLASS_COLUMNS} FROM classes WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(class)
    }

    async fn find_teacher(&self, id: TeacherId) -> StoreResult<Option<Teacher>> {
        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(teacher)
    }

    async fn find_student(&self, id: StudentId) -> StoreResult<Option<Student>> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;
        Ok(student)
    }

    async fn append_class_student(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> StoreResult<Option<Class>> {
        // Membership and capacity are re-checked in the same statement as the write.
        let class = sqlx::query_as::<_, Class>(&format!(
            r#"UPDATE classes
               SET student_ids = array_append(student_ids, $2), updated_at = NOW()
               WHERE id = $1
                 AND NOT ($2 = ANY(student_ids))
                 AND cardinality(student_ids) < student_limit
               RETURNING {CLASS_COLUMNS}"#
        ))
        .bind(class_id)
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(class)
    }

    async fn remove_class_student(
        &self,
        class_id: ClassId,
        student_id: StudentId,
    ) -> StoreResult<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(&format!(
            r#"UPDATE classes
               SET student_ids = array_remove(student_ids, $2), updated_at = NOW()
               WHERE id = $1
               RETURNING {CLASS_COLUMNS}"#
        ))
        .bind(class_id)
        .bind(student_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(class)
    }

    async fn set_student_class(
        &self,
        student_id: StudentId,
        class_id: Option<ClassId>,
    ) -> StoreResult<bool> {
        let result =
            sqlx::query("UPDATE students SET class_id = $2, updated_at = NOW() WHERE id = $1")
                .bind(student_id)
                .bind(class_id)
                .execute(&self.db)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_class_from_students(&self, class_id: ClassId) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE students SET class_id = NULL, updated_at = NOW() WHERE class_id = $1",
        )
        .bind(class_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn set_class_teacher(
        &self,
        class_id: ClassId,
        teacher_id: Option<TeacherId>,
    ) -> StoreResult<Option<Class>> {
        let class = sqlx::query_as::<_, Class>(&format!(
            r#"UPDATE classes SET teacher_id = $2, updated_at = NOW()
               WHERE id = $1
               RETURNING {CLASS_COLUMNS}"#
        ))
        .bind(class_id)
        .bind(teacher_id)
        .fetch_optional(&self.db)
        .await?;
        Ok(class)
    }

    async fn set_teacher_class(
        &self,
        teacher_id: TeacherId,
        class_id: Option<ClassId>,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE teachers SET assigned_class_id = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(teacher_id)
        .bind(class_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear_teacher_assignments(&self, class_id: ClassId) -> StoreResult<u64> {
        let result = sqlx::query(
            r#"UPDATE teachers SET assigned_class_id = NULL, updated_at = NOW()
               WHERE assigned_class_id = $1"#,
        )
        .bind(class_id)
        .execute(&self.db)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_class(&self, id: ClassId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM classes WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_teacher(&self, id: TeacherId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM teachers WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_student(&self, id: StudentId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
