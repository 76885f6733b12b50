use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use rollcall_core::{AppError, ListParams, PaginationMeta, SortSpec, name_pattern};
use rollcall_models::{ClassId, ClassSummary, Gender, StudentId};

use crate::metrics::track_entity_created;
use crate::modules::relationships::{PgReferenceStore, RelationshipService};
use crate::modules::students::model::{
    CreateStudentDto, PaginatedStudentsResponse, STUDENT_COLUMNS, STUDENT_SORT_FIELDS, Student,
    StudentWithClass, UpdateStudentDto,
};

pub struct StudentService;

fn parse_gender(gender: &str) -> Result<Gender, AppError> {
    gender.parse::<Gender>().map_err(AppError::bad_request)
}

impl StudentService {
    /// Students are created unassigned; classes are attached through `assign-class`.
    #[instrument(skip(db))]
    pub async fn create_student(db: &PgPool, dto: CreateStudentDto) -> Result<Student, AppError> {
        let gender = parse_gender(&dto.gender)?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"INSERT INTO students (name, gender, dob, contact, fees_paid)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(&dto.name)
        .bind(gender)
        .bind(dto.dob)
        .bind(&dto.contact)
        .bind(dto.fees_paid)
        .fetch_one(db)
        .await?;

        track_entity_created("student");
        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_students(
        db: &PgPool,
        params: ListParams,
        include_class: bool,
    ) -> Result<PaginatedStudentsResponse, AppError> {
        let sort = SortSpec::parse(params.sort_by.as_deref(), STUDENT_SORT_FIELDS)?;
        let pattern = name_pattern(params.filter.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM students WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(db)
        .await?;

        let students = sqlx::query_as::<_, Student>(&format!(
            r#"SELECT {STUDENT_COLUMNS} FROM students
               WHERE ($1::text IS NULL OR name ILIKE $1)
               {}
               LIMIT $2 OFFSET $3"#,
            sort.order_by()
        ))
        .bind(&pattern)
        .bind(params.limit())
        .bind(params.offset())
        .fetch_all(db)
        .await?;

        let students = if include_class {
            Self::with_class(db, students).await?
        } else {
            students
                .into_iter()
                .map(|student| StudentWithClass {
                    student,
                    class_info: None,
                })
                .collect()
        };

        Ok(PaginatedStudentsResponse {
            students,
            meta: PaginationMeta::new(total, &params),
        })
    }

    /// Resolves each student's class to `{id, name, year}`. Dangling ids resolve to nothing.
    async fn with_class(
        db: &PgPool,
        students: Vec<Student>,
    ) -> Result<Vec<StudentWithClass>, AppError> {
        let class_ids: Vec<ClassId> = students.iter().filter_map(|s| s.class_id).collect();

        let classes: HashMap<ClassId, ClassSummary> = if class_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, ClassSummary>(
                "SELECT id, name, year FROM classes WHERE id = ANY($1)",
            )
            .bind(&class_ids)
            .fetch_all(db)
            .await?
            .into_iter()
            .map(|c| (c.id, c))
            .collect()
        };

        Ok(students
            .into_iter()
            .map(|student| {
                let class_info = student.class_id.and_then(|id| classes.get(&id).cloned());
                StudentWithClass {
                    student,
                    class_info,
                }
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: StudentId) -> Result<Student, AppError> {
        sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn update_student(
        db: &PgPool,
        id: StudentId,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let gender = dto.gender.as_deref().map(parse_gender).transpose()?;

        sqlx::query_as::<_, Student>(&format!(
            r#"UPDATE students SET
                 name = COALESCE($2, name),
                 gender = COALESCE($3, gender),
                 dob = COALESCE($4, dob),
                 contact = COALESCE($5, contact),
                 fees_paid = COALESCE($6, fees_paid),
                 updated_at = NOW()
               WHERE id = $1
               RETURNING {STUDENT_COLUMNS}"#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(gender)
        .bind(dto.dob)
        .bind(&dto.contact)
        .bind(dto.fees_paid)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Student not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        RelationshipService::delete_student(&PgReferenceStore::new(db.clone()), id).await
    }

    #[instrument(skip(db))]
    pub async fn assign_class(
        db: &PgPool,
        id: StudentId,
        class_id: ClassId,
    ) -> Result<(), AppError> {
        RelationshipService::reassign_student_class(&PgReferenceStore::new(db.clone()), id, class_id)
            .await?;
        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn unassign_class(db: &PgPool, id: StudentId) -> Result<(), AppError> {
        RelationshipService::unassign_student_class(&PgReferenceStore::new(db.clone()), id).await
    }
}
