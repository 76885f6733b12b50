use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use rollcall_core::{AppError, ListParams, PaginationMeta, SortSpec, name_pattern};
use rollcall_models::{ClassId, StudentId, StudentSummary, TeacherId, TeacherSummary};

use crate::metrics::track_entity_created;
use crate::modules::classes::model::{
    CLASS_COLUMNS, CLASS_SORT_FIELDS, Class, ClassWithRelations, CreateClassDto,
    DEFAULT_STUDENT_LIMIT, PaginatedClassesResponse, UpdateClassDto,
};
use crate::modules::relationships::{PgReferenceStore, ReferenceStore, RelationshipService};

pub struct ClassService;

fn limit_below_enrolment() -> AppError {
    AppError::conflict(anyhow!(
        "Student limit cannot be lower than the number of assigned students"
    ))
}

impl ClassService {
    /// Inserts the class, then links the teacher (if any) through the relationship service.
    #[instrument(skip(db))]
    pub async fn create_class(db: &PgPool, dto: CreateClassDto) -> Result<Class, AppError> {
        let store = PgReferenceStore::new(db.clone());

        if let Some(teacher_id) = dto.teacher
            && store.find_teacher(teacher_id).await?.is_none()
        {
            return Err(AppError::missing_reference(anyhow!("Teacher not found")));
        }

        let class = sqlx::query_as::<_, Class>(&format!(
            r#"INSERT INTO classes (name, year, student_fees, student_limit)
               VALUES ($1, $2, $3, $4)
               RETURNING {CLASS_COLUMNS}"#
        ))
        .bind(&dto.name)
        .bind(dto.year)
        .bind(dto.student_fees)
        .bind(dto.student_limit.unwrap_or(DEFAULT_STUDENT_LIMIT))
        .fetch_one(db)
        .await?;

        track_entity_created("class");

        match dto.teacher {
            Some(teacher_id) => {
                RelationshipService::set_class_teacher(&store, class.id, Some(teacher_id)).await
            }
            None => Ok(class),
        }
    }

    #[instrument(skip(db))]
    pub async fn get_classes(
        db: &PgPool,
        params: ListParams,
    ) -> Result<PaginatedClassesResponse, AppError> {
        let sort = SortSpec::parse(params.sort_by.as_deref(), CLASS_SORT_FIELDS)?;
        let pattern = name_pattern(params.filter.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM classes WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(db)
        .await?;

        let classes = sqlx::query_as::<_, Class>(&format!(
            r#"SELECT {CLASS_COLUMNS} FROM classes
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

        Ok(PaginatedClassesResponse {
            classes: Self::with_relations(db, classes).await?,
            meta: PaginationMeta::new(total, &params),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_class(db: &PgPool, id: ClassId) -> Result<ClassWithRelations, AppError> {
        let class = PgReferenceStore::new(db.clone())
            .find_class(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))?;

        let mut populated = Self::with_relations(db, vec![class]).await?;
        populated
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))
    }

    /// Resolves teacher and student ids to `{id, name}` for a page of classes.
    pub async fn with_relations(
        db: &PgPool,
        classes: Vec<Class>,
    ) -> Result<Vec<ClassWithRelations>, AppError> {
        let teacher_ids: Vec<TeacherId> = classes.iter().filter_map(|c| c.teacher_id).collect();
        let student_ids: Vec<StudentId> = classes
            .iter()
            .flat_map(|c| c.student_ids.iter().copied())
            .collect();

        let teachers: HashMap<TeacherId, TeacherSummary> = if teacher_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, TeacherSummary>(
                "SELECT id, name FROM teachers WHERE id = ANY($1)",
            )
            .bind(&teacher_ids)
            .fetch_all(db)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect()
        };

        let students: HashMap<StudentId, StudentSummary> = if student_ids.is_empty() {
            HashMap::new()
        } else {
            sqlx::query_as::<_, StudentSummary>(
                "SELECT id, name FROM students WHERE id = ANY($1)",
            )
            .bind(&student_ids)
            .fetch_all(db)
            .await?
            .into_iter()
            .map(|s| (s.id, s))
            .collect()
        };

        Ok(classes
            .into_iter()
            .map(|class| {
                let teacher = class.teacher_id.and_then(|id| teachers.get(&id).cloned());
                let roster = class
                    .student_ids
                    .iter()
                    .filter_map(|id| students.get(id).cloned())
                    .collect();
                ClassWithRelations::new(class, teacher, roster)
            })
            .collect())
    }

    /// Updates plain fields; a `teacher` key is routed through the relationship service.
    #[instrument(skip(db))]
    pub async fn update_class(
        db: &PgPool,
        id: ClassId,
        dto: UpdateClassDto,
    ) -> Result<Class, AppError> {
        let store = PgReferenceStore::new(db.clone());

        let existing = store
            .find_class(id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))?;

        if let Some(limit) = dto.student_limit
            && usize::try_from(limit).unwrap_or(0) < existing.student_ids.len()
        {
            return Err(limit_below_enrolment());
        }

        if let Some(Some(teacher_id)) = dto.teacher
            && store.find_teacher(teacher_id).await?.is_none()
        {
            return Err(AppError::missing_reference(anyhow!("Teacher not found")));
        }

        // The limit guard is repeated in SQL so a concurrent assignment cannot slip under it.
        let updated = sqlx::query_as::<_, Class>(&format!(
            r#"UPDATE classes SET
                 name = COALESCE($2, name),
                 year = COALESCE($3, year),
                 student_fees = COALESCE($4, student_fees),
                 student_limit = COALESCE($5, student_limit),
                 updated_at = NOW()
               WHERE id = $1
                 AND ($5::int IS NULL OR $5 >= cardinality(student_ids))
               RETURNING {CLASS_COLUMNS}"#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(dto.year)
        .bind(dto.student_fees)
        .bind(dto.student_limit)
        .fetch_optional(db)
        .await?;

        let updated = match updated {
            Some(class) => class,
            None if store.find_class(id).await?.is_some() => return Err(limit_below_enrolment()),
            None => return Err(AppError::not_found(anyhow!("Class not found"))),
        };

        match dto.teacher {
            Some(teacher) => RelationshipService::set_class_teacher(&store, id, teacher).await,
            None => Ok(updated),
        }
    }

    #[instrument(skip(db))]
    pub async fn delete_class(db: &PgPool, id: ClassId) -> Result<(), AppError> {
        RelationshipService::delete_class(&PgReferenceStore::new(db.clone()), id).await
    }
}
