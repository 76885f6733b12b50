use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use rollcall_core::{AppError, ListParams, PaginationMeta, SortSpec, name_pattern};
use rollcall_models::value_types::normalize_email;
use rollcall_models::{Gender, TeacherId};

use crate::metrics::track_entity_created;
use crate::modules::relationships::{PgReferenceStore, RelationshipService};
use crate::modules::teachers::model::{
    CreateTeacherDto, PaginatedTeachersResponse, TEACHER_COLUMNS, TEACHER_SORT_FIELDS, Teacher,
    UpdateTeacherDto,
};

pub struct TeacherService;

fn map_email_conflict(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e
        && db_err.is_unique_violation()
    {
        return AppError::bad_request(anyhow!("A teacher with this email already exists"));
    }
    AppError::from(e)
}

fn parse_gender(gender: &str) -> Result<Gender, AppError> {
    gender.parse::<Gender>().map_err(AppError::bad_request)
}

impl TeacherService {
    #[instrument(skip(db))]
    pub async fn create_teacher(db: &PgPool, dto: CreateTeacherDto) -> Result<Teacher, AppError> {
        let gender = parse_gender(&dto.gender)?;

        let teacher = sqlx::query_as::<_, Teacher>(&format!(
            r#"INSERT INTO teachers (name, gender, dob, contact, salary, email)
               VALUES ($1, $2, $3, $4, $5, $6)
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(&dto.name)
        .bind(gender)
        .bind(dto.dob)
        .bind(&dto.contact)
        .bind(dto.salary)
        .bind(normalize_email(&dto.email))
        .fetch_one(db)
        .await
        .map_err(map_email_conflict)?;

        track_entity_created("teacher");
        Ok(teacher)
    }

    #[instrument(skip(db))]
    pub async fn get_teachers(
        db: &PgPool,
        params: ListParams,
    ) -> Result<PaginatedTeachersResponse, AppError> {
        let sort = SortSpec::parse(params.sort_by.as_deref(), TEACHER_SORT_FIELDS)?;
        let pattern = name_pattern(params.filter.as_deref());

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM teachers WHERE ($1::text IS NULL OR name ILIKE $1)",
        )
        .bind(&pattern)
        .fetch_one(db)
        .await?;

        let teachers = sqlx::query_as::<_, Teacher>(&format!(
            r#"SELECT {TEACHER_COLUMNS} FROM teachers
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

        Ok(PaginatedTeachersResponse {
            teachers,
            meta: PaginationMeta::new(total, &params),
        })
    }

    #[instrument(skip(db))]
    pub async fn get_teacher(db: &PgPool, id: TeacherId) -> Result<Teacher, AppError> {
        sqlx::query_as::<_, Teacher>(&format!(
            "SELECT {TEACHER_COLUMNS} FROM teachers WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    /// Patches plain fields. The class assignment is only changed from the class side.
    #[instrument(skip(db))]
    pub async fn update_teacher(
        db: &PgPool,
        id: TeacherId,
        dto: UpdateTeacherDto,
    ) -> Result<Teacher, AppError> {
        let gender = dto.gender.as_deref().map(parse_gender).transpose()?;
        let email = dto.email.as_deref().map(normalize_email);

        sqlx::query_as::<_, Teacher>(&format!(
            r#"UPDATE teachers SET
                 name = COALESCE($2, name),
                 gender = COALESCE($3, gender),
                 dob = COALESCE($4, dob),
                 contact = COALESCE($5, contact),
                 salary = COALESCE($6, salary),
                 email = COALESCE($7, email),
                 updated_at = NOW()
               WHERE id = $1
               RETURNING {TEACHER_COLUMNS}"#
        ))
        .bind(id)
        .bind(&dto.name)
        .bind(gender)
        .bind(dto.dob)
        .bind(&dto.contact)
        .bind(dto.salary)
        .bind(email)
        .fetch_optional(db)
        .await
        .map_err(map_email_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow!("Teacher not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_teacher(db: &PgPool, id: TeacherId) -> Result<(), AppError> {
        RelationshipService::delete_teacher(&PgReferenceStore::new(db.clone()), id).await
    }
}
