use anyhow::anyhow;
use sqlx::PgPool;
use tracing::instrument;

use rollcall_core::AppError;
use rollcall_models::{ClassId, TeacherSummary};

use crate::modules::analytics::model::{
    ClassAnalytics, ClassAnalyticsDetails, FinancialSummary, FinancialsParams,
    GenderDistribution, ReportWindow, StudentGenderSummary,
};
use crate::modules::relationships::{PgReferenceStore, ReferenceStore};

pub struct AnalyticsService;

impl AnalyticsService {
    /// Class details with its students in roster order and a male/female head count.
    #[instrument(skip(db))]
    pub async fn class_analytics(db: &PgPool, class_id: ClassId) -> Result<ClassAnalytics, AppError> {
        let class = PgReferenceStore::new(db.clone())
            .find_class(class_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow!("Class not found")))?;

        let teacher = match class.teacher_id {
            Some(teacher_id) => {
                sqlx::query_as::<_, TeacherSummary>("SELECT id, name FROM teachers WHERE id = $1")
                    .bind(teacher_id)
                    .fetch_optional(db)
                    .await?
            }
            None => None,
        };

        let students = if class.student_ids.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, StudentGenderSummary>(
                r#"SELECT s.id, s.name, s.gender
                   FROM UNNEST($1::uuid[]) WITH ORDINALITY AS roster(id, position)
                   JOIN students s ON s.id = roster.id
                   ORDER BY roster.position"#,
            )
            .bind(&class.student_ids)
            .fetch_all(db)
            .await?
        };

        let gender_distribution = GenderDistribution::from_students(&students);

        Ok(ClassAnalytics {
            class: ClassAnalyticsDetails {
                name: class.name,
                year: class.year,
                teacher,
                students,
            },
            gender_distribution,
        })
    }

    #[instrument(skip(db))]
    pub async fn financials(
        db: &PgPool,
        params: FinancialsParams,
    ) -> Result<FinancialSummary, AppError> {
        let window = params.window().map_err(AppError::bad_request)?;
        Self::financials_for(db, window).await
    }

    /// Salary and fee totals over records created inside `window`.
    pub async fn financials_for(
        db: &PgPool,
        window: ReportWindow,
    ) -> Result<FinancialSummary, AppError> {
        let expenses = sqlx::query_scalar::<_, f64>(
            r#"SELECT COALESCE(SUM(salary), 0)::float8 FROM teachers
               WHERE created_at >= $1 AND created_at < $2"#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(db)
        .await?;

        let income = sqlx::query_scalar::<_, f64>(
            r#"SELECT COALESCE(SUM(fees_paid), 0)::float8 FROM students
               WHERE created_at >= $1 AND created_at < $2"#,
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(db)
        .await?;

        tracing::debug!(start = %window.start, end = %window.end, expenses, income, "Financials computed");
        Ok(FinancialSummary { expenses, income })
    }
}
