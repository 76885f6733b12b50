//! Batched multi-row inserts, one transaction per entity kind.

use rollcall_models::{ClassId, StudentId, TeacherId};
use sqlx::{PgPool, Postgres, QueryBuilder};

use super::models::{ClassSeed, StudentSeed, TeacherSeed};

// Six binds per row keeps every statement well under the Postgres parameter limit.
const BATCH_SIZE: usize = 1000;

pub async fn insert_classes(db: &PgPool, classes: &[ClassSeed]) -> anyhow::Result<Vec<ClassId>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(classes.len());

    for chunk in classes.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO classes (name, year, student_fees, student_limit) ");
        query.push_values(chunk, |mut row, class| {
            row.push_bind(&class.name)
                .push_bind(class.year)
                .push_bind(class.student_fees)
                .push_bind(class.student_limit);
        });
        query.push(" RETURNING id");

        ids.extend(
            query
                .build_query_scalar::<ClassId>()
                .fetch_all(&mut *tx)
                .await?,
        );
    }

    tx.commit().await?;
    Ok(ids)
}

pub async fn insert_teachers(
    db: &PgPool,
    teachers: &[TeacherSeed],
) -> anyhow::Result<Vec<TeacherId>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(teachers.len());

    for chunk in teachers.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO teachers (name, gender, dob, contact, salary, email) ",
        );
        query.push_values(chunk, |mut row, teacher| {
            row.push_bind(&teacher.name)
                .push_bind(teacher.gender)
                .push_bind(teacher.dob)
                .push_bind(&teacher.contact)
                .push_bind(teacher.salary)
                .push_bind(&teacher.email);
        });
        // Re-running the seeder must not abort on an email from a previous run.
        query.push(" ON CONFLICT (email) DO NOTHING RETURNING id");

        ids.extend(
            query
                .build_query_scalar::<TeacherId>()
                .fetch_all(&mut *tx)
                .await?,
        );
    }

    tx.commit().await?;
    Ok(ids)
}

pub async fn insert_students(
    db: &PgPool,
    students: &[StudentSeed],
) -> anyhow::Result<Vec<StudentId>> {
    let mut tx = db.begin().await?;
    let mut ids = Vec::with_capacity(students.len());

    for chunk in students.chunks(BATCH_SIZE) {
        let mut query: QueryBuilder<Postgres> =
            QueryBuilder::new("INSERT INTO students (name, gender, dob, contact, fees_paid) ");
        query.push_values(chunk, |mut row, student| {
            row.push_bind(&student.name)
                .push_bind(student.gender)
                .push_bind(student.dob)
                .push_bind(&student.contact)
                .push_bind(student.fees_paid);
        });
        query.push(" RETURNING id");

        ids.extend(
            query
                .build_query_scalar::<StudentId>()
                .fetch_all(&mut *tx)
                .await?,
        );
    }

    tx.commit().await?;
    Ok(ids)
}
