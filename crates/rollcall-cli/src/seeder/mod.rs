//! Database seeding for development and manual testing.
//!
//! Rows are generated in parallel, bulk-inserted, and then linked through
//! [`RelationshipService`] so seeded data satisfies the same reference rules
//! as data created through the API.

mod generate;
mod insert;
mod models;

pub use generate::{generate_classes, generate_students, generate_teachers};
pub use insert::{insert_classes, insert_students, insert_teachers};
pub use models::{ClassSeed, SeedConfig, StudentSeed, TeacherSeed};

use std::time::Instant;

use anyhow::anyhow;
use rollcall::modules::relationships::{PgReferenceStore, RelationshipService};
use rollcall_models::{ClassId, StudentId, TeacherId};
use sqlx::PgPool;

/// Counts of what a seeding run created and linked.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub classes: usize,
    pub teachers: usize,
    pub students: usize,
    pub teacher_links: usize,
    pub enrolments: usize,
}

pub async fn seed_all(db: &PgPool, config: SeedConfig) -> anyhow::Result<SeedSummary> {
    let start_time = Instant::now();

    println!("🌱 Starting database seeding...");
    println!(
        "   - {} classes (limit {}), {} teachers, {} students",
        config.classes, config.student_limit, config.teachers, config.students
    );

    println!("\n🔧 Generating fake data in parallel...");
    let gen_start = Instant::now();
    let classes = generate_classes(config.classes, config.student_limit);
    let teachers = generate_teachers(config.teachers);
    let students = generate_students(config.students);
    println!("   ✓ Generated data in {:?}", gen_start.elapsed());

    println!("\n💾 Inserting rows in batches...");
    let insert_start = Instant::now();
    let class_ids = insert_classes(db, &classes).await?;
    let teacher_ids = insert_teachers(db, &teachers).await?;
    let student_ids = insert_students(db, &students).await?;
    println!(
        "   ✓ Inserted {} classes, {} teachers, {} students in {:?}",
        class_ids.len(),
        teacher_ids.len(),
        student_ids.len(),
        insert_start.elapsed()
    );

    println!("\n🔗 Linking teachers and students to classes...");
    let link_start = Instant::now();
    let store = PgReferenceStore::new(db.clone());
    let teacher_links = link_teachers(&store, &class_ids, &teacher_ids).await?;
    let enrolments = enrol_students(&store, &class_ids, &student_ids, config.student_limit).await?;
    println!(
        "   ✓ Linked {} teachers and {} students in {:?}",
        teacher_links,
        enrolments,
        link_start.elapsed()
    );

    let summary = SeedSummary {
        classes: class_ids.len(),
        teachers: teacher_ids.len(),
        students: student_ids.len(),
        teacher_links,
        enrolments,
    };

    println!("\n✅ Seeding complete in {:?}", start_time.elapsed());
    Ok(summary)
}

async fn link_teachers(
    store: &PgReferenceStore,
    class_ids: &[ClassId],
    teacher_ids: &[TeacherId],
) -> anyhow::Result<usize> {
    let mut linked = 0;
    for (class_id, teacher_id) in class_ids.iter().zip(teacher_ids) {
        RelationshipService::set_class_teacher(store, *class_id, Some(*teacher_id))
            .await
            .map_err(|e| anyhow!(e.message()))?;
        linked += 1;
    }
    Ok(linked)
}

/// Fills classes in order; students beyond total capacity stay unassigned.
async fn enrol_students(
    store: &PgReferenceStore,
    class_ids: &[ClassId],
    student_ids: &[StudentId],
    student_limit: i32,
) -> anyhow::Result<usize> {
    let per_class = usize::try_from(student_limit).unwrap_or(0);
    let mut enrolled = 0;

    for (class_id, roster) in class_ids.iter().zip(student_ids.chunks(per_class.max(1))) {
        for student_id in roster {
            RelationshipService::assign_student_to_class(store, *class_id, *student_id)
                .await
                .map_err(|e| anyhow!(e.message()))?;
            enrolled += 1;
        }
    }
    Ok(enrolled)
}

/// Deletes every student, teacher and class. Returns the number of rows removed.
pub async fn clear_all(db: &PgPool) -> anyhow::Result<u64> {
    let start_time = Instant::now();
    println!("🗑️  Clearing all data...");

    let mut tx = db.begin().await?;
    let mut removed = 0;
    for table in ["students", "teachers", "classes"] {
        removed += sqlx::query(&format!("DELETE FROM {table}"))
            .execute(&mut *tx)
            .await?
            .rows_affected();
    }
    tx.commit().await?;

    println!("   ✓ Deleted {} rows in {:?}", removed, start_time.elapsed());
    Ok(removed)
}
