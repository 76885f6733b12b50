//! Seed rows and seeding configuration.

use chrono::NaiveDate;
use rollcall_models::Gender;

pub struct ClassSeed {
    pub name: String,
    pub year: i32,
    pub student_fees: f64,
    pub student_limit: i32,
}

pub struct TeacherSeed {
    pub name: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub contact: String,
    pub salary: f64,
    pub email: String,
}

pub struct StudentSeed {
    pub name: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub contact: String,
    pub fees_paid: f64,
}

/// How many of each entity to create.
///
/// Teachers are paired with classes one-to-one until either runs out; students
/// are spread across classes until every class is full.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub classes: usize,
    pub teachers: usize,
    pub students: usize,
    pub student_limit: i32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            classes: 5,
            teachers: 5,
            students: 100,
            student_limit: rollcall_models::DEFAULT_STUDENT_LIMIT,
        }
    }
}

impl SeedConfig {
    pub fn new(classes: usize, teachers: usize, students: usize) -> Self {
        Self {
            classes,
            teachers,
            students,
            ..Default::default()
        }
    }

    pub fn with_student_limit(mut self, student_limit: i32) -> Self {
        self.student_limit = student_limit.max(1);
        self
    }

    /// Seats available across all seeded classes.
    pub fn capacity(&self) -> usize {
        self.classes * usize::try_from(self.student_limit).unwrap_or(0)
    }
}
