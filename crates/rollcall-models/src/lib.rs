//! # Rollcall Models
//!
//! Domain models and DTOs for the Rollcall API.
//!
//! Entities map one-to-one onto the `classes`, `teachers` and `students`
//! tables. Relationship pointers are plain ids on each side ([`Class::student_ids`],
//! [`Class::teacher_id`], [`Teacher::assigned_class_id`], [`Student::class_id`]);
//! keeping the two sides in agreement is the job of the relationship service,
//! not of these types.
//!
//! # Modules
//!
//! - [`ids`]: Strongly-typed entity ids
//! - [`value_types`]: Gender and field validators
//! - [`classes`], [`teachers`], [`students`]: Entities, summaries and DTOs
//! - [`analytics`]: Gender distribution and financial report models
//!
//! # Example
//!
//! ```ignore
//! use rollcall_models::{CreateClassDto, ids::TeacherId};
//! use validator::Validate;
//!
//! let dto: CreateClassDto = serde_json::from_str(body)?;
//! dto.validate()?;
//! ```

pub mod analytics;
pub mod classes;
pub mod common;
pub mod ids;
pub mod students;
pub mod teachers;
pub mod value_types;

// Re-export commonly used types at crate root for convenience
pub use common::{ErrorResponse, MessageResponse};
pub use ids::{ClassId, StudentId, TeacherId};
pub use value_types::Gender;

pub use classes::{
    CLASS_COLUMNS, CLASS_SORT_FIELDS, Class, ClassSummary, ClassWithRelations, CreateClassDto,
    DEFAULT_STUDENT_LIMIT, PaginatedClassesResponse, UpdateClassDto,
};

pub use teachers::{
    CreateTeacherDto, PaginatedTeachersResponse, TEACHER_COLUMNS, TEACHER_SORT_FIELDS, Teacher,
    TeacherSummary, UpdateTeacherDto,
};

pub use students::{
    AssignClassDto, CreateStudentDto, PaginatedStudentsResponse, STUDENT_COLUMNS,
    STUDENT_SORT_FIELDS, Student, StudentIncludeParams, StudentSummary, StudentWithClass,
    UpdateStudentDto,
};

pub use analytics::{
    ClassAnalytics, ClassAnalyticsDetails, FinancialSummary, FinancialsParams, GenderDistribution,
    PeriodError, PeriodType, ReportWindow, StudentGenderSummary,
};
