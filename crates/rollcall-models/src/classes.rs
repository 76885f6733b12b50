//! Class domain models and DTOs.

use chrono::{DateTime, Utc};
use rollcall_core::PaginationMeta;
use rollcall_core::serde::{deserialize_optional_trimmed, deserialize_trimmed, double_option};
use rollcall_core::sort::SortField;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, StudentId, TeacherId};
use crate::students::StudentSummary;
use crate::teachers::TeacherSummary;
use crate::value_types::validate_class_year;

pub const DEFAULT_STUDENT_LIMIT: i32 = 30;

pub const CLASS_COLUMNS: &str =
    "id, name, year, teacher_id, student_fees, student_limit, student_ids, created_at, updated_at";

pub const CLASS_SORT_FIELDS: &[SortField] = &[
    ("name", "name"),
    ("year", "year"),
    ("studentFees", "student_fees"),
    ("studentLimit", "student_limit"),
    ("createdAt", "created_at"),
];

/// A class as stored. `students` keeps insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: ClassId,
    pub name: String,
    pub year: i32,
    #[serde(rename = "teacher")]
    pub teacher_id: Option<TeacherId>,
    pub student_fees: f64,
    pub student_limit: i32,
    #[serde(rename = "students")]
    pub student_ids: Vec<StudentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Class {
    pub fn has_student(&self, student_id: StudentId) -> bool {
        self.student_ids.contains(&student_id)
    }

    pub fn is_full(&self) -> bool {
        self.student_ids.len() >= usize::try_from(self.student_limit).unwrap_or(0)
    }
}

/// `{id, name, year}` of a class, embedded in student responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct ClassSummary {
    pub id: ClassId,
    pub name: String,
    pub year: i32,
}

/// A class with its teacher and students resolved to `{id, name}`.
///
/// Dangling ids are left out rather than failing the read.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassWithRelations {
    pub id: ClassId,
    pub name: String,
    pub year: i32,
    pub teacher: Option<TeacherSummary>,
    pub student_fees: f64,
    pub student_limit: i32,
    pub students: Vec<StudentSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ClassWithRelations {
    pub fn new(class: Class, teacher: Option<TeacherSummary>, students: Vec<StudentSummary>) -> Self {
        Self {
            id: class.id,
            name: class.name,
            year: class.year,
            teacher,
            student_fees: class.student_fees,
            student_limit: class.student_limit,
            students,
            created_at: class.created_at,
            updated_at: class.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_class_year"))]
    pub year: i32,
    #[serde(default)]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub teacher: Option<TeacherId>,
    #[validate(range(min = 0.0, message = "Student fees cannot be negative"))]
    pub student_fees: f64,
    #[validate(range(min = 1, message = "Student limit must be at least 1"))]
    pub student_limit: Option<i32>,
}

/// Partial class update. `teacher: null` clears the class teacher, an absent
/// `teacher` leaves it untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClassDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 3, max = 50, message = "Name must be between 3 and 50 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_class_year"))]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>, format = "uuid")]
    pub teacher: Option<Option<TeacherId>>,
    #[validate(range(min = 0.0, message = "Student fees cannot be negative"))]
    pub student_fees: Option<f64>,
    #[validate(range(min = 1, message = "Student limit must be at least 1"))]
    pub student_limit: Option<i32>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedClassesResponse {
    pub classes: Vec<ClassWithRelations>,
    #[serde(flatten)]
    pub meta: PaginationMeta,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_types::max_class_year;

    fn create_dto() -> CreateClassDto {
        CreateClassDto {
            name: "Grade 5A".to_string(),
            year: 2024,
            teacher: None,
            student_fees: 1200.0,
            student_limit: None,
        }
    }

    #[test]
    fn test_create_class_dto_validation() {
        assert!(create_dto().validate().is_ok());

        let short_name = CreateClassDto {
            name: "5A".to_string(),
            ..create_dto()
        };
        assert!(short_name.validate().is_err());

        let long_name = CreateClassDto {
            name: "x".repeat(51),
            ..create_dto()
        };
        assert!(long_name.validate().is_err());

        let negative_fees = CreateClassDto {
            student_fees: -1.0,
            ..create_dto()
        };
        assert!(negative_fees.validate().is_err());

        let zero_limit = CreateClassDto {
            student_limit: Some(0),
            ..create_dto()
        };
        assert!(zero_limit.validate().is_err());
    }

    #[test]
    fn test_create_class_year_window() {
        let too_old = CreateClassDto {
            year: 1999,
            ..create_dto()
        };
        assert!(too_old.validate().is_err());

        let next_year = CreateClassDto {
            year: max_class_year(),
            ..create_dto()
        };
        assert!(next_year.validate().is_ok());
    }

    #[test]
    fn test_create_class_reports_every_violation() {
        let dto = CreateClassDto {
            name: "AB".to_string(),
            year: 1900,
            teacher: None,
            student_fees: -5.0,
            student_limit: Some(0),
        };
        let errors = dto.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("year"));
        assert!(fields.contains_key("student_fees"));
        assert!(fields.contains_key("student_limit"));
    }

    #[test]
    fn test_create_class_name_is_trimmed_before_validation() {
        let json = r#"{"name":"   5B   ","year":2024,"studentFees":10}"#;
        let dto: CreateClassDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.name, "5B");
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_class_teacher_null_versus_absent() {
        let absent: UpdateClassDto = serde_json::from_str(r#"{"name":"Grade 6"}"#).unwrap();
        assert!(absent.teacher.is_none());

        let cleared: UpdateClassDto = serde_json::from_str(r#"{"teacher":null}"#).unwrap();
        assert_eq!(cleared.teacher, Some(None));
    }

    #[test]
    fn test_class_serializes_relationship_fields() {
        let class = Class {
            id: ClassId::from_u128(1),
            name: "Grade 5A".to_string(),
            year: 2024,
            teacher_id: None,
            student_fees: 100.0,
            student_limit: 2,
            student_ids: vec![StudentId::from_u128(2)],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&class).unwrap();
        assert!(value.get("teacher").is_some_and(|t| t.is_null()));
        assert_eq!(value["students"].as_array().map(Vec::len), Some(1));
        assert_eq!(value["studentLimit"], 2);
        assert!(class.has_student(StudentId::from_u128(2)));
        assert!(!class.is_full());
    }
}
