//! Teacher domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use rollcall_core::PaginationMeta;
use rollcall_core::serde::{
    deserialize_date_lenient, deserialize_optional_date_lenient, deserialize_optional_trimmed,
    deserialize_trimmed,
};
use rollcall_core::sort::SortField;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::ids::{ClassId, TeacherId};
use crate::value_types::{Gender, validate_contact, validate_gender};

pub const TEACHER_COLUMNS: &str = "id, name, gender, dob, contact, salary, email, \
     assigned_class_id, created_at, updated_at";

pub const TEACHER_SORT_FIELDS: &[SortField] = &[
    ("name", "name"),
    ("gender", "gender"),
    ("dob", "dob"),
    ("salary", "salary"),
    ("email", "email"),
    ("createdAt", "created_at"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Teacher {
    pub id: TeacherId,
    pub name: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub contact: String,
    pub salary: f64,
    pub email: String,
    #[serde(rename = "assignedClass")]
    pub assigned_class_id: Option<ClassId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `{id, name}` of a teacher, embedded in class responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct TeacherSummary {
    pub id: TeacherId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTeacherDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_gender"))]
    #[schema(example = "Female")]
    pub gender: String,
    #[serde(deserialize_with = "deserialize_date_lenient")]
    #[schema(value_type = String, format = Date)]
    pub dob: NaiveDate,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_contact"))]
    #[schema(example = "0123456789")]
    pub contact: String,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: f64,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTeacherDto {
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_gender"))]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_date_lenient")]
    #[schema(value_type = Option<String>, format = Date)]
    pub dob: Option<NaiveDate>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(custom(function = "validate_contact"))]
    pub contact: Option<String>,
    #[validate(range(min = 0.0, message = "Salary cannot be negative"))]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_optional_trimmed")]
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedTeachersResponse {
    pub teachers: Vec<Teacher>,
    #[serde(flatten)]
    pub meta: PaginationMeta,
}
