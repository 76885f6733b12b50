//! Student domain models and DTOs.

use chrono::{DateTime, NaiveDate, Utc};
use rollcall_core::PaginationMeta;
use rollcall_core::serde::{
    deserialize_date_lenient, deserialize_optional_bool, deserialize_optional_date_lenient,
    deserialize_optional_trimmed, deserialize_trimmed,
};
use rollcall_core::sort::SortField;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::classes::ClassSummary;
use crate::ids::{ClassId, StudentId};
use crate::value_types::{Gender, validate_contact, validate_gender};

pub const STUDENT_COLUMNS: &str =
    "id, name, gender, dob, contact, fees_paid, class_id, created_at, updated_at";

pub const STUDENT_SORT_FIELDS: &[SortField] = &[
    ("name", "name"),
    ("gender", "gender"),
    ("dob", "dob"),
    ("feesPaid", "fees_paid"),
    ("createdAt", "created_at"),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub gender: Gender,
    pub dob: NaiveDate,
    pub contact: String,
    pub fees_paid: f64,
    #[serde(rename = "class")]
    pub class_id: Option<ClassId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `{id, name}` of a student, embedded in class responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
}

/// A student list entry; `classInfo` is only present when requested.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentWithClass {
    #[serde(flatten)]
    pub student: Student,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_info: Option<ClassSummary>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StudentIncludeParams {
    /// Embed `{id, name, year}` of each student's class as `classInfo`
    #[serde(default, rename = "includeClass", deserialize_with = "deserialize_optional_bool")]
    pub include_class: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStudentDto {
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(length(min = 3, message = "Name must be at least 3 characters"))]
    pub name: String,
    #[validate(custom(function = "validate_gender"))]
    #[schema(example = "Male")]
    pub gender: String,
    #[serde(deserialize_with = "deserialize_date_lenient")]
    #[schema(value_type = String, format = Date)]
    pub dob: NaiveDate,
    #[serde(deserialize_with = "deserialize_trimmed")]
    #[validate(custom(function = "validate_contact"))]
    #[schema(example = "0123456789")]
    pub contact: String,
    #[validate(range(min = 0.0, message = "Fees paid cannot be negative"))]
    pub fees_paid: f64,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStudentDto {
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
    #[validate(range(min = 0.0, message = "Fees paid cannot be negative"))]
    pub fees_paid: Option<f64>,
}

/// Body of `POST /api/students/{id}/assign-class`.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignClassDto {
    #[schema(value_type = String, format = "uuid")]
    pub class_id: ClassId,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedStudentsResponse {
    pub students: Vec<StudentWithClass>,
    #[serde(flatten)]
    pub meta: PaginationMeta,
}
