use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use rollcall_core::{AppError, ListParams};
use rollcall_models::{ErrorResponse, MessageResponse, StudentId};

use crate::modules::students::model::{
    AssignClassDto, CreateStudentDto, PaginatedStudentsResponse, Student, StudentIncludeParams,
    UpdateStudentDto,
};
use crate::modules::students::service::StudentService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    post,
    path = "/api/students",
    request_body = CreateStudentDto,
    responses(
        (status = 201, description = "Student created", body = Student),
        (status = 400, description = "Invalid input", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn create_student(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateStudentDto>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    let student = StudentService::create_student(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(student)))
}

#[utoipa::path(
    get,
    path = "/api/students",
    params(ListParams, StudentIncludeParams),
    responses(
        (status = 200, description = "Page of students", body = PaginatedStudentsResponse),
        (status = 400, description = "Invalid sort field", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_students(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
    ValidatedQuery(include): ValidatedQuery<StudentIncludeParams>,
) -> Result<Json<PaginatedStudentsResponse>, AppError> {
    let students = StudentService::get_students(
        &state.db,
        params,
        include.include_class.unwrap_or(false),
    )
    .await?;
    Ok(Json(students))
}

#[utoipa::path(
    get,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student details", body = Student),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn get_student(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentId>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::get_student(&state.db, id).await?;
    Ok(Json(student))
}

#[utoipa::path(
    put,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn update_student(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentId>,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_student(&state.db, id, dto).await?;
    Ok(Json(student))
}

#[utoipa::path(
    delete,
    path = "/api/students/{id}",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student deleted and removed from its class", body = MessageResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn delete_student(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentId>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::delete_student(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Student deleted")))
}

#[utoipa::path(
    post,
    path = "/api/students/{id}/assign-class",
    params(("id" = String, Path, description = "Student ID")),
    request_body = AssignClassDto,
    responses(
        (status = 200, description = "Student moved to the class", body = MessageResponse),
        (status = 400, description = "Already assigned or class full", body = ErrorResponse),
        (status = 404, description = "Student or class not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn assign_class(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentId>,
    ValidatedJson(dto): ValidatedJson<AssignClassDto>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::assign_class(&state.db, id, dto.class_id).await?;
    Ok(Json(MessageResponse::new(
        "Class assigned to student successfully",
    )))
}

#[utoipa::path(
    post,
    path = "/api/students/{id}/unassign-class",
    params(("id" = String, Path, description = "Student ID")),
    responses(
        (status = 200, description = "Student detached from its class", body = MessageResponse),
        (status = 404, description = "Student not found", body = ErrorResponse)
    ),
    tag = "Students"
)]
#[instrument(skip(state))]
pub async fn unassign_class(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<StudentId>,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::unassign_class(&state.db, id).await?;
    Ok(Json(MessageResponse::new(
        "Class unassigned from student successfully",
    )))
}
