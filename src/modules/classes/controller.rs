use axum::{Json, extract::State, http::StatusCode};
use tracing::instrument;

use rollcall_core::{AppError, ListParams};
use rollcall_models::{ClassId, ErrorResponse, MessageResponse, StudentId};

use crate::modules::classes::model::{
    Class, ClassWithRelations, CreateClassDto, PaginatedClassesResponse, UpdateClassDto,
};
use crate::modules::classes::service::ClassService;
use crate::modules::relationships::RelationshipService;
use crate::state::AppState;
use crate::validator::{ValidatedJson, ValidatedPath, ValidatedQuery};

#[utoipa::path(
    post,
    path = "/api/classes",
    request_body = CreateClassDto,
    responses(
        (status = 201, description = "Class created", body = Class),
        (status = 400, description = "Invalid input or teacher not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn create_class(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<CreateClassDto>,
) -> Result<(StatusCode, Json<Class>), AppError> {
    let class = ClassService::create_class(&state.db, dto).await?;
    Ok((StatusCode::CREATED, Json(class)))
}

#[utoipa::path(
    get,
    path = "/api/classes",
    params(ListParams),
    responses(
        (status = 200, description = "Page of classes with teacher and students resolved", body = PaginatedClassesResponse),
        (status = 400, description = "Invalid sort field", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_classes(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListParams>,
) -> Result<Json<PaginatedClassesResponse>, AppError> {
    let classes = ClassService::get_classes(&state.db, params).await?;
    Ok(Json(classes))
}

#[utoipa::path(
    get,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class details", body = ClassWithRelations),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn get_class(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<ClassId>,
) -> Result<Json<ClassWithRelations>, AppError> {
    let class = ClassService::get_class(&state.db, id).await?;
    Ok(Json(class))
}

#[utoipa::path(
    put,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    request_body = UpdateClassDto,
    responses(
        (status = 200, description = "Class updated", body = Class),
        (status = 400, description = "Invalid input, teacher not found or limit below enrolment", body = ErrorResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn update_class(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<ClassId>,
    ValidatedJson(dto): ValidatedJson<UpdateClassDto>,
) -> Result<Json<Class>, AppError> {
    let class = ClassService::update_class(&state.db, id, dto).await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{id}",
    params(("id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class deleted; its teacher and students are detached", body = MessageResponse),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn delete_class(
    State(state): State<AppState>,
    ValidatedPath(id): ValidatedPath<ClassId>,
) -> Result<Json<MessageResponse>, AppError> {
    ClassService::delete_class(&state.db, id).await?;
    Ok(Json(MessageResponse::new("Class deleted")))
}

#[utoipa::path(
    post,
    path = "/api/classes/{class_id}/students/{student_id}",
    params(
        ("class_id" = String, Path, description = "Class ID"),
        ("student_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student added to the class", body = Class),
        (status = 400, description = "Already in this class, already in another class, or class full", body = ErrorResponse),
        (status = 404, description = "Class or student not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn assign_student(
    State(state): State<AppState>,
    ValidatedPath((class_id, student_id)): ValidatedPath<(ClassId, StudentId)>,
) -> Result<Json<Class>, AppError> {
    let class = RelationshipService::assign_student_to_class(
        &state.reference_store(),
        class_id,
        student_id,
    )
    .await?;
    Ok(Json(class))
}

#[utoipa::path(
    delete,
    path = "/api/classes/{class_id}/students/{student_id}",
    params(
        ("class_id" = String, Path, description = "Class ID"),
        ("student_id" = String, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Student removed from the class", body = Class),
        (status = 400, description = "Student is not assigned to this class", body = ErrorResponse),
        (status = 404, description = "Class or student not found", body = ErrorResponse)
    ),
    tag = "Classes"
)]
#[instrument(skip(state))]
pub async fn unassign_student(
    State(state): State<AppState>,
    ValidatedPath((class_id, student_id)): ValidatedPath<(ClassId, StudentId)>,
) -> Result<Json<Class>, AppError> {
    let class = RelationshipService::unassign_student_from_class(
        &state.reference_store(),
        class_id,
        student_id,
    )
    .await?;
    Ok(Json(class))
}
