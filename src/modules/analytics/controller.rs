use axum::{Json, extract::State};
use tracing::instrument;

use rollcall_core::AppError;
use rollcall_models::{ClassId, ErrorResponse};

use crate::modules::analytics::model::{ClassAnalytics, FinancialSummary, FinancialsParams};
use crate::modules::analytics::service::AnalyticsService;
use crate::state::AppState;
use crate::validator::{ValidatedPath, ValidatedQuery};

#[utoipa::path(
    get,
    path = "/api/analytics/class/{class_id}",
    params(("class_id" = String, Path, description = "Class ID")),
    responses(
        (status = 200, description = "Class roster with gender distribution", body = ClassAnalytics),
        (status = 404, description = "Class not found", body = ErrorResponse)
    ),
    tag = "Analytics"
)]
#[instrument(skip(state))]
pub async fn get_class_analytics(
    State(state): State<AppState>,
    ValidatedPath(class_id): ValidatedPath<ClassId>,
) -> Result<Json<ClassAnalytics>, AppError> {
    let analytics = AnalyticsService::class_analytics(&state.db, class_id).await?;
    Ok(Json(analytics))
}

#[utoipa::path(
    get,
    path = "/api/analytics/financials",
    params(FinancialsParams),
    responses(
        (status = 200, description = "Salary expenses and fee income for the period", body = FinancialSummary),
        (status = 400, description = "Missing or invalid period", body = ErrorResponse)
    ),
    tag = "Analytics"
)]
#[instrument(skip(state))]
pub async fn get_financials(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<FinancialsParams>,
) -> Result<Json<FinancialSummary>, AppError> {
    let summary = AnalyticsService::financials(&state.db, params).await?;
    Ok(Json(summary))
}
