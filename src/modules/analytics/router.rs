use axum::{Router, routing::get};

use crate::state::AppState;

use super::controller::{get_class_analytics, get_financials};

pub fn init_analytics_router() -> Router<AppState> {
    Router::new()
        .route("/class/{class_id}", get(get_class_analytics))
        .route("/financials", get(get_financials))
}
